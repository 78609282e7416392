//! 콘솔에서 글을 추가하는 도구
//!
//! 서버를 거치지 않고 터미널에서 직접 글을 등록합니다.
//! HTTP API와 같은 검증/태그 처리 경로를 그대로 거치므로,
//! 콘솔로 만든 글도 API로 만든 글과 동일한 규칙을 따릅니다.
//!
//! 실행: `cargo run --bin add_article`

use anyhow::{Context, Result};
use dialoguer::Input;
use sqlx::sqlite::SqlitePoolOptions;

use geuldam::db;
use geuldam::error::AppError;
use geuldam::models::ArticleRequest;
use geuldam::services::articles;

/// 빈 입력도 허용하는 한 줄 프롬프트. 빈 값 검증은 서비스 계층이 담당합니다.
fn ask(prompt: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let title = ask("Enter the article title")?;
    let slug = ask("Enter the article slug")?;
    let summary = ask("Enter the article summary")?;
    let content = ask("Enter the article content")?;
    let username = ask("Enter the author username")?;
    let tags_input = ask("Enter tag names (e.g.: tag1, tag2)")?;

    let Some(author) = db::users::find_by_username(&pool, &username).await? else {
        eprintln!("Author not found. Please enter a valid author username.");
        std::process::exit(1);
    };
    // 콘솔 등록은 편집자 전용입니다.
    if !author.is_editor() {
        eprintln!("Author should be editor. Please enter a valid author username.");
        std::process::exit(1);
    }

    let request = ArticleRequest {
        title,
        // 슬러그를 비워두면 제목에서 자동 생성합니다.
        slug: if slug.trim().is_empty() { None } else { Some(slug) },
        summary,
        content,
        published_at: None,
        tags: tags_input.split(',').map(str::to_string).collect(),
    };

    match articles::create_article(&pool, &author, &request).await {
        Ok(article) => {
            println!("Article added successfully! (slug: {})", article.slug);
            Ok(())
        }
        Err(AppError::Validation(violations)) => {
            for violation in &violations {
                eprintln!("{}: {}", violation.field, violation.message);
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Failed to add article: {}", err);
            std::process::exit(1);
        }
    }
}
