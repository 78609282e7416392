//! # 리뷰 데이터베이스 쿼리 모듈
//!
//! 글에 달리는 리뷰의 삽입/조회 쿼리입니다.
//! 리뷰는 글에 소유되므로 삭제는 글 삭제 경로(db::articles)에서만 일어납니다.

use crate::error::AppError;
use crate::models::Review;
use sqlx::SqlitePool;

pub async fn get_review(pool: &SqlitePool, id: &str) -> Result<Option<Review>, AppError> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        SELECT id, content, published_at, article_id, author_id
        FROM reviews
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(review)
}

/// 글 하나에 달린 리뷰를 최신순으로 조회합니다.
///
/// published_at이 같으면 id 내림차순으로 — UUIDv7은 시간 기반이라
/// 이 조합이 "나중에 쓴 리뷰가 먼저"를 안정적으로 보장합니다.
pub async fn list_article_reviews(
    pool: &SqlitePool,
    article_id: &str,
) -> Result<Vec<Review>, AppError> {
    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT id, content, published_at, article_id, author_id
        FROM reviews
        WHERE article_id = ?
        ORDER BY published_at DESC, id DESC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(reviews)
}

/// 새 리뷰를 삽입하고, 저장된 행을 다시 조회하여 반환합니다.
/// published_at은 스키마 DEFAULT(현재 시각)가 채웁니다.
pub async fn create_review(
    pool: &SqlitePool,
    id: &str,
    article_id: &str,
    author_id: &str,
    content: &str,
) -> Result<Review, AppError> {
    sqlx::query(
        r#"
        INSERT INTO reviews (id, content, article_id, author_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(content)
    .bind(article_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    get_review(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created review".to_string()))
}
