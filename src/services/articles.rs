//! # 글 서비스(Article Query Service) 모듈
//!
//! 라우트 핸들러와 DB 계층 사이의 오케스트레이션을 담당합니다.
//! 태그 해석 + 페이지네이션 + 접근 정책 + 검증을 한 곳에서 엮습니다.
//!
//! 이 모듈의 공개 작업:
//! - `list_latest()`: 최신 글 목록 (선택적 태그 필터 + 페이지네이션)
//! - `get_authorized()` / `get_authorized_by_slug()`: 조회 + 접근 정책 평가
//! - `create_article()` / `update_article()` / `delete_article()`: 쓰기 경로
//! - `add_review()`: 글에 리뷰 달기
//!
//! 현재 행위자(actor)는 항상 매개변수로 받습니다. 전역에서 읽지 않습니다.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::error::{AppError, Violation};
use crate::models::*;
use crate::pagination::{Paginator, PAGE_SIZE};
use crate::services::validation;
use crate::services::voter::{self, ArticleAction, Decision};

/// DB에 저장하는 시각 문자열 포맷 (밀리초 3자리 고정폭 ISO 8601 UTC)
/// 스키마의 strftime('%Y-%m-%dT%H:%M:%fZ', 'now')와 같은 모양이어야
/// 문자열 비교가 시간 비교로 동작합니다.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// 현재 UTC 시각을 저장 포맷 문자열로 반환합니다.
pub fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// RFC 3339 문자열을 저장 포맷으로 정규화합니다.
///
/// 어떤 시간대로 보내와도 UTC로 환산해 고정폭 포맷으로 통일합니다.
/// 파싱에 실패하면 None — 호출하는 쪽이 검증 위반으로 변환합니다.
fn normalize_published_at(value: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string())
}

/// 요청으로 들어온 태그 이름들을 정리합니다.
///
/// 앞뒤 공백을 제거하고, 빈 이름을 버리고, 중복을 제거합니다
/// (첫 등장 순서는 유지). 태그는 집합(set)이므로 같은 이름이
/// 두 번 와도 한 번만 붙어야 합니다.
fn clean_tag_names(raw: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in raw {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !names.iter().any(|existing| existing == trimmed) {
            names.push(trimmed.to_string());
        }
    }
    names
}

/// 최신 글 목록을 조회합니다.
///
/// # 매개변수
/// - `page`: 페이지 번호 (1부터, 0 이하는 1로 보정)
/// - `tag_name`: Some이면 이 이름의 태그가 붙은 글만
///
/// # 태그 해석
/// 태그 이름을 정확 일치로 조회합니다. 존재하지 않는 이름이면
/// "일치하는 글이 없다"로 처리합니다 — 빈 결과(전체 0건)이지 에러가 아닙니다.
/// 필터를 조용히 무시하고 전체 목록을 돌려주면, 사용자는
/// 오타 난 태그로 필터링했다고 믿은 채 엉뚱한 목록을 보게 됩니다.
pub async fn list_latest(
    pool: &SqlitePool,
    page: i64,
    tag_name: Option<&str>,
) -> Result<Paginator<ArticleListItem>, AppError> {
    let tag = match tag_name {
        Some(name) => match db::find_tag_by_name(pool, name).await? {
            Some(tag) => Some(tag),
            None => return Ok(Paginator::new(Vec::new(), page, PAGE_SIZE, 0)),
        },
        None => None,
    };

    db::find_latest(pool, page, tag.as_ref()).await
}

/// 접근 정책의 결정을 HTTP 에러로 번역합니다.
///
/// - `Granted` → 통과
/// - `Denied`/`Abstain` + 익명 → 401 (누구인지부터 밝혀야 함)
/// - `Denied`/`Abstain` + 인증됨 → 403 (누구인지 알지만 권한이 없음)
///
/// Abstain은 "아무 정책도 답하지 않음"이므로 기본 거부로 처리합니다.
pub fn authorize(
    actor: Option<&User>,
    action: ArticleAction,
    article: &Article,
) -> Result<(), AppError> {
    match voter::vote(actor, action, article) {
        Decision::Granted => Ok(()),
        Decision::Denied | Decision::Abstain => match actor {
            None => Err(AppError::Unauthorized("Authentication required".to_string())),
            Some(_) => Err(AppError::Forbidden(
                "You are not allowed to access this article".to_string(),
            )),
        },
    }
}

/// ID로 글을 찾고 접근 정책을 평가합니다.
///
/// 글이 없으면 NotFound, 정책이 거부하면 401/403.
/// 존재 확인이 정책보다 먼저입니다 — 없는 글에는 권한을 물을 수 없습니다.
pub async fn get_authorized(
    pool: &SqlitePool,
    id: &str,
    actor: Option<&User>,
    action: ArticleAction,
) -> Result<Article, AppError> {
    let article = db::get_article(pool, id).await?.ok_or(AppError::NotFound)?;
    authorize(actor, action, &article)?;
    Ok(article)
}

/// 슬러그로 글을 찾고 접근 정책을 평가합니다 (상세 페이지 경로).
pub async fn get_authorized_by_slug(
    pool: &SqlitePool,
    slug: &str,
    actor: Option<&User>,
    action: ArticleAction,
) -> Result<Article, AppError> {
    let article = db::get_article_by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound)?;
    authorize(actor, action, &article)?;
    Ok(article)
}

/// 새 글을 만듭니다. 호출자는 인증된 사용자여야 하며, 그가 작성자가 됩니다.
///
/// # 처리 순서
/// 1. 태그 이름 정리 (공백/빈 이름/중복 제거)
/// 2. 필드 검증 + 슬러그 결정(없으면 제목에서 생성) + 중복 슬러그 사전 확인
///    + 발행 시각 파싱 — 위반을 전부 모읍니다
/// 3. 위반이 하나라도 있으면 여기서 끝 — DB에는 아무것도 쓰지 않습니다
///    (태그 get-or-create도 검증 뒤에만 실행됩니다. 검증에 실패한 요청이
///    태그만 만들어놓고 사라지면 안 되니까요)
/// 4. 글 삽입 → 태그 get-or-create & 연결
///
/// 사전 확인과 삽입 사이에 같은 슬러그가 끼어드는 경쟁은
/// DB의 UNIQUE 인덱스가 막고, db 계층이 같은 검증 위반으로 변환합니다.
pub async fn create_article(
    pool: &SqlitePool,
    author: &User,
    req: &ArticleRequest,
) -> Result<Article, AppError> {
    let tag_names = clean_tag_names(&req.tags);

    let mut violations =
        validation::validate_article(&req.title, &req.summary, &req.content, &tag_names);

    // 슬러그: 명시된 값이 있으면 그것을, 없으면 제목을 슬러그화합니다.
    // 어느 쪽이든 slugify를 거치므로 저장되는 슬러그는 항상 URL 안전합니다.
    let slug = match &req.slug {
        Some(s) if !s.trim().is_empty() => slug::slugify(s.trim()),
        _ => slug::slugify(&req.title),
    };
    if !slug.is_empty() && db::get_article_by_slug(pool, &slug).await?.is_some() {
        violations.push(Violation::new(
            "slug",
            "This slug is already used by another article.",
        ));
    }

    // 발행 시각: 생략하면 지금, 지정하면 RFC 3339로 파싱해 UTC로 정규화.
    let published_at = match &req.published_at {
        None => now_timestamp(),
        Some(value) => match normalize_published_at(value) {
            Some(normalized) => normalized,
            None => {
                violations.push(Violation::new(
                    "published_at",
                    "The publication date is not a valid RFC 3339 timestamp.",
                ));
                String::new()
            }
        },
    };

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let article = Article {
        id: uuid::Uuid::now_v7().to_string(),
        title: req.title.clone(),
        slug,
        summary: req.summary.clone(),
        content: req.content.clone(),
        published_at,
        author_id: author.id.clone(),
    };

    let created = db::insert_article(pool, &article).await?;
    attach_tags(pool, &created.id, &tag_names).await?;

    Ok(created)
}

/// 글을 수정합니다 (PUT — 보낸 내용으로 전체 교체).
///
/// 수정은 접근 정책의 EDIT 결정을 통과해야 합니다.
/// slug와 published_at은 생략하면 기존 값을 유지합니다
/// (URL과 발행 시각은 실수로 바뀌면 곤란한 값들이라 명시 변경만 허용).
/// 태그는 보낸 목록으로 통째로 교체됩니다 — 생략하면 모두 떼어냅니다.
pub async fn update_article(
    pool: &SqlitePool,
    actor: &User,
    id: &str,
    req: &ArticleRequest,
) -> Result<Article, AppError> {
    let existing = get_authorized(pool, id, Some(actor), ArticleAction::Edit).await?;

    let tag_names = clean_tag_names(&req.tags);

    let mut violations =
        validation::validate_article(&req.title, &req.summary, &req.content, &tag_names);

    let slug = match &req.slug {
        Some(s) if !s.trim().is_empty() => slug::slugify(s.trim()),
        _ => existing.slug.clone(),
    };
    // 다른 글이 이미 쓰는 슬러그인지 확인합니다. 자기 자신은 제외.
    if let Some(holder) = db::get_article_by_slug(pool, &slug).await? {
        if holder.id != existing.id {
            violations.push(Violation::new(
                "slug",
                "This slug is already used by another article.",
            ));
        }
    }

    let published_at = match &req.published_at {
        None => existing.published_at.clone(),
        Some(value) => match normalize_published_at(value) {
            Some(normalized) => normalized,
            None => {
                violations.push(Violation::new(
                    "published_at",
                    "The publication date is not a valid RFC 3339 timestamp.",
                ));
                String::new()
            }
        },
    };

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let merged = Article {
        id: existing.id.clone(),
        title: req.title.clone(),
        slug,
        summary: req.summary.clone(),
        content: req.content.clone(),
        published_at,
        author_id: existing.author_id.clone(),
    };

    let updated = db::update_article(pool, &merged).await?;

    // 태그 집합 교체: 전부 떼고 다시 붙입니다.
    db::remove_article_tags(pool, &updated.id).await?;
    attach_tags(pool, &updated.id, &tag_names).await?;

    Ok(updated)
}

/// 글을 삭제합니다. 접근 정책의 DELETE 결정을 통과해야 합니다.
///
/// 태그 연결 해제와 리뷰 삭제는 db 계층의 삭제 경로가 함께 처리합니다.
pub async fn delete_article(pool: &SqlitePool, actor: &User, id: &str) -> Result<(), AppError> {
    let article = get_authorized(pool, id, Some(actor), ArticleAction::Delete).await?;

    let deleted = db::delete_article(pool, &article.id).await?;
    if !deleted {
        // 정책 평가와 삭제 사이에 다른 요청이 먼저 지웠을 수 있습니다.
        return Err(AppError::NotFound);
    }

    Ok(())
}

/// 글에 리뷰를 답니다. 인증된 사용자라면 누구나 가능합니다.
pub async fn add_review(
    pool: &SqlitePool,
    author: &User,
    article_id: &str,
    req: &CreateReviewRequest,
) -> Result<Review, AppError> {
    let article = db::get_article(pool, article_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if req.content.trim().is_empty() {
        return Err(AppError::Validation(vec![Violation::new(
            "content",
            "The review content cannot be blank.",
        )]));
    }

    let id = uuid::Uuid::now_v7().to_string();
    db::create_review(pool, &id, &article.id, &author.id, &req.content).await
}

/// 이름 목록의 태그를 get-or-create 하고 글에 연결합니다.
async fn attach_tags(
    pool: &SqlitePool,
    article_id: &str,
    tag_names: &[String],
) -> Result<(), AppError> {
    for name in tag_names {
        let tag = db::get_or_create_tag(pool, name).await?;
        db::add_tag_to_article(pool, article_id, &tag.id).await?;
    }
    Ok(())
}
