//! # 글(Article) 라우트 핸들러
//!
//! 글 목록/상세/작성/수정/삭제와 리뷰 작성을 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/article`               → 최신 글 목록 (페이지네이션 + 태그 필터)
//! - `GET    /api/article/{slug}`        → 단일 글 상세 (접근 정책 평가)
//! - `POST   /api/article`               → 새 글 작성 (인증 필요)
//! - `PUT    /api/article/{id}`          → 글 수정 (인증 + EDIT 권한)
//! - `DELETE /api/article/{id}`          → 글 삭제 (인증 + DELETE 권한)
//! - `POST   /api/article/{id}/reviews`  → 리뷰 작성 (인증 필요)
//!
//! ## Axum 핸들러 패턴
//! Axum 핸들러는 **Extractor(추출기)**를 매개변수로 받습니다.
//! Extractor는 HTTP 요청에서 데이터를 자동으로 추출합니다:
//! - `State(state)`: 앱 전역 상태 (DB 풀, 설정 등)
//! - `Path(id)`: URL 경로 파라미터 (예: /article/{id}에서 id)
//! - `Query(query)`: 쿼리 문자열 (?page=2&tag=rust)
//! - `Json(body)`: 요청 본문을 JSON으로 파싱하여 구조체로 변환
//! - `AuthUser` / `MaybeAuthUser`: 우리가 만든 인증 extractor (middleware/auth.rs)
//!
//! 반환 타입이 `Result<T, AppError>`이면, Axum이 자동으로:
//! - `Ok(T)` → T를 HTTP 응답으로 변환 (IntoResponse 트레이트 사용)
//! - `Err(AppError)` → AppError를 에러 JSON 응답으로 변환

use crate::{
    db,              // 데이터베이스 접근 계층
    error::AppError,
    middleware::auth::{load_actor, require_actor, AuthUser, MaybeAuthUser},
    models::*,       // 데이터 모델 구조체들
    services::articles as article_service,
    services::voter::ArticleAction,
};
use axum::{
    extract::{Path, Query, State}, // Axum Extractor: 요청에서 데이터 추출
    http::StatusCode,               // HTTP 상태 코드 (201, 204, 404 등)
    Json,                           // JSON 요청/응답 래퍼
};
use serde_json::{json, Value}; // JSON 값 생성 유틸리티
use sqlx::SqlitePool;          // SQLite 연결 풀 타입

// #[derive(Clone)]: AppState가 Clone 트레이트를 구현하게 합니다.
// Axum의 State Extractor는 내부적으로 AppState를 clone하므로 필수입니다.
// SqlitePool은 Arc<내부상태>를 사용하므로 clone해도 실제 풀이 복제되지 않습니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// Axum의 의존성 주입(Dependency Injection) 메커니즘입니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
}

/// `GET /article?page=N&tag=NAME` — 최신 글 목록을 조회합니다.
///
/// 인증 없이 접근 가능한 공개 목록입니다.
/// 미래로 예약된 글은 제외되고, published_at 내림차순으로 정렬됩니다.
///
/// # 쿼리 파라미터
/// - `page`: 페이지 번호 (생략 시 1, 0 이하는 1로 보정)
/// - `tag`: 태그 이름 필터 (없는 태그면 빈 목록)
///
/// # 반환값
/// 글 목록과 페이지네이션 메타데이터를 함께 실은 JSON:
/// `{ "articles": [...], "page": 2, "page_size": 10, "total": 37,
///    "total_pages": 4, "has_next": true, "has_previous": true }`
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    // .unwrap_or(1): page 파라미터가 없으면 1페이지
    let page = query.page.unwrap_or(1);
    // .as_deref(): Option<String>을 Option<&str>로 변환합니다.
    let paginator =
        article_service::list_latest(&state.pool, page, query.tag.as_deref()).await?;

    Ok(Json(json!({
        "articles": paginator.results(),
        "page": paginator.current_page(),
        "page_size": paginator.page_size(),
        "total": paginator.num_results(),
        "total_pages": paginator.last_page(),
        "has_next": paginator.has_next_page(),
        "has_previous": paginator.has_previous_page(),
    })))
}

/// `GET /article/{slug}` — 단일 글 상세를 조회합니다.
///
/// 접근 정책(SHOW)을 통과해야 합니다:
/// - 글이 없으면 404
/// - 익명이면 401, 작성자/편집자가 아니면 403
///
/// `MaybeAuthUser`: 토큰이 없어도 핸들러까지는 들어옵니다.
/// 익명 여부에 따라 401/403을 가르는 것은 정책 쪽 일이기 때문입니다.
pub async fn show_article(
    State(state): State<AppState>,
    maybe_user: MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleDetail>, AppError> {
    let actor = load_actor(&state.pool, &maybe_user).await?;
    let article = article_service::get_authorized_by_slug(
        &state.pool,
        &slug,
        actor.as_ref(),
        ArticleAction::Show,
    )
    .await?;

    let detail = db::to_detail_view(&state.pool, article).await?;
    Ok(Json(detail))
}

/// `POST /article` — 새 글을 작성합니다.
///
/// 인증된 사용자라면 누구나 쓸 수 있고, 작성한 사람이 작성자가 됩니다.
/// 검증 실패 시 400과 함께 위반 목록이 반환됩니다.
pub async fn create_article(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<ArticleRequest>,
) -> Result<(StatusCode, Json<ArticleDetail>), AppError> {
    let actor = require_actor(&state.pool, &auth_user).await?;

    let article = article_service::create_article(&state.pool, &actor, &req).await?;
    let detail = db::to_detail_view(&state.pool, article).await?;

    // (StatusCode, Json): 튜플로 상태 코드를 지정합니다. 201 Created.
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `PUT /article/{id}` — 글을 수정합니다.
///
/// 접근 정책의 EDIT 결정을 통과해야 합니다 (작성자 또는 편집자).
pub async fn update_article(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<ArticleRequest>,
) -> Result<Json<ArticleDetail>, AppError> {
    let actor = require_actor(&state.pool, &auth_user).await?;

    let article = article_service::update_article(&state.pool, &actor, &id, &req).await?;
    let detail = db::to_detail_view(&state.pool, article).await?;
    Ok(Json(detail))
}

/// `DELETE /article/{id}` — 글을 삭제합니다.
///
/// 접근 정책의 DELETE 결정을 통과해야 합니다.
/// 성공 시 HTTP 204 No Content를 반환합니다 (본문 없음).
pub async fn delete_article(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let actor = require_actor(&state.pool, &auth_user).await?;

    article_service::delete_article(&state.pool, &actor, &id).await?;

    // StatusCode::NO_CONTENT: HTTP 204 (성공했지만 반환할 본문 없음)
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /article/{id}/reviews` — 글에 리뷰를 답니다.
///
/// 인증된 사용자라면 누구나 가능합니다. 글이 없으면 404.
pub async fn create_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    let actor = require_actor(&state.pool, &auth_user).await?;

    let review = article_service::add_review(&state.pool, &actor, &id, &req).await?;
    let response = ReviewResponse {
        id: review.id,
        content: review.content,
        published_at: review.published_at,
        author: AuthorResponse::from(actor),
    };

    Ok((StatusCode::CREATED, Json(response)))
}
