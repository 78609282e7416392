//! # 태그 API 라우트 핸들러
//!
//! 태그 목록 조회 핸들러입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/tag | `list_tags` | 전체 태그 목록 (이름순) |
//!
//! 태그를 만들거나 지우는 엔드포인트는 없습니다.
//! 태그는 글을 저장할 때 이름으로 get-or-create 되는 것이 전부입니다.

// ── 의존성 가져오기 ──
use crate::{
    db,                         // 데이터베이스 쿼리 모듈
    error::AppError,            // 에러 타입 (자동으로 HTTP 에러 응답으로 변환됨)
    routes::articles::AppState, // 애플리케이션 공유 상태 (DB 풀, 설정 등)
};
use axum::{
    extract::State, // Axum 추출자: 앱 상태 추출
    Json,           // JSON 응답 처리
};
use serde_json::{json, Value}; // JSON 객체 생성용 매크로와 범용 JSON 타입

/// 전체 태그 목록을 조회합니다.
///
/// `GET /api/tag` → `{ "tags": [...] }`
///
/// Axum에서 핸들러의 반환 타입이 `Result<Json<Value>, AppError>`이면:
/// - 성공(Ok): JSON 응답을 200 상태로 반환
/// - 실패(Err): AppError가 자동으로 적절한 HTTP 에러 응답으로 변환됨
pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    // json! 매크로: Rust 값을 JSON Value로 변환합니다
    // { "tags": [...] } 형태의 응답을 생성
    Ok(Json(json!({ "tags": tags })))
}
