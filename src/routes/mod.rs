//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `articles`: 글 목록/상세/작성/수정/삭제와 리뷰 작성 핸들러 (AppState 정의 포함)
//! - `auth`: 인증 관련 (회원가입, 로그인, 내 정보)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `tags`: 태그 목록 핸들러

pub mod articles;
pub mod auth;
pub mod health;
pub mod tags;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::list_articles`처럼 바로 접근 가능하게 합니다.
pub use articles::*;
pub use health::*;
pub use tags::*;
