//! # 서비스 계층 모듈
//!
//! 라우트 핸들러(routes/)와 DB 계층(db/) 사이의 도메인 로직을 담습니다.
//! 각 하위 모듈:
//! - `articles`: 글 목록/조회/쓰기 오케스트레이션 (태그 해석 + 페이지네이션 + 정책)
//! - `validation`: 글 필드 검증 규칙 (순수 함수)
//! - `voter`: 접근 정책 — (행위자, 작업, 글)에 대한 허용/거부 결정

pub mod articles;
pub mod validation;
pub mod voter;
