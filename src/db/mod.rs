//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)과 라우트 핸들러(routes/)에서
//! 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `articles`: 글 CRUD와 페이지네이션 목록 쿼리, 응답 투영 조립
//! - `reviews`: 리뷰 삽입/조회 쿼리
//! - `tags`: 태그 get-or-create 및 글-태그 관계 쿼리
//! - `users`: 사용자 인증 관련 쿼리

pub mod articles;
pub mod reviews;
pub mod tags;
pub mod users;

// 하위 모듈의 모든 공개 함수를 재공개(re-export)하여
// `crate::db::find_latest`처럼 바로 접근할 수 있게 합니다.
pub use articles::*;
pub use reviews::*;
pub use tags::*;
