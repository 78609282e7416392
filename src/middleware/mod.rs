//! # 미들웨어 모듈
//!
//! 요청이 핸들러에 도달하기 전에 거치는 공통 처리입니다.
//! - `auth`: JWT 발급/검증과 요청에서 행위자(actor)를 추출하는 extractor

pub mod auth;
