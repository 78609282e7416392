//! # 글담(Geuldam) 블로그 백엔드 라이브러리
//!
//! 글을 쓰고, 태그를 붙이고, 리뷰를 다는 블로그 백엔드의 본체입니다.
//! 서버 바이너리(main.rs)와 콘솔 도구(bin/), 통합 테스트(tests/)가
//! 모두 이 라이브러리 크레이트를 통해 같은 코드를 사용합니다.
//!
//! 계층 구조 (위에서 아래로 호출):
//! - `routes`: HTTP 핸들러 — 요청 파싱과 응답 조립만
//! - `services`: 도메인 로직 — 접근 정책(voter), 검증(validation), 오케스트레이션
//! - `db`: SQL 쿼리 — 테이블별 조회/변경 함수
//! - `models` / `pagination` / `error`: 계층들이 공유하는 타입
//! - `config` / `middleware`: 환경 설정과 인증 extractor

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
