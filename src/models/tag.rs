//! # 태그 모델 정의
//!
//! 태그(Tag) 시스템에서 사용하는 데이터 구조체를 정의합니다.
//! 태그는 글을 분류하고 목록을 필터링하기 위한 라벨입니다.
//!
//! 이 시스템에서 태그는 별도의 생성/수정 API가 없습니다.
//! 글을 저장할 때 요청에 담긴 태그 이름이 자동으로 만들어지는
//! get-or-create 방식입니다 (db::tags 모듈 참고).

use serde::{Deserialize, Serialize};

/// 태그 엔티티 — DB의 `tags` 테이블 한 행(row)에 대응합니다.
///
/// # derive 매크로 설명
/// - `Serialize`: 이 구조체를 JSON으로 변환할 수 있게 합니다 (API 응답 시 사용)
/// - `Deserialize`: JSON을 이 구조체로 변환할 수 있게 합니다
/// - `sqlx::FromRow`: SQL 쿼리 결과(행)를 이 구조체로 자동 매핑합니다
/// - `Clone`: 값을 복제할 수 있게 합니다 (.clone() 메서드 제공)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 태그 이름 (예: "rust", "travel", "music") — 전역 유일
    pub name: String,
}
