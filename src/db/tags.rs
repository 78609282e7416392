//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 조회와 글-태그 관계를 관리하는 SQL 쿼리 함수들입니다.
//! 모든 함수는 `SqlitePool` 참조를 받아 비동기로 실행됩니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name) — name에 UNIQUE 인덱스
//! - `article_tags`: 글과 태그의 다대다(N:M) 관계 테이블
//!
//! 태그는 별도의 생성 API 없이, 글을 저장할 때 이름으로
//! get-or-create 되는 것이 이 시스템의 유일한 생성 경로입니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 태그를 이름순으로 조회합니다.
///
/// `sqlx::query_as::<_, Tag>(sql)` 설명:
/// - `query_as`는 SQL 결과를 지정한 구조체(Tag)로 자동 변환합니다
/// - `<_, Tag>`에서 `_`는 DB 드라이버(SQLite)를 컴파일러가 추론하게 하고,
///   `Tag`는 결과를 매핑할 대상 구조체입니다
/// - `fetch_all`은 모든 행을 Vec으로 반환합니다
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, name FROM tags ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(tags)
}

/// 이름으로 태그 하나를 조회합니다 (정확히 일치하는 이름만).
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Tag)을 반환합니다.
/// 목록 필터 경로에서 사용됩니다: 태그가 없으면 "일치하는 글 없음"으로 처리됩니다.
pub async fn find_tag_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name FROM tags WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(tag)
}

/// 이름으로 태그를 찾고, 없으면 만들어서 반환합니다 (get-or-create).
///
/// ## 처리 흐름
/// 1. 이름으로 조회 — 있으면 그대로 반환
/// 2. 없으면 UUIDv7 ID로 `INSERT OR IGNORE` 실행
/// 3. 다시 조회하여 반환
///
/// ## 왜 INSERT OR IGNORE인가?
/// "조회 후 삽입"은 원자적이지 않습니다. 두 요청이 동시에 같은 새 태그 이름을
/// 저장하면 둘 다 1단계에서 태그를 못 찾고 둘 다 삽입을 시도합니다.
/// name의 UNIQUE 인덱스가 두 번째 삽입을 막고, OR IGNORE가 그 충돌을
/// 에러 없이 삼킨 뒤, 3단계의 재조회가 먼저 들어간 행을 돌려줍니다.
/// 어느 쪽 요청이든 결과적으로 같은 태그 한 행을 받게 됩니다.
pub async fn get_or_create_tag(pool: &SqlitePool, name: &str) -> Result<Tag, AppError> {
    if let Some(tag) = find_tag_by_name(pool, name).await? {
        return Ok(tag);
    }

    // UUIDv7: 시간 기반 UUID로, 생성 순서대로 정렬됩니다
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await?;

    // 우리가 삽입한 행일 수도, 경쟁에서 이긴 다른 요청의 행일 수도 있습니다.
    // 어느 쪽이든 이름으로 재조회하면 정답입니다.
    // ok_or(): Option을 Result로 변환 — None이면 지정한 에러를 반환
    find_tag_by_name(pool, name)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created tag".to_string()))
}

/// 글에 태그를 연결합니다 (다대다 관계 추가).
///
/// `INSERT OR IGNORE`: 이미 동일한 (article_id, tag_id) 조합이 존재하면
/// 에러를 발생시키지 않고 무시합니다. 이를 통해 중복 연결을 방지합니다.
/// (article_tags 테이블의 PRIMARY KEY가 복합키이므로 중복 시 충돌 발생)
pub async fn add_tag_to_article(
    pool: &SqlitePool,
    article_id: &str,
    tag_id: &str,
) -> Result<(), AppError> {
    sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)")
        .bind(article_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// 글에서 모든 태그 연결을 해제합니다.
///
/// 글 수정 시 태그 집합을 통째로 교체할 때, 그리고 글 삭제 시 사용됩니다.
/// 태그 행 자체는 삭제하지 않습니다 — 다른 글이 쓰고 있을 수 있습니다.
pub async fn remove_article_tags(pool: &SqlitePool, article_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = ?")
        .bind(article_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// 특정 글에 연결된 모든 태그를 이름순으로 조회합니다.
///
/// `article_tags` 중간 테이블을 JOIN하여 글에 속한 태그 목록을 가져옵니다.
/// 다대다 관계에서 중간 테이블 JOIN은 관계형 DB의 기본적인 패턴입니다.
///
/// ```sql
/// tags ←── article_tags ──→ articles
///  (1)         (N:M)           (1)
/// ```
pub async fn get_article_tags(pool: &SqlitePool, article_id: &str) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.id
        WHERE at.article_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
