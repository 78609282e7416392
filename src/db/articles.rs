//! # 글(Article) 데이터베이스 쿼리 모듈
//!
//! `articles` 테이블에 대한 조회/삽입/수정/삭제 쿼리와,
//! 목록/상세 응답을 조립하는 투영(projection) 함수들이 정의되어 있습니다.
//!
//! 이 모듈의 핵심은 `find_latest()` — 페이지네이션 파이프라인입니다.
//! COUNT 쿼리와 페이지 쿼리가 하나의 WHERE 절 문자열을 공유하므로,
//! "전체 개수"와 "페이지 내용"이 서로 다른 조건으로 어긋날 수 없습니다.

use crate::db::{reviews, tags, users};
use crate::error::{AppError, Violation};
use crate::models::*;
use crate::pagination::{page_offset, Paginator, PAGE_SIZE};
// SqlitePool: SQLite 연결 풀. 여러 비동기 작업이 동시에 DB에 접근할 수 있게 합니다.
// &SqlitePool로 받으면 소유권을 가져가지 않고 빌려서(borrow) 사용합니다.
use sqlx::SqlitePool;

/// ID로 단일 글을 조회합니다.
///
/// # 반환값
/// - `Ok(Some(Article))`: 글을 찾은 경우
/// - `Ok(None)`: 해당 ID의 글이 없는 경우
/// - `Err(AppError)`: DB 에러 발생 시
pub async fn get_article(pool: &SqlitePool, id: &str) -> Result<Option<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, summary, content, published_at, author_id
        FROM articles
        WHERE id = ?
        "#,
        // ↑ SQL의 `?`는 파라미터 바인딩 자리표시자입니다.
        //   아래 .bind(id)로 실제 값을 안전하게 대입합니다.
        //   이 방식은 SQL 인젝션 공격을 방지합니다.
    )
    .bind(id)
    // .fetch_optional(): 결과가 0행이면 None, 1행이면 Some(Article)을 반환합니다.
    .fetch_optional(pool)
    .await?;

    Ok(article)
}

/// 슬러그로 단일 글을 조회합니다 (상세 페이지 경로에서 사용).
pub async fn get_article_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> Result<Option<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, summary, content, published_at, author_id
        FROM articles
        WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(article)
}

/// 최신 글 목록을 한 페이지 조회합니다 — 페이지네이션 파이프라인의 본체.
///
/// # 매개변수
/// - `pool`: DB 연결 풀
/// - `page`: 페이지 번호 (1부터 시작, 0 이하는 1로 보정)
/// - `tag`: Some이면 이 태그가 붙은 글만 (None이면 전체)
///
/// # 동작
/// 1. 두 쿼리가 공유할 WHERE 절을 한 번만 구성합니다.
///    - `published_at <= now`: 미래로 예약된 글은 목록에서 제외
///    - 태그 필터는 EXISTS 서브쿼리로 추가 (있을 때만)
/// 2. COUNT 쿼리로 조건을 통과한 전체 행 수를 먼저 구합니다.
/// 3. 같은 조건 + ORDER BY + LIMIT/OFFSET으로 한 페이지만 가져옵니다.
/// 4. 각 행을 목록 투영(작성자 + 태그 포함)으로 변환해 Paginator에 담습니다.
///
/// 정렬은 published_at 내림차순이고, 같은 시각이면 id 내림차순입니다.
/// 두 번째 정렬 키가 없으면 같은 시각의 글들이 페이지 경계에서
/// 중복되거나 누락될 수 있습니다 (OFFSET 기반 페이지네이션의 고전적 함정).
pub async fn find_latest(
    pool: &SqlitePool,
    page: i64,
    tag: Option<&Tag>,
) -> Result<Paginator<ArticleListItem>, AppError> {
    // ── 공유 WHERE 절 구성 ──
    // strftime(..., 'now'): 저장 포맷과 동일한 ISO 8601 UTC 문자열을 SQL 안에서 생성.
    // 같은 고정폭 포맷끼리는 문자열 비교가 곧 시간 비교입니다.
    let mut where_clause =
        String::from("WHERE a.published_at <= strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
    if tag.is_some() {
        // EXISTS: 관계 테이블에 (글, 태그) 행이 있는 글만 통과시킵니다.
        where_clause.push_str(
            " AND EXISTS (SELECT 1 FROM article_tags at \
             WHERE at.article_id = a.id AND at.tag_id = ?)",
        );
    }

    // ── 1단계: 전체 개수 ──
    // format!으로 SQL을 조립하지만, 사용자 입력은 전부 ? 바인딩으로만 들어갑니다.
    // (WHERE 절 문자열 자체는 코드에 고정된 조각들로만 구성됨)
    let count_sql = format!("SELECT COUNT(*) FROM articles a {}", where_clause);
    let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
    if let Some(tag) = tag {
        count_query = count_query.bind(&tag.id);
    }
    // (i64,): 단일 컬럼 행은 1-튜플로 받습니다. `.0`으로 값을 꺼냅니다.
    let num_results = count_query.fetch_one(pool).await?.0;

    // ── 2단계: 한 페이지 조회 ──
    // COUNT와 동일한 where_clause를 그대로 사용합니다.
    let page_sql = format!(
        "SELECT a.id, a.title, a.slug, a.summary, a.content, a.published_at, a.author_id \
         FROM articles a {} \
         ORDER BY a.published_at DESC, a.id DESC \
         LIMIT ? OFFSET ?",
        where_clause
    );
    let mut page_query = sqlx::query_as::<_, Article>(&page_sql);
    if let Some(tag) = tag {
        page_query = page_query.bind(&tag.id);
    }
    let rows = page_query
        .bind(PAGE_SIZE)
        .bind(page_offset(page, PAGE_SIZE))
        .fetch_all(pool)
        .await?;

    // ── 3단계: 목록 투영으로 변환 ──
    // 페이지 크기가 작아(최대 10행) 행마다 작성자/태그를 조회해도 부담이 없습니다.
    // 성능보다 코드 단순성을 우선한 접근입니다.
    let mut items = Vec::with_capacity(rows.len());
    for article in rows {
        items.push(to_list_view(pool, article).await?);
    }

    Ok(Paginator::new(items, page, PAGE_SIZE, num_results))
}

/// Article 행을 목록 응답 형태로 변환합니다 (작성자 요약 + 태그 포함, content 제외).
///
/// author_id는 외래키이므로 작성자는 반드시 존재해야 합니다.
/// 없다면 데이터 정합성이 깨진 것이므로 Internal 에러로 처리합니다.
pub async fn to_list_view(
    pool: &SqlitePool,
    article: Article,
) -> Result<ArticleListItem, AppError> {
    let author = users::find_by_id(pool, &article.author_id)
        .await?
        .ok_or(AppError::Internal("Article author not found".to_string()))?;
    let article_tags = tags::get_article_tags(pool, &article.id).await?;

    Ok(ArticleListItem {
        id: article.id,
        title: article.title,
        slug: article.slug,
        summary: article.summary,
        published_at: article.published_at,
        author: AuthorResponse::from(author),
        tags: article_tags,
    })
}

/// Article 행을 상세 응답 형태로 변환합니다 (content + 리뷰 목록 포함).
pub async fn to_detail_view(
    pool: &SqlitePool,
    article: Article,
) -> Result<ArticleDetail, AppError> {
    let author = users::find_by_id(pool, &article.author_id)
        .await?
        .ok_or(AppError::Internal("Article author not found".to_string()))?;
    let article_tags = tags::get_article_tags(pool, &article.id).await?;

    // 리뷰마다 작성자를 함께 실어 보냅니다.
    let article_reviews = reviews::list_article_reviews(pool, &article.id).await?;
    let mut review_views = Vec::with_capacity(article_reviews.len());
    for review in article_reviews {
        let review_author = users::find_by_id(pool, &review.author_id)
            .await?
            .ok_or(AppError::Internal("Review author not found".to_string()))?;
        review_views.push(ReviewResponse {
            id: review.id,
            content: review.content,
            published_at: review.published_at,
            author: AuthorResponse::from(review_author),
        });
    }

    Ok(ArticleDetail {
        id: article.id,
        title: article.title,
        slug: article.slug,
        summary: article.summary,
        content: article.content,
        published_at: article.published_at,
        author: AuthorResponse::from(author),
        tags: article_tags,
        reviews: review_views,
    })
}

/// 슬러그 중복을 검증 위반으로 변환합니다.
///
/// DB의 UNIQUE 인덱스가 최종 방어선이고, 이 함수가 그 위반을
/// 클라이언트가 이해할 수 있는 형태로 번역합니다.
fn duplicate_slug() -> AppError {
    AppError::Validation(vec![Violation::new(
        "slug",
        "This slug is already used by another article.",
    )])
}

/// 새 글을 삽입하고, 저장된 행을 다시 조회하여 반환합니다.
///
/// 슬러그 UNIQUE 위반은 검증 실패(400)로 변환됩니다.
/// 검증 단계의 사전 중복 확인과 삽입 사이에 다른 요청이 끼어들 수 있으므로,
/// 여기서도 같은 위반으로 처리해야 응답이 일관됩니다.
pub async fn insert_article(pool: &SqlitePool, article: &Article) -> Result<Article, AppError> {
    sqlx::query(
        r#"
        INSERT INTO articles (id, title, slug, summary, content, published_at, author_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.id)
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&article.summary)
    .bind(&article.content)
    .bind(&article.published_at)
    .bind(&article.author_id)
    .execute(pool)
    .await
    // map_err: 에러를 다른 에러로 변환합니다.
    // is_unique_violation(): sqlx가 DB 드라이버의 에러 코드를 해석해 줍니다.
    .map_err(|err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate_slug(),
        _ => AppError::from(err),
    })?;

    // 생성 직후 조회하여 완전한 Article 객체를 반환합니다
    get_article(pool, &article.id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created article".to_string()))
}

/// 글 전체를 수정합니다 (PUT 방식 — 서비스 계층에서 병합된 완성본을 받습니다).
pub async fn update_article(pool: &SqlitePool, article: &Article) -> Result<Article, AppError> {
    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, slug = ?, summary = ?, content = ?, published_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&article.summary)
    .bind(&article.content)
    .bind(&article.published_at)
    .bind(&article.id)
    .execute(pool)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate_slug(),
        _ => AppError::from(err),
    })?;

    get_article(pool, &article.id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve updated article".to_string()))
}

/// 글을 삭제합니다.
///
/// 순서: 태그 연결 해제 → 리뷰 삭제 → 글 삭제.
/// 글은 리뷰를 소유하므로 글이 지워지면 리뷰도 함께 사라져야 합니다.
/// 태그 자체는 다른 글에도 붙을 수 있으므로 연결만 끊고 남겨둡니다.
///
/// # 반환값
/// - `Ok(true)`: 삭제 성공 (1행 이상 영향)
/// - `Ok(false)`: 해당 ID의 글이 없음 (0행 영향)
pub async fn delete_article(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    tags::remove_article_tags(pool, id).await?;

    sqlx::query("DELETE FROM reviews WHERE article_id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    // .rows_affected(): 쿼리에 의해 영향받은 행 수를 반환합니다.
    Ok(result.rows_affected() > 0)
}
