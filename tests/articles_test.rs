//! 글 도메인 통합 테스트
//!
//! 인메모리 SQLite에 실제 마이그레이션을 적용한 뒤,
//! 서비스 계층의 공개 API를 통해 관찰 가능한 동작을 검증합니다.
//! HTTP 계층은 얇은 번역층이므로 여기서는 다루지 않습니다.
//!
//! 커버하는 성질:
//! - 페이지네이션: 범위 밖 페이지(극단값 포함), 페이지 연결(중복/누락 없음),
//!   정렬(동시각이면 id 내림차순 보조 정렬)
//! - 태그 필터: 필터 일치, 미지의 태그, get-or-create 멱등성
//! - 접근 정책: 작성자/편집자/제3자/익명 × 보기/수정/삭제
//! - 검증: 중복 슬러그, 낚시성 요약, 실패 시 아무것도 저장 안 됨
//! - 삭제: 리뷰/태그 연결이 함께 정리됨

use geuldam::db;
use geuldam::error::AppError;
use geuldam::models::{Article, ArticleRequest, CreateReviewRequest, User};
use geuldam::services::articles;
use geuldam::services::voter::ArticleAction;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// 인메모리 SQLite 풀을 만들고 마이그레이션을 적용합니다.
///
/// max_connections(1): `sqlite::memory:`는 연결마다 별도의 DB이므로,
/// 연결을 하나로 제한해야 모든 쿼리가 같은 DB를 봅니다.
async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

async fn seed_user(pool: &SqlitePool, username: &str, roles: &str) -> User {
    db::users::create_user(
        pool,
        &uuid::Uuid::now_v7().to_string(),
        &format!("{} person", username),
        username,
        &format!("{}@example.com", username),
        "$argon2id$not-a-real-hash",
        roles,
    )
    .await
    .unwrap()
}

/// 발행 시각을 제어한 글을 DB에 직접 심습니다.
///
/// n분에 발행된 것으로 기록하므로 n이 클수록 최신 글입니다. (n < 60)
async fn seed_article(pool: &SqlitePool, author: &User, n: u32) -> Article {
    let article = Article {
        id: uuid::Uuid::now_v7().to_string(),
        title: format!("Article {}", n),
        slug: format!("article-{}", n),
        summary: format!("Summary of article {}", n),
        content: "This content is comfortably longer than the minimum.".to_string(),
        published_at: format!("2025-01-01T00:{:02}:00.000Z", n),
        author_id: author.id.clone(),
    };
    db::insert_article(pool, &article).await.unwrap()
}

/// 서비스 계층의 생성 경로를 지나는 유효한 요청을 만듭니다.
fn article_request(title: &str, tags: &[&str]) -> ArticleRequest {
    ArticleRequest {
        title: title.to_string(),
        slug: None,
        summary: format!("A short note about {}", title),
        content: "This content is comfortably longer than the minimum.".to_string(),
        published_at: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

const USER_ROLES: &str = r#"["ROLE_USER"]"#;
const EDITOR_ROLES: &str = r#"["ROLE_USER","ROLE_EDITOR"]"#;

// ─────────────────────────── 페이지네이션 ───────────────────────────

#[tokio::test]
async fn test_page_beyond_last_is_empty_with_unchanged_total() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    for n in 1..=12 {
        seed_article(&pool, &author, n).await;
    }

    // 12건 → 마지막 페이지는 2. 3페이지부터는 내용 없이 메타데이터만 유지됩니다.
    let just_past = articles::list_latest(&pool, 3, None).await.unwrap();
    assert!(just_past.results().is_empty());
    assert_eq!(just_past.num_results(), 12);
    assert_eq!(just_past.last_page(), 2);

    let far_past = articles::list_latest(&pool, 99, None).await.unwrap();
    assert!(far_past.results().is_empty());
    assert_eq!(far_past.num_results(), 12);
}

#[tokio::test]
async fn test_huge_page_number_behaves_like_any_page_beyond_last() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    for n in 1..=3 {
        seed_article(&pool, &author, n).await;
    }

    // 쿼리 문자열의 page에는 i64 상한 근처의 값도 그대로 들어올 수 있습니다.
    // 그런 페이지도 범위 밖 페이지일 뿐 — 1페이지 내용이 다시 나오면 안 됩니다.
    let huge = articles::list_latest(&pool, 922_337_203_685_477_582, None)
        .await
        .unwrap();
    assert!(huge.results().is_empty());
    assert_eq!(huge.num_results(), 3);
    assert_eq!(huge.last_page(), 1);
    assert!(!huge.has_next_page());

    let max = articles::list_latest(&pool, i64::MAX, None).await.unwrap();
    assert!(max.results().is_empty());
    assert_eq!(max.num_results(), 3);
}

#[tokio::test]
async fn test_pages_concatenate_in_order_without_gaps_or_duplicates() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let mut expected: Vec<String> = Vec::new();
    for n in 1..=25 {
        expected.push(seed_article(&pool, &author, n).await.id);
    }
    // 최신 글(n이 큰 것)이 먼저 나와야 합니다.
    expected.reverse();

    let mut collected: Vec<String> = Vec::new();
    for page in 1..=3 {
        let paginator = articles::list_latest(&pool, page, None).await.unwrap();
        assert_eq!(paginator.current_page(), page);
        assert_eq!(paginator.num_results(), 25);
        assert_eq!(paginator.last_page(), 3);

        let expected_len = if page < 3 { 10 } else { 5 };
        assert_eq!(paginator.results().len(), expected_len);

        collected.extend(paginator.results().iter().map(|item| item.id.clone()));
    }

    // 페이지 1..3을 이어 붙이면 전체 집합과 정확히 일치 — 중복도 누락도 없습니다.
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn test_identical_timestamps_fall_back_to_id_order_across_pages() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    // 열두 글이 모두 같은 순간에 발행되면 첫 번째 정렬 키가 아무것도
    // 가르지 못하므로, 두 번째 키(id 내림차순)가 페이지 경계를 결정합니다.
    let mut expected: Vec<String> = Vec::new();
    for n in 1..=12 {
        let article = Article {
            id: uuid::Uuid::now_v7().to_string(),
            title: format!("Simultaneous {}", n),
            slug: format!("simultaneous-{}", n),
            summary: "Twelve notes published in the same instant.".to_string(),
            content: "This content is comfortably longer than the minimum.".to_string(),
            published_at: "2025-01-01T12:00:00.000Z".to_string(),
            author_id: author.id.clone(),
        };
        expected.push(db::insert_article(&pool, &article).await.unwrap().id);
    }
    // TEXT id의 내림차순 — SQLite의 ORDER BY와 같은 바이트 순서 비교입니다.
    expected.sort();
    expected.reverse();

    let mut collected: Vec<String> = Vec::new();
    for page in 1..=2 {
        let paginator = articles::list_latest(&pool, page, None).await.unwrap();
        assert_eq!(paginator.results().len(), if page == 1 { 10 } else { 2 });
        collected.extend(paginator.results().iter().map(|item| item.id.clone()));
    }

    // 같은 시각이어도 경계에서 중복되거나 빠지는 글이 없어야 합니다.
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn test_listing_is_newest_first_regardless_of_insert_order() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    // 시간 순서와 무관하게 삽입해도 정렬은 발행 시각이 결정해야 합니다.
    for n in [3, 1, 4, 2] {
        seed_article(&pool, &author, n).await;
    }

    let paginator = articles::list_latest(&pool, 1, None).await.unwrap();
    let results = paginator.results();
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].title, "Article 4");
    for window in results.windows(2) {
        assert!(window[0].published_at >= window[1].published_at);
    }
}

#[tokio::test]
async fn test_future_dated_articles_are_hidden_from_listing() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    seed_article(&pool, &author, 1).await;
    seed_article(&pool, &author, 2).await;

    let scheduled = Article {
        id: uuid::Uuid::now_v7().to_string(),
        title: "Scheduled".to_string(),
        slug: "scheduled".to_string(),
        summary: "Not out yet".to_string(),
        content: "This content is comfortably longer than the minimum.".to_string(),
        published_at: "9999-01-01T00:00:00.000Z".to_string(),
        author_id: author.id.clone(),
    };
    let scheduled = db::insert_article(&pool, &scheduled).await.unwrap();

    let paginator = articles::list_latest(&pool, 1, None).await.unwrap();
    assert_eq!(paginator.num_results(), 2);
    assert!(paginator.results().iter().all(|item| item.id != scheduled.id));
}

// ─────────────────────────── 태그 필터 ───────────────────────────

#[tokio::test]
async fn test_tag_filter_returns_only_tagged_articles() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    articles::create_article(&pool, &author, &article_request("Rust Post One", &["rust"]))
        .await
        .unwrap();
    articles::create_article(
        &pool,
        &author,
        &article_request("Rust Post Two", &["rust", "web"]),
    )
    .await
    .unwrap();
    articles::create_article(&pool, &author, &article_request("Cooking Post", &["cooking"]))
        .await
        .unwrap();
    articles::create_article(&pool, &author, &article_request("Plain Post", &[]))
        .await
        .unwrap();

    let filtered = articles::list_latest(&pool, 1, Some("rust")).await.unwrap();
    assert_eq!(filtered.num_results(), 2);
    assert!(filtered
        .results()
        .iter()
        .all(|item| item.tags.iter().any(|tag| tag.name == "rust")));

    // 필터 없는 목록은 전부 보입니다.
    let all = articles::list_latest(&pool, 1, None).await.unwrap();
    assert_eq!(all.num_results(), 4);
}

#[tokio::test]
async fn test_unknown_tag_yields_empty_listing_not_error() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    articles::create_article(&pool, &author, &article_request("Rust Post One", &["rust"]))
        .await
        .unwrap();

    let paginator = articles::list_latest(&pool, 1, Some("no-such-tag")).await.unwrap();
    assert!(paginator.results().is_empty());
    assert_eq!(paginator.num_results(), 0);
    assert_eq!(paginator.last_page(), 0);
    assert!(!paginator.has_to_paginate());
}

#[tokio::test]
async fn test_tag_get_or_create_is_idempotent() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let first = articles::create_article(&pool, &author, &article_request("Rust Post One", &["shared"]))
        .await
        .unwrap();
    let second = articles::create_article(&pool, &author, &article_request("Rust Post Two", &["shared"]))
        .await
        .unwrap();

    // 같은 이름으로 두 번 요청해도 태그 행은 하나여야 합니다.
    let (tag_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM tags WHERE name = ?")
        .bind("shared")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tag_count, 1);

    let first_tags = db::get_article_tags(&pool, &first.id).await.unwrap();
    let second_tags = db::get_article_tags(&pool, &second.id).await.unwrap();
    assert_eq!(first_tags.len(), 1);
    assert_eq!(first_tags[0].id, second_tags[0].id);
}

// ─────────────────────────── 접근 정책 ───────────────────────────

#[tokio::test]
async fn test_access_matrix_for_every_action() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    let editor = seed_user(&pool, "editor", EDITOR_ROLES).await;
    let stranger = seed_user(&pool, "stranger", USER_ROLES).await;
    let article = seed_article(&pool, &author, 1).await;

    for action in [ArticleAction::Show, ArticleAction::Edit, ArticleAction::Delete] {
        // 작성자와 편집자는 모든 작업이 허용됩니다.
        assert!(articles::get_authorized(&pool, &article.id, Some(&author), action)
            .await
            .is_ok());
        assert!(articles::get_authorized(&pool, &article.id, Some(&editor), action)
            .await
            .is_ok());

        // 제3자는 403 — 누구인지는 알지만 권한이 없습니다.
        let denied = articles::get_authorized(&pool, &article.id, Some(&stranger), action)
            .await
            .unwrap_err();
        assert!(matches!(denied, AppError::Forbidden(_)));

        // 익명은 401 — 누구인지부터 밝혀야 합니다.
        let anonymous = articles::get_authorized(&pool, &article.id, None, action)
            .await
            .unwrap_err();
        assert!(matches!(anonymous, AppError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn test_missing_article_is_not_found_before_policy() {
    let pool = setup_pool().await;
    let editor = seed_user(&pool, "editor", EDITOR_ROLES).await;

    // 없는 글은 권한과 무관하게 404입니다.
    let err = articles::get_authorized(&pool, "no-such-id", Some(&editor), ArticleAction::Show)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

// ─────────────────────────── 검증 ───────────────────────────

#[tokio::test]
async fn test_duplicate_slug_is_a_validation_error() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    articles::create_article(&pool, &author, &article_request("My First Post", &[]))
        .await
        .unwrap();

    // 같은 제목 → 같은 슬러그 → 검증 위반 (DB 에러가 아니라)
    let err = articles::create_article(&pool, &author, &article_request("My First Post", &[]))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "slug");
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_validation_persists_nothing() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let mut req = article_request("Linked Note", &["rust"]);
    req.summary = "Check out http://example.com now!".to_string();

    let err = articles::create_article(&pool, &author, &req).await.unwrap_err();
    match err {
        AppError::Validation(violations) => {
            assert!(violations.iter().any(|v| v.field == "summary"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }

    // 글도, 태그도 만들어지지 않았어야 합니다 — 검증이 부수 효과보다 먼저입니다.
    assert!(db::get_article_by_slug(&pool, "linked-note")
        .await
        .unwrap()
        .is_none());
    let (tag_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tag_count, 0);
}

#[tokio::test]
async fn test_five_tags_fail_four_succeed() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let err = articles::create_article(
        &pool,
        &author,
        &article_request("Tagged Note", &["a", "b", "c", "d", "e"]),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(violations) => {
            assert!(violations.iter().any(|v| v.field == "tags"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }

    let article = articles::create_article(
        &pool,
        &author,
        &article_request("Tagged Note", &["a", "b", "c", "d"]),
    )
    .await
    .unwrap();
    assert_eq!(db::get_article_tags(&pool, &article.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_normalizes_slug_and_published_at() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let mut req = article_request("Launch Note", &[]);
    req.slug = Some("Hello World! 123".to_string());
    req.published_at = Some("2025-06-01T09:30:00+09:00".to_string());

    let article = articles::create_article(&pool, &author, &req).await.unwrap();
    // 클라이언트가 보낸 슬러그도 슬러그화를 거칩니다.
    assert_eq!(article.slug, "hello-world-123");
    // +09:00 발행 시각은 UTC 고정폭 포맷으로 정규화됩니다.
    assert_eq!(article.published_at, "2025-06-01T00:30:00.000Z");
}

// ─────────────────────────── 수정/삭제 ───────────────────────────

#[tokio::test]
async fn test_update_replaces_the_whole_tag_set() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;

    let article = articles::create_article(&pool, &author, &article_request("Garden Note", &["a", "b"]))
        .await
        .unwrap();

    let updated = articles::update_article(
        &pool,
        &author,
        &article.id,
        &article_request("Garden Note", &["b", "c"]),
    )
    .await
    .unwrap();
    let names: Vec<String> = db::get_article_tags(&pool, &updated.id)
        .await
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["b", "c"]);

    // 태그를 보내지 않으면 전부 떼어냅니다 (PUT의 전체 교체 의미론).
    articles::update_article(&pool, &author, &article.id, &article_request("Garden Note", &[]))
        .await
        .unwrap();
    assert!(db::get_article_tags(&pool, &article.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_leaves_no_orphaned_reviews_or_tag_links() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    let reviewer = seed_user(&pool, "reviewer", USER_ROLES).await;

    let article = articles::create_article(&pool, &author, &article_request("Doomed Note", &["rust", "web"]))
        .await
        .unwrap();
    articles::add_review(
        &pool,
        &reviewer,
        &article.id,
        &CreateReviewRequest {
            content: "A fine read.".to_string(),
        },
    )
    .await
    .unwrap();

    articles::delete_article(&pool, &author, &article.id).await.unwrap();

    assert!(db::get_article(&pool, &article.id).await.unwrap().is_none());

    let (review_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM reviews WHERE article_id = ?")
        .bind(&article.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(review_count, 0);

    let (link_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM article_tags WHERE article_id = ?")
        .bind(&article.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(link_count, 0);

    // 태그 자체는 다른 글에서 재사용할 수 있도록 남습니다.
    let (tag_count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(tag_count, 2);
}

// ─────────────────────────── 리뷰 ───────────────────────────

#[tokio::test]
async fn test_review_requires_existing_article_and_content() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    let reviewer = seed_user(&pool, "reviewer", USER_ROLES).await;

    let missing = articles::add_review(
        &pool,
        &reviewer,
        "no-such-id",
        &CreateReviewRequest {
            content: "A fine read.".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(missing, AppError::NotFound));

    let article = seed_article(&pool, &author, 1).await;
    let blank = articles::add_review(
        &pool,
        &reviewer,
        &article.id,
        &CreateReviewRequest {
            content: "   ".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(blank, AppError::Validation(_)));
}

#[tokio::test]
async fn test_detail_view_carries_reviews_newest_first() {
    let pool = setup_pool().await;
    let author = seed_user(&pool, "author", USER_ROLES).await;
    let reviewer = seed_user(&pool, "reviewer", USER_ROLES).await;
    let article = seed_article(&pool, &author, 1).await;

    articles::add_review(
        &pool,
        &reviewer,
        &article.id,
        &CreateReviewRequest {
            content: "First impression.".to_string(),
        },
    )
    .await
    .unwrap();
    articles::add_review(
        &pool,
        &reviewer,
        &article.id,
        &CreateReviewRequest {
            content: "Second thoughts.".to_string(),
        },
    )
    .await
    .unwrap();

    let detail = db::to_detail_view(&pool, article).await.unwrap();
    assert_eq!(detail.reviews.len(), 2);
    for window in detail.reviews.windows(2) {
        assert!(window[0].published_at >= window[1].published_at);
    }
}
