use serde::{Deserialize, Serialize};

use crate::models::{AuthorResponse, ReviewResponse, Tag};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub published_at: String,
    pub author_id: String,
}

/// 목록 화면용 투영(projection) — content와 리뷰는 싣지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleListItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub published_at: String,
    pub author: AuthorResponse,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub summary: String,
    pub content: String,
    pub published_at: String,
    pub author: AuthorResponse,
    pub tags: Vec<Tag>,
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    /// serde(default): 필드가 빠지면 빈 문자열 — "비어 있음" 검증에 걸립니다.
    #[serde(default)]
    pub title: String,
    /// None이면 제목에서 슬러그를 생성합니다.
    pub slug: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    /// RFC 3339 문자열. None이면 현재 시각으로 발행됩니다.
    pub published_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub tag: Option<String>,
}
