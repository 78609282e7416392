use serde::{Deserialize, Serialize};

use crate::models::AuthorResponse;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: String,
    pub content: String,
    pub published_at: String,
    pub article_id: String,
    pub author_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub content: String,
    pub published_at: String,
    pub author: AuthorResponse,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub content: String,
}
