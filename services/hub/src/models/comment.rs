//! Comment model

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Comment left by a user on a profile
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub profile_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with its author's display data
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}
