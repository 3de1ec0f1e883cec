//! Comment repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Comment, CommentWithAuthor};

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment by `user_id` on `profile_id`
    pub async fn create(&self, user_id: i64, profile_id: i64, content: &str) -> DatabaseResult<Comment> {
        info!("User {} commenting on profile {}", user_id, profile_id);

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, profile_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, profile_id, content, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(profile_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Comments on a profile, newest first
    pub async fn for_profile(&self, profile_id: i64) -> DatabaseResult<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.user_id, c.profile_id, c.content, c.created_at, c.updated_at,
                   u.username, u.first_name, u.last_name
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.profile_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
