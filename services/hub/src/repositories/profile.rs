//! Profile repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Profile, ProfileLookup, ProfileWithOwner};

const PROFILE_COLUMNS: &str =
    "id, user_id, is_special, picture, resume_file, description, created_at, updated_at";

const PROFILE_WITH_OWNER: &str = r#"
    SELECT p.id, p.user_id, p.is_special, p.picture, p.resume_file, p.description,
           p.created_at, p.updated_at, u.first_name, u.last_name
    FROM profiles p
    JOIN users u ON u.id = p.user_id
"#;

/// Profile repository
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a profile by ID
    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// The profile of a user, if one was created
    pub async fn find_by_user(&self, user_id: i64) -> DatabaseResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// The profile of a user, created empty when missing
    ///
    /// Concurrent callers for one user all end up with the same row: the
    /// insert is a no-op when the unique `user_id` already exists.
    pub async fn get_or_create(&self, user_id: i64) -> DatabaseResult<ProfileLookup> {
        let created = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(profile) = created {
            info!("Created profile {} for user {}", profile.id, user_id);
            return Ok(ProfileLookup::Created(profile));
        }

        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProfileLookup::Found(profile))
    }

    /// Save the dashboard fields; `resume_file` of `None` keeps the current file
    pub async fn save_resume(
        &self,
        id: i64,
        description: &str,
        resume_file: Option<&str>,
    ) -> DatabaseResult<Profile> {
        info!("Saving résumé of profile {}", id);

        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET description = $2,
                resume_file = COALESCE($3, resume_file),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(description)
        .bind(resume_file)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Save the picture; `None` keeps the current picture but still counts as
    /// an update
    pub async fn save_picture(&self, id: i64, picture: Option<&str>) -> DatabaseResult<Profile> {
        info!("Saving picture of profile {}", id);

        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET picture = COALESCE($2, picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(picture)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn set_special(&self, id: i64, is_special: bool) -> DatabaseResult<()> {
        sqlx::query("UPDATE profiles SET is_special = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_special)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// The most recently updated profiles with their owners' names
    pub async fn recent_with_owner(&self, limit: i64) -> DatabaseResult<Vec<ProfileWithOwner>> {
        let rows = sqlx::query_as::<_, ProfileWithOwner>(&format!(
            "{PROFILE_WITH_OWNER} ORDER BY p.updated_at DESC, p.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One profile with its owner's name
    pub async fn find_with_owner(&self, id: i64) -> DatabaseResult<Option<ProfileWithOwner>> {
        let row = sqlx::query_as::<_, ProfileWithOwner>(&format!(
            "{PROFILE_WITH_OWNER} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
