//! Profile model: the per-user résumé record

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Profile entity, one per user
///
/// `picture` and `resume_file` hold storage references relative to the
/// media root (`user_<id>/<name>`); an empty string means no file.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub is_special: bool,
    pub picture: String,
    pub resume_file: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn has_resume(&self) -> bool {
        !self.resume_file.is_empty()
    }

    pub fn has_picture(&self) -> bool {
        !self.picture.is_empty()
    }
}

/// Profile joined with the owner's name, as shown on listing and detail pages
#[derive(Debug, Clone, FromRow)]
pub struct ProfileWithOwner {
    #[sqlx(flatten)]
    pub profile: Profile,
    pub first_name: String,
    pub last_name: String,
}

/// Outcome of [`crate::repositories::ProfileRepository::get_or_create`]
#[derive(Debug, Clone)]
pub enum ProfileLookup {
    Found(Profile),
    Created(Profile),
}

impl ProfileLookup {
    pub fn was_created(&self) -> bool {
        matches!(self, ProfileLookup::Created(_))
    }

    pub fn into_profile(self) -> Profile {
        match self {
            ProfileLookup::Found(profile) | ProfileLookup::Created(profile) => profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reference_means_no_file() {
        let mut profile = Profile {
            id: 1,
            user_id: 1,
            is_special: false,
            picture: String::new(),
            resume_file: String::new(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!profile.has_resume());
        assert!(!profile.has_picture());

        profile.picture = "user_1/me.png".to_string();
        assert!(profile.has_picture());
        assert!(!profile.has_resume());
    }
}
