//! Application state shared across handlers

use common::cache::RedisPool;
use sqlx::PgPool;
use std::sync::Arc;

use crate::{
    config::HubConfig,
    repositories::{CommentRepository, ProfileRepository, UserRepository},
    session::SessionManager,
    storage::MediaStorage,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<HubConfig>,
    pub user_repository: UserRepository,
    pub profile_repository: ProfileRepository,
    pub comment_repository: CommentRepository,
    pub session_manager: SessionManager,
    pub media_storage: MediaStorage,
}

impl AppState {
    pub fn new(db_pool: PgPool, redis_pool: RedisPool, config: HubConfig) -> Self {
        let session_manager =
            SessionManager::new(redis_pool, config.session_ttl_seconds, config.secure_cookies);
        let media_storage = MediaStorage::new(config.media_root.clone());

        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            profile_repository: ProfileRepository::new(db_pool.clone()),
            comment_repository: CommentRepository::new(db_pool.clone()),
            db_pool,
            config: Arc::new(config),
            session_manager,
            media_storage,
        }
    }
}
