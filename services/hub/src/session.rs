//! Login sessions stored in Redis
//!
//! A session is an opaque random token kept in the `hub_session` cookie and
//! mapped to a user id under the Redis key `session:<token>`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::{cache::RedisPool, error::CacheResult};
use tracing::{info, warn};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "hub_session";

/// Session manager for handling user sessions in Redis
#[derive(Clone)]
pub struct SessionManager {
    redis_pool: RedisPool,
    ttl_seconds: u64,
    secure_cookies: bool,
}

impl SessionManager {
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64, secure_cookies: bool) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
            secure_cookies,
        }
    }

    /// Open a session for a user and return its token
    pub async fn create_session(&self, user_id: i64) -> CacheResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.redis_pool
            .set(&session_key(&token), &user_id.to_string(), Some(self.ttl_seconds))
            .await?;
        info!("Created session for user {}", user_id);
        Ok(token)
    }

    /// User id bound to a token, if the session is still alive
    pub async fn user_id(&self, token: &str) -> CacheResult<Option<i64>> {
        if !is_well_formed(token) {
            return Ok(None);
        }

        let value = self.redis_pool.get(&session_key(token)).await?;
        Ok(value.and_then(|v| match v.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Discarding session with malformed user id");
                None
            }
        }))
    }

    /// End a session
    pub async fn delete_session(&self, token: &str) -> CacheResult<()> {
        if self.redis_pool.delete(&session_key(token)).await? {
            info!("Deleted session");
        }
        Ok(())
    }

    /// Cookie carrying a freshly created session token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies)
            .build()
    }

    /// Redis health status
    pub async fn health_check(&self) -> CacheResult<bool> {
        self.redis_pool.health_check().await
    }
}

/// Session token sent by the browser, if any
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Jar with the session cookie removed
pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

fn is_well_formed(token: &str) -> bool {
    token.len() == 32 && token.bytes().all(|b| b.is_ascii_hexdigit())
}
