//! Session extractors
//!
//! [`MaybeUser`] resolves the session cookie for public pages;
//! [`CurrentUser`] additionally rejects anonymous visitors with a redirect to
//! the login form on the home page.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{AppState, error::HubError, models::User, session::token_from_jar};

/// Logged-in user of the request, if any
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|current| &current.user)
    }
}

/// Logged-in user of the request together with the session token
pub struct CurrentUser {
    pub user: User,
    pub session_token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = HubError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = token_from_jar(&jar) else {
            return Ok(MaybeUser(None));
        };

        let Some(user_id) = state.session_manager.user_id(&token).await? else {
            return Ok(MaybeUser(None));
        };

        match state.user_repository.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(MaybeUser(Some(CurrentUser {
                user,
                session_token: token,
            }))),
            Some(_) => {
                warn!("Ignoring session of deactivated user {}", user_id);
                Ok(MaybeUser(None))
            }
            None => Ok(MaybeUser(None)),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = HubError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(current) = MaybeUser::from_request_parts(parts, state).await?;
        current.ok_or_else(|| HubError::Unauthenticated {
            next: parts.uri.path().to_string(),
        })
    }
}
