//! Documentation gate, about, error and health pages

use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse},
};
use serde_json::json;
use tracing::error;

use crate::{
    AppState,
    error::{ErrorKind, HubError, HubResult},
    middleware::MaybeUser,
    models::{Profile, User},
    templates::{self, page_context},
};

/// Documentation is for logged-in users whose own profile is special
pub fn doc_access(user: Option<&User>, profile: Option<&Profile>) -> Result<(), ErrorKind> {
    let user = user.ok_or(ErrorKind::RestrictedSection)?;
    let profile = profile
        .filter(|p| p.user_id == user.id)
        .ok_or(ErrorKind::RestrictedSection)?;
    if !profile.is_special {
        return Err(ErrorKind::RestrictedSection);
    }
    Ok(())
}

pub async fn doc(State(state): State<AppState>, maybe_user: MaybeUser) -> HubResult<Html<String>> {
    let profile = match maybe_user.user() {
        Some(user) => state.profile_repository.find_by_user(user.id).await?,
        None => None,
    };
    doc_access(maybe_user.user(), profile.as_ref()).map_err(HubError::Rule)?;

    Ok(templates::render("doc.html", &page_context(maybe_user.user()))?)
}

pub async fn about(maybe_user: MaybeUser) -> HubResult<Html<String>> {
    Ok(templates::render("about.html", &page_context(maybe_user.user()))?)
}

/// Keyed error page; unknown keys show no message
pub async fn error_page(maybe_user: MaybeUser, Path(key): Path<String>) -> HubResult<Html<String>> {
    let message = ErrorKind::from_key(&key)
        .map(ErrorKind::message)
        .unwrap_or_default();

    let mut context = page_context(maybe_user.user());
    context.insert("error_message", message);
    Ok(templates::render("error.html", &context)?)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let redis = match state.session_manager.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            error!("Redis health check failed: {}", e);
            false
        }
    };

    Json(json!({
        "status": if database && redis { "ok" } else { "degraded" },
        "service": "resume-hub",
        "database": database,
        "redis": redis,
    }))
}
