//! Routing table

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    AppState,
    handlers::{accounts, home, pages, profile, resume},
};

/// Multipart overhead allowed on top of the largest file
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the router for the hub service
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    let media = ServeDir::new(state.config.media_root.clone());
    let assets = ServeDir::new(state.config.static_root.clone());

    Router::new()
        .route("/", get(home::index))
        .route(
            "/register/",
            get(accounts::register_page).post(accounts::register),
        )
        .route("/login/", get(accounts::login_page).post(accounts::login))
        .route("/logout/", get(accounts::logout))
        .route(
            "/change_password/",
            get(accounts::change_password_page).post(accounts::change_password),
        )
        .route(
            "/dashboard/",
            get(profile::dashboard_page).post(profile::dashboard),
        )
        .route(
            "/change_profile_pic/",
            get(profile::change_profile_pic_page).post(profile::change_profile_pic),
        )
        .route("/resume/:id/", get(resume::resume_detail))
        .route(
            "/comment/",
            get(resume::comment_page).post(resume::comment),
        )
        .route("/doc/", get(pages::doc))
        .route("/about/", get(pages::about))
        .route("/error/:key", get(pages::error_page))
        .route("/health", get(pages::health_check))
        .nest_service("/media", media)
        .nest_service("/static", assets)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
