//! Home page: login form and the latest résumés

use axum::{
    extract::{Query, State},
    response::Html,
};

use crate::{
    AppState,
    error::HubResult,
    forms::NextQuery,
    listing::{LISTING_LIMIT, build_listing},
    middleware::MaybeUser,
    templates::{self, page_context},
};

pub async fn index(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<NextQuery>,
) -> HubResult<Html<String>> {
    let rows = state
        .profile_repository
        .recent_with_owner(LISTING_LIMIT as i64)
        .await?;
    let resumes = build_listing(rows);

    let mut context = page_context(maybe_user.user());
    context.insert("next", &query.local_next());
    if !resumes.is_empty() {
        context.insert("resumes", &resumes);
    }

    Ok(templates::render("index.html", &context)?)
}
