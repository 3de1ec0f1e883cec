//! Résumé detail page and comment submission

use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use serde::Serialize;

use crate::{
    AppState,
    error::{HubError, HubResult},
    forms::CommentForm,
    listing::ResumeCard,
    middleware::{CurrentUser, MaybeUser},
    models::{CommentWithAuthor, user::full_name},
    templates::{self, page_context},
};

/// Comment as displayed under a résumé
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub author: String,
    pub content: String,
    pub posted_at: String,
}

impl From<CommentWithAuthor> for CommentView {
    fn from(row: CommentWithAuthor) -> Self {
        let name = full_name(&row.first_name, &row.last_name);
        CommentView {
            author: if name.is_empty() { row.username } else { name },
            content: row.comment.content,
            posted_at: row.comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn resume_detail(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> HubResult<Html<String>> {
    let id: i64 = id.parse().map_err(|_| HubError::NotFound)?;
    let row = state
        .profile_repository
        .find_with_owner(id)
        .await?
        .ok_or(HubError::NotFound)?;

    let comments: Vec<CommentView> = state
        .comment_repository
        .for_profile(row.profile.id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    let mut context = page_context(maybe_user.user());
    context.insert("resume", &ResumeCard::from(row));
    context.insert("comments", &comments);
    Ok(templates::render("resume.html", &context)?)
}

/// Comments are only posted from the résumé page
pub async fn comment_page(_current: CurrentUser) -> Redirect {
    Redirect::to("/")
}

pub async fn comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<CommentForm>,
) -> HubResult<Redirect> {
    let resume_id = form.validate().map_err(HubError::Validation)?;
    let profile = state
        .profile_repository
        .find_by_id(resume_id)
        .await?
        .ok_or(HubError::NotFound)?;

    state
        .comment_repository
        .create(current.user.id, profile.id, form.content.trim())
        .await?;

    Ok(Redirect::to(&format!("/resume/{}/", profile.id)))
}
