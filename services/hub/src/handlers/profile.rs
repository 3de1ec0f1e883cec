//! Dashboard (résumé upload) and profile picture pages

use axum::{
    extract::{Multipart, State},
    response::Html,
};
use tracing::info;

use crate::{
    AppState,
    error::{HubError, HubResult},
    forms::{ProfilePicForm, ResumeForm},
    middleware::CurrentUser,
    models::Profile,
    templates::{self, page_context},
};

fn render_dashboard(current: &CurrentUser, profile: Option<&Profile>, saved: bool) -> HubResult<Html<String>> {
    let mut context = page_context(Some(&current.user));
    context.insert(
        "description",
        profile.map(|p| p.description.as_str()).unwrap_or_default(),
    );
    context.insert(
        "current_file",
        &profile
            .filter(|p| p.has_resume())
            .map(|p| p.resume_file.as_str()),
    );
    context.insert("saved", &saved);
    Ok(templates::render("dashboard.html", &context)?)
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HubResult<Html<String>> {
    let profile = state
        .profile_repository
        .find_by_user(current.user.id)
        .await?;
    render_dashboard(&current, profile.as_ref(), false)
}

pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> HubResult<Html<String>> {
    let form = ResumeForm::from_multipart(multipart).await?;
    let errors = form.validate(state.config.max_upload_bytes);
    if !errors.is_empty() {
        return Err(HubError::Validation(errors));
    }

    let lookup = state
        .profile_repository
        .get_or_create(current.user.id)
        .await?;
    if lookup.was_created() {
        info!("First dashboard save for user {}", current.user.username);
    }
    let profile = lookup.into_profile();

    let resume_file = match &form.resume_file {
        Some(upload) => Some(
            state
                .media_storage
                .save(current.user.id, &upload.file_name, &upload.bytes)
                .await?,
        ),
        None => None,
    };

    let saved = state
        .profile_repository
        .save_resume(profile.id, &form.description, resume_file.as_deref())
        .await;
    let profile = match saved {
        Ok(profile) => profile,
        Err(e) => {
            if let Some(reference) = &resume_file {
                state.media_storage.discard(reference).await;
            }
            return Err(e.into());
        }
    };

    render_dashboard(&current, Some(&profile), true)
}

fn render_picture(current: &CurrentUser, profile: Option<&Profile>, changed: bool) -> HubResult<Html<String>> {
    let mut context = page_context(Some(&current.user));
    context.insert(
        "current_picture",
        &profile
            .filter(|p| p.has_picture())
            .map(|p| p.picture.as_str()),
    );
    context.insert("profile_pic_changed", &changed);
    Ok(templates::render("change_profile_pic.html", &context)?)
}

pub async fn change_profile_pic_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HubResult<Html<String>> {
    let profile = state
        .profile_repository
        .find_by_user(current.user.id)
        .await?;
    render_picture(&current, profile.as_ref(), false)
}

pub async fn change_profile_pic(
    State(state): State<AppState>,
    current: CurrentUser,
    multipart: Multipart,
) -> HubResult<Html<String>> {
    let form = ProfilePicForm::from_multipart(multipart).await?;
    let errors = form.validate(state.config.max_upload_bytes);
    if !errors.is_empty() {
        return Err(HubError::Validation(errors));
    }

    let profile = state
        .profile_repository
        .get_or_create(current.user.id)
        .await?
        .into_profile();

    let picture = match &form.picture {
        Some(upload) => Some(
            state
                .media_storage
                .save(current.user.id, &upload.file_name, &upload.bytes)
                .await?,
        ),
        None => None,
    };

    let saved = state
        .profile_repository
        .save_picture(profile.id, picture.as_deref())
        .await;
    let profile = match saved {
        Ok(profile) => profile,
        Err(e) => {
            if let Some(reference) = &picture {
                state.media_storage.discard(reference).await;
            }
            return Err(e.into());
        }
    };

    render_picture(&current, Some(&profile), true)
}
