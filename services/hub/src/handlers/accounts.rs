//! Registration, login, logout and password change

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::{
    AppState,
    error::{ErrorKind, HubError, HubResult},
    forms::{ChangePasswordForm, LoginForm, RegisterForm},
    middleware::{CurrentUser, MaybeUser},
    models::{NewUser, User},
    repositories::user::{USERNAME_CONSTRAINT, hash_password, verify_password},
    session::{clear_session_cookie, token_from_jar},
    templates::{self, page_context},
};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

pub async fn register_page(maybe_user: MaybeUser) -> HubResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let mut context = page_context(None);
    context.insert("registered", &false);
    Ok(templates::render("register.html", &context)?.into_response())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    maybe_user: MaybeUser,
    Form(form): Form<RegisterForm>,
) -> HubResult<Response> {
    if maybe_user.0.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    if !form.passwords_match() {
        return Err(HubError::Rule(ErrorKind::NotSamePasswords));
    }

    let username = form.username.trim();
    let mut errors = form.validate();
    if !errors.has("username") && state.user_repository.username_exists(username).await? {
        errors.push("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return Err(HubError::Validation(errors));
    }

    let new_user = NewUser {
        username: username.to_string(),
        password_hash: hash_password(&form.password)?,
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        email: form.email.trim().to_string(),
        is_superuser: false,
    };
    let user = match state.user_repository.create(&new_user).await {
        Ok(user) => user,
        Err(e) if e.violates(USERNAME_CONSTRAINT) => {
            errors.push("username", USERNAME_TAKEN);
            return Err(HubError::Validation(errors));
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.session_manager.create_session(user.id).await?;
    state.user_repository.record_login(user.id).await?;
    info!("Registered user {}", user.username);

    let mut context = page_context(Some(&user));
    context.insert("registered", &true);
    let page = templates::render("register.html", &context)?;
    let jar = jar.add(state.session_manager.session_cookie(token));
    Ok((jar, page).into_response())
}

/// The login form lives on the home page
pub async fn login_page() -> Redirect {
    Redirect::to("/")
}

/// Decide whether matching credentials may open a session
pub fn login_outcome(authenticated: Option<User>) -> Result<User, ErrorKind> {
    match authenticated {
        None => Err(ErrorKind::InvalidUsernameOrPassword),
        Some(user) if !user.is_active => Err(ErrorKind::AccountIsNotActivated),
        Some(user) => Ok(user),
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> HubResult<(CookieJar, Redirect)> {
    let authenticated = state
        .user_repository
        .authenticate(&form.username, &form.password)
        .await?;
    let user = login_outcome(authenticated).map_err(|kind| {
        warn!("Rejected login for {}: {}", form.username, kind.key());
        HubError::Rule(kind)
    })?;

    if let Some(previous) = token_from_jar(&jar) {
        state.session_manager.delete_session(&previous).await?;
    }
    let token = state.session_manager.create_session(user.id).await?;
    state.user_repository.record_login(user.id).await?;
    info!("User {} logged in", user.username);

    let jar = jar.add(state.session_manager.session_cookie(token));
    Ok((jar, Redirect::to(form.redirect_target())))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    current: CurrentUser,
) -> HubResult<(CookieJar, Redirect)> {
    state
        .session_manager
        .delete_session(&current.session_token)
        .await?;
    info!("User {} logged out", current.user.username);

    Ok((clear_session_cookie(jar), Redirect::to("/")))
}

pub async fn change_password_page(current: CurrentUser) -> HubResult<Html<String>> {
    let mut context = page_context(Some(&current.user));
    context.insert("password_changed", &false);
    Ok(templates::render("change_password.html", &context)?)
}

/// Field validation, then the current password, then the repeated new one
pub fn check_password_change(form: &ChangePasswordForm, password_hash: &str) -> HubResult<()> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(HubError::Validation(errors));
    }
    if !verify_password(&form.current_password, password_hash) {
        return Err(HubError::Rule(ErrorKind::WrongCurrentPassword));
    }
    if !form.new_passwords_match() {
        return Err(HubError::Rule(ErrorKind::NotSamePasswords));
    }
    Ok(())
}

pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(form): Form<ChangePasswordForm>,
) -> HubResult<Html<String>> {
    check_password_change(&form, &current.user.password_hash)?;

    let password_hash = hash_password(&form.new_password)?;
    state
        .user_repository
        .set_password_hash(current.user.id, &password_hash)
        .await?;

    let mut context = page_context(Some(&current.user));
    context.insert("password_changed", &true);
    Ok(templates::render("change_password.html", &context)?)
}
