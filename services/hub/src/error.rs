//! Error types for the hub service
//!
//! Business-rule failures are the closed [`ErrorKind`] set and travel to the
//! browser as a redirect to `/error/<key>`. Everything else becomes a
//! rendered error page with a matching status code.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use common::error::{CacheError, DatabaseError};
use thiserror::Error;
use tracing::error;

use crate::{templates, validation::FieldErrors};

/// Business-rule errors reported on the keyed error page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUsernameOrPassword,
    AccountIsNotActivated,
    WrongCurrentPassword,
    RestrictedSection,
    NotSamePasswords,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::InvalidUsernameOrPassword,
        ErrorKind::AccountIsNotActivated,
        ErrorKind::WrongCurrentPassword,
        ErrorKind::RestrictedSection,
        ErrorKind::NotSamePasswords,
    ];

    /// Key used in the `/error/<key>` path
    pub fn key(self) -> &'static str {
        match self {
            ErrorKind::InvalidUsernameOrPassword => "invalid_username_or_password",
            ErrorKind::AccountIsNotActivated => "account_is_not_activated",
            ErrorKind::WrongCurrentPassword => "wrong_current_password",
            ErrorKind::RestrictedSection => "restricted_section",
            ErrorKind::NotSamePasswords => "not_same_passwords",
        }
    }

    /// Human-readable message shown on the error page
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::InvalidUsernameOrPassword => "Invalid username or password!",
            ErrorKind::AccountIsNotActivated => "Your account is not activated!",
            ErrorKind::WrongCurrentPassword => "Wrong current password!",
            ErrorKind::RestrictedSection => "Sorry, You can't have access to this section!",
            ErrorKind::NotSamePasswords => {
                "oops! the two passwords you entered are different!"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Path of the error page for this kind
    pub fn path(self) -> String {
        format!("/error/{}", self.key())
    }
}

/// Custom error type for the hub service
#[derive(Error, Debug)]
pub enum HubError {
    /// Submitted form failed field validation
    #[error("form validation failed")]
    Validation(FieldErrors),

    /// Business rule rejected the request
    #[error("{}", .0.message())]
    Rule(ErrorKind),

    /// Requested record does not exist
    #[error("not found")]
    NotFound,

    /// Page needs a logged-in user; `next` is the path to return to
    #[error("authentication required")]
    Unauthenticated { next: String },

    /// Malformed multipart body
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("session store error: {0}")]
    Session(#[from] CacheError),

    #[error("file storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        match self {
            HubError::Rule(kind) => Redirect::to(&kind.path()).into_response(),
            HubError::Unauthenticated { next } => {
                Redirect::to(&format!("/?next={}", next)).into_response()
            }
            HubError::Validation(errors) => {
                error_page(StatusCode::BAD_REQUEST, "", Some(&errors))
            }
            HubError::NotFound => error_page(
                StatusCode::NOT_FOUND,
                "The page you requested does not exist.",
                None,
            ),
            HubError::Multipart(err) => {
                let status = err.status();
                error_page(status, &err.body_text(), None)
            }
            other => {
                error!("Request failed: {}", other);
                error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side. Please try again later.",
                    None,
                )
            }
        }
    }
}

fn error_page(status: StatusCode, message: &str, field_errors: Option<&FieldErrors>) -> Response {
    let mut context = templates::page_context(None);
    context.insert("error_message", message);
    if let Some(errors) = field_errors {
        context.insert("field_errors", errors);
    }

    match templates::render("error.html", &context) {
        Ok(page) => (status, page).into_response(),
        Err(e) => {
            error!("Failed to render error page: {}", e);
            (status, message.to_string()).into_response()
        }
    }
}

/// Type alias for hub handler results
pub type HubResult<T> = Result<T, HubError>;
