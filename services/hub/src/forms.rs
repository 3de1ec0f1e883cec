//! Forms submitted by the pages
//!
//! Url-encoded forms deserialize with every field defaulted, so a missing
//! field is reported by `validate` like an empty one instead of failing
//! extraction. Upload forms are read from multipart bodies.

use axum::extract::Multipart;
use serde::Deserialize;

use crate::error::HubError;
use crate::validation::{
    FieldErrors, REQUIRED, validate_email, validate_max_length, validate_password,
    validate_required, validate_username,
};

const DESCRIPTION_MAX_CHARS: usize = 10_000;
const COMMENT_MAX_CHARS: usize = 5_000;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Registration form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub repeat_password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl RegisterForm {
    pub fn passwords_match(&self) -> bool {
        self.password == self.repeat_password
    }

    /// Field checks; username availability is checked against the store
    /// separately
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("username", validate_username(self.username.trim()));
        errors.check("password", validate_password(&self.password));
        errors.check("repeat_password", validate_password(&self.repeat_password));
        errors.check("first_name", validate_required(&self.first_name, 30));
        errors.check("last_name", validate_required(&self.last_name, 150));
        errors.check("email", validate_email(self.email.trim()));
        errors
    }
}

/// Login form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Local path to return to after logging in
    pub next: Option<String>,
}

impl LoginForm {
    /// Where to send the user after a successful login
    pub fn redirect_target(&self) -> &str {
        self.next
            .as_deref()
            .filter(|next| is_local_path(next))
            .unwrap_or("/")
    }
}

/// Query string of the home page
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

impl NextQuery {
    pub fn local_next(&self) -> Option<&str> {
        self.next.as_deref().filter(|next| is_local_path(next))
    }
}

/// Same-site path that cannot be turned into an open redirect
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Password change form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub repeat_new_password: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("current_password", validate_password(&self.current_password));
        errors.check("new_password", validate_password(&self.new_password));
        errors.check(
            "repeat_new_password",
            validate_password(&self.repeat_new_password),
        );
        errors
    }

    pub fn new_passwords_match(&self) -> bool {
        self.new_password == self.repeat_new_password
    }
}

/// Comment form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub content: String,
    pub resume_id: String,
}

impl CommentForm {
    /// Validated résumé id, or the collected field errors
    pub fn validate(&self) -> Result<i64, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("content", validate_required(&self.content, COMMENT_MAX_CHARS));

        let resume_id = self.resume_id.trim().parse::<i64>();
        match &resume_id {
            Ok(_) => {}
            Err(_) if self.resume_id.trim().is_empty() => errors.push("resume_id", REQUIRED),
            Err(_) => errors.push("resume_id", "Enter a whole number."),
        }

        match resume_id {
            Ok(id) if errors.is_empty() => Ok(id),
            _ => Err(errors),
        }
    }
}

/// A file received in a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Dashboard form: résumé file and description
#[derive(Debug, Default)]
pub struct ResumeForm {
    pub description: String,
    pub resume_file: Option<Upload>,
}

impl ResumeForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, HubError> {
        let mut form = ResumeForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("description") => form.description = field.text().await?,
                Some("resume_file") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?.to_vec();
                    form.resume_file = non_empty_upload(file_name, bytes);
                }
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn validate(&self, max_upload_bytes: usize) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(
            "description",
            validate_max_length(&self.description, DESCRIPTION_MAX_CHARS),
        );
        if let Some(upload) = &self.resume_file {
            errors.check("resume_file", validate_size(upload, max_upload_bytes));
        }
        errors
    }
}

/// Profile picture form
#[derive(Debug, Default)]
pub struct ProfilePicForm {
    pub picture: Option<Upload>,
}

impl ProfilePicForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, HubError> {
        let mut form = ProfilePicForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            if name.as_deref() == Some("picture") {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                form.picture = non_empty_upload(file_name, bytes);
            }
        }
        Ok(form)
    }

    pub fn validate(&self, max_upload_bytes: usize) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(upload) = &self.picture {
            errors.check("picture", validate_size(upload, max_upload_bytes));
            errors.check("picture", validate_image(upload));
        }
        errors
    }
}

/// Browsers send an empty, unnamed part for an untouched file input
fn non_empty_upload(file_name: String, bytes: Vec<u8>) -> Option<Upload> {
    if file_name.is_empty() && bytes.is_empty() {
        None
    } else {
        Some(Upload { file_name, bytes })
    }
}

fn validate_size(upload: &Upload, max_upload_bytes: usize) -> Result<(), String> {
    if upload.bytes.is_empty() {
        return Err("The submitted file is empty.".to_string());
    }
    if upload.bytes.len() > max_upload_bytes {
        return Err(format!(
            "Ensure this file is at most {} bytes (it is {}).",
            max_upload_bytes,
            upload.bytes.len()
        ));
    }
    Ok(())
}

fn validate_image(upload: &Upload) -> Result<(), String> {
    const INVALID: &str = "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

    let extension = upload.extension().unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "File extension \"{}\" is not allowed. Allowed extensions are: {}.",
            extension,
            IMAGE_EXTENSIONS.join(", ")
        ));
    }
    if !looks_like_image(&upload.bytes) {
        return Err(INVALID.to_string());
    }
    Ok(())
}

/// Magic-number check for the accepted image formats
fn looks_like_image(bytes: &[u8]) -> bool {
    bytes.starts_with(b"\x89PNG\r\n\x1a\n")
        || bytes.starts_with(b"\xFF\xD8\xFF")
        || bytes.starts_with(b"GIF87a")
        || bytes.starts_with(b"GIF89a")
        || bytes.starts_with(b"BM")
        || (bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP")
}
