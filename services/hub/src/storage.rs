//! Local file storage for uploads
//!
//! Files live under `<media_root>/user_<id>/` and are referenced by their
//! path relative to the media root, which is also their URL under `/media/`.

use rand::{Rng, distributions::Alphanumeric};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

const MAX_NAME_ATTEMPTS: usize = 16;

/// Media directory handle
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write an upload for `user_id` and return its storage reference
    ///
    /// An existing file is never overwritten: a random suffix is added to the
    /// name instead.
    pub async fn save(&self, user_id: i64, file_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let directory = user_directory(user_id);
        fs::create_dir_all(self.root.join(&directory)).await?;

        let base_name = sanitize_file_name(file_name);
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                base_name.clone()
            } else {
                with_suffix(&base_name, &random_suffix())
            };
            let reference = format!("{}/{}", directory, name);

            let opened = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.root.join(&reference))
                .await;
            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };

            file.write_all(bytes).await?;
            file.flush().await?;
            info!("Stored upload {} ({} bytes)", reference, bytes.len());
            return Ok(reference);
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name for {}", base_name),
        ))
    }

    /// Remove a stored upload whose record was never saved; failures are
    /// only logged
    pub async fn discard(&self, reference: &str) {
        match fs::remove_file(self.root.join(reference)).await {
            Ok(()) => info!("Discarded upload {}", reference),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to discard upload {}: {}", reference, e),
        }
    }
}

/// Directory of a user's uploads, relative to the media root
pub fn user_directory(user_id: i64) -> String {
    format!("user_{}", user_id)
}

/// Reduce a client-supplied file name to a safe single path component
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &name[..dot], suffix, &name[dot..]),
        _ => format!("{}_{}", name, suffix),
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}
