//! Résumé cards for the home listing and detail pages

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::models::{ProfileWithOwner, user::full_name};

/// Number of most recently updated profiles considered for the home page
pub const LISTING_LIMIT: usize = 20;

const SUMMARY_CHARS: usize = 200;

/// Display record of one profile
#[derive(Debug, Clone, Serialize)]
pub struct ResumeCard {
    pub id: i64,
    pub full_name: String,
    pub picture: String,
    pub resume_file: String,
    pub summary: String,
    pub description: String,
}

impl From<ProfileWithOwner> for ResumeCard {
    fn from(row: ProfileWithOwner) -> Self {
        let summary = summary(&row.profile.description);
        ResumeCard {
            id: row.profile.id,
            full_name: full_name(&row.first_name, &row.last_name),
            picture: row.profile.picture,
            resume_file: row.profile.resume_file,
            summary,
            description: row.profile.description,
        }
    }
}

/// Short preview of a description
///
/// The longest prefix of at most 200 characters that ends in whitespace,
/// never crossing a line break, measured on the description with a space
/// appended. Trailing whitespace is trimmed. A first line whose leading 201
/// characters hold no whitespace is cut at 200 characters.
pub fn summary(description: &str) -> String {
    static SUMMARY_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SUMMARY_REGEX
        .get_or_init(|| Regex::new(r"^.{0,200}\s").expect("Failed to compile summary regex"));

    let padded = format!("{} ", description);
    match regex.find(&padded) {
        Some(m) => m.as_str().trim_end().to_string(),
        None => description.chars().take(SUMMARY_CHARS).collect(),
    }
}

/// Home listing: of the given profiles (most recently updated first), the
/// first [`LISTING_LIMIT`] are considered and those without a résumé dropped
pub fn build_listing(profiles: Vec<ProfileWithOwner>) -> Vec<ResumeCard> {
    profiles
        .into_iter()
        .take(LISTING_LIMIT)
        .filter(|row| row.profile.has_resume())
        .map(ResumeCard::from)
        .collect()
}
