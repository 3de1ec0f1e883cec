//! HTML templates
//!
//! Pages are `tera` templates compiled into the binary; `.html` names are
//! auto-escaped.

use axum::response::Html;
use serde::Serialize;
use std::sync::OnceLock;
use tera::{Context, Tera};

use crate::models::User;

const TEMPLATES: [(&str, &str); 10] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("change_password.html", include_str!("../templates/change_password.html")),
    ("change_profile_pic.html", include_str!("../templates/change_profile_pic.html")),
    ("resume.html", include_str!("../templates/resume.html")),
    ("doc.html", include_str!("../templates/doc.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("error.html", include_str!("../templates/error.html")),
];

/// The process-wide template engine
pub fn engine() -> &'static Tera {
    static ENGINE: OnceLock<Tera> = OnceLock::new();
    ENGINE.get_or_init(|| build().expect("Failed to compile embedded templates"))
}

fn build() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}

/// Render a page
pub fn render(name: &str, context: &Context) -> tera::Result<Html<String>> {
    engine().render(name, context).map(Html)
}

/// Logged-in user as seen by the navigation bar
#[derive(Serialize)]
struct NavUser<'a> {
    username: &'a str,
    full_name: String,
    is_superuser: bool,
}

/// Context every page starts from
pub fn page_context(user: Option<&User>) -> Context {
    let mut context = Context::new();
    let nav = user.map(|u| NavUser {
        username: &u.username,
        full_name: u.full_name(),
        is_superuser: u.is_superuser,
    });
    context.insert("current_user", &nav);
    context
}
