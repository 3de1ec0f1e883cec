//! Resume Hub web application
//!
//! Users register, upload a résumé and a profile picture, browse each
//! other's résumés and leave comments. Pages are rendered on the server;
//! accounts, profiles and comments live in PostgreSQL, login sessions in
//! Redis and uploads on the local file system.

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod session;
pub mod state;
pub mod storage;
pub mod templates;
pub mod validation;

pub use state::AppState;

/// Schema migrations of the hub database
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
