//! Repositories for database operations

pub mod comment;
pub mod profile;
pub mod user;

pub use comment::CommentRepository;
pub use profile::ProfileRepository;
pub use user::UserRepository;
