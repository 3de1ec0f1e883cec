//! Resume Hub entities

pub mod comment;
pub mod profile;
pub mod user;

// Re-export for convenience
pub use comment::{Comment, CommentWithAuthor};
pub use profile::{Profile, ProfileLookup, ProfileWithOwner};
pub use user::{NewUser, User};
