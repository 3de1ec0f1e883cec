//! Request handlers, one module per area of the site

pub mod accounts;
pub mod home;
pub mod pages;
pub mod profile;
pub mod resume;
