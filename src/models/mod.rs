//! Data models for backend API payloads.

pub mod auth;
pub mod note;

pub use auth::{Detail, RegisteredUser, RegisterRequest, TokenPair};
pub use note::Note;
