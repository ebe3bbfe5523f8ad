//! Core library for the YT Notes Generator client.
//!
//! This crate provides everything a frontend needs to talk to the ytnotes
//! backend: an authenticated API client, JWT session management with
//! persistent token storage, and a small Markdown renderer for the
//! generated notes.
//!
//! The backend issues SimpleJWT token pairs; session handling lives in
//! [`auth::SessionManager`], which persists the pair across restarts and
//! silently refreshes expired access tokens.

pub mod api;
pub mod auth;
pub mod config;
pub mod markdown;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionManager, SessionState};
pub use config::Config;
