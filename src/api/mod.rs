//! REST API client module for the ytnotes backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! Django backend to authenticate, manage accounts, and generate or
//! fetch video notes.
//!
//! The API uses SimpleJWT bearer token authentication; token pairs are
//! obtained through the `/api/token/` endpoint and renewed through
//! `/api/token/refresh/`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
