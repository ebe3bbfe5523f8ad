//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `SessionManager`: JWT token lifecycle with silent refresh
//! - `TokenStore`: pluggable token persistence (keyring, file, memory)
//! - `claims`: unverified JWT payload decoding for expiry checks
//!
//! The access token is short-lived and carries its own expiry; the
//! refresh token is longer-lived and only used to mint new access tokens.

pub mod claims;
pub mod session;
pub mod store;

pub use session::{RefreshTransport, SessionManager, SessionState};
pub use store::{FileTokenStore, KeyringStore, MemoryStore, TokenStore};
