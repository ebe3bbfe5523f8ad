//! Unverified JWT payload decoding.
//!
//! The backend signs its tokens; verifying the signature is its job, not
//! ours. The client only needs the embedded `exp` claim to decide whether
//! a silent refresh is due before making an authenticated request.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Extract the expiry timestamp (seconds since epoch) from a JWT.
///
/// Errors if the token is not three dot-separated segments, the payload
/// is not valid base64url, or the claims carry no `exp`.
pub fn expiry(token: &str) -> Result<i64> {
    let mut segments = token.split('.');
    let payload = segments
        .nth(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Token is not a JWT"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .context("Failed to decode token payload")?;

    let claims: Claims =
        serde_json::from_slice(&bytes).context("Failed to parse token claims")?;

    claims
        .exp
        .ok_or_else(|| anyhow::anyhow!("Token has no exp claim"))
}

/// Check whether a token's embedded expiry has passed.
pub fn is_expired(token: &str) -> Result<bool> {
    Ok(expiry(token)? < Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an unsigned JWT with the given payload JSON.
    fn make_token(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{}.{}.sig", header, body)
    }

    #[test]
    fn test_expiry_is_extracted() {
        let token = make_token(r#"{"token_type":"access","exp":1900000000,"user_id":7}"#);
        assert_eq!(expiry(&token).unwrap(), 1_900_000_000);
    }

    #[test]
    fn test_expired_and_valid_tokens() {
        let past = Utc::now().timestamp() - 60;
        let future = Utc::now().timestamp() + 3600;
        assert!(is_expired(&make_token(&format!(r#"{{"exp":{}}}"#, past))).unwrap());
        assert!(!is_expired(&make_token(&format!(r#"{{"exp":{}}}"#, future))).unwrap());
    }

    #[test]
    fn test_malformed_tokens_error() {
        assert!(expiry("not-a-jwt").is_err());
        assert!(expiry("").is_err());
        assert!(expiry("a.!!!not-base64!!!.c").is_err());
        // Valid encoding but no exp claim
        let token = make_token(r#"{"user_id":7}"#);
        assert!(expiry(&token).is_err());
    }
}
