//! Authentication payload types.

use serde::{Deserialize, Serialize};

/// Token pair returned by `POST /api/token/`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Body for `POST /api/user/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Created account, as echoed back by the registration endpoint.
/// The password is write-only on the backend and never returned.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Generic `{"detail": "..."}` message envelope used by the password
/// reset endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Detail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_pair() {
        let json = r#"{"access":"eyJhbGci.header.sig","refresh":"eyJyZWZy.body.sig"}"#;
        let pair: TokenPair = serde_json::from_str(json).unwrap();
        assert_eq!(pair.access, "eyJhbGci.header.sig");
        assert_eq!(pair.refresh, "eyJyZWZy.body.sig");
    }

    #[test]
    fn test_parse_registered_user_without_email() {
        let json = r#"{"id":3,"username":"sam"}"#;
        let user: RegisteredUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.username, "sam");
        assert_eq!(user.email, None);
    }
}
