//! API client for communicating with the ytnotes backend.
//!
//! This module provides the `ApiClient` struct for authenticating,
//! managing accounts, and generating or fetching video notes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::auth::{RefreshTransport, SessionManager};
use crate::models::{Detail, Note, RegisteredUser, RegisterRequest, TokenPair};

use super::ApiError;

/// HTTP request timeout in seconds.
/// Note generation waits on transcription and an LLM server-side, so
/// this is generous compared to a plain CRUD API.
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// API client for the ytnotes backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    // ===== Authentication =====

    /// Log in with username and password, returning the token pair.
    /// The caller is expected to hand the pair to `SessionManager::store`.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let url = self.url("/api/token/");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse token response")
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let url = self.url("/api/token/refresh/");
        debug!("Refreshing access token");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh_token }))
            .send()
            .await
            .context("Failed to send refresh request")?;

        let response = Self::check_response(response).await?;
        let parsed: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse refresh response")?;
        Ok(parsed.access)
    }

    /// Create a new account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisteredUser> {
        let url = self.url("/api/user/register/");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send registration request")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse registration response")
    }

    /// Request a password reset e-mail for the given address.
    pub async fn request_password_reset(&self, email: &str) -> Result<Detail> {
        let url = self.url("/api/password-reset/");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .context("Failed to send password reset request")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse password reset response")
    }

    /// Complete a password reset with the uid/token pair from the e-mail.
    pub async fn confirm_password_reset(
        &self,
        uid: &str,
        token: &str,
        new_password: &str,
    ) -> Result<Detail> {
        let url = self.url("/api/password-reset-confirm/");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "uid": uid,
                "token": token,
                "new_password": new_password,
            }))
            .send()
            .await
            .context("Failed to send password reset confirmation")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse password reset confirmation")
    }

    // ===== Notes =====

    /// Submit a video link and wait for the generated notes.
    pub async fn generate_notes(
        &self,
        session: &SessionManager,
        youtube_link: &str,
    ) -> Result<Note> {
        let url = self.url("/api/notes/generate/");
        debug!(link = youtube_link, "Requesting note generation");

        let response = session
            .authorize(self.client.post(&url))
            .json(&serde_json::json!({ "youtube_link": youtube_link }))
            .send()
            .await
            .context("Failed to send note generation request")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse generated note")
    }

    /// Fetch all notes belonging to the authenticated user.
    pub async fn list_notes(&self, session: &SessionManager) -> Result<Vec<Note>> {
        let url = self.url("/api/notes/");

        let response = session
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to fetch notes")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse notes list")
    }

    /// Fetch a single note by id.
    pub async fn note(&self, session: &SessionManager, id: i64) -> Result<Note> {
        let url = self.url(&format!("/api/notes/{}/", id));

        let response = session
            .authorize(self.client.get(&url))
            .send()
            .await
            .context("Failed to fetch note")?;

        let response = Self::check_response(response).await?;
        response.json().await.context("Failed to parse note")
    }

    /// Delete a note by id.
    pub async fn delete_note(&self, session: &SessionManager, id: i64) -> Result<()> {
        let url = self.url(&format!("/api/notes/{}/", id));

        let response = session
            .authorize(self.client.delete(&url))
            .send()
            .await
            .context("Failed to delete note")?;

        Self::check_response(response).await?;
        Ok(())
    }

    /// Liveness probe; requires no authentication.
    pub async fn ping(&self) -> Result<()> {
        let url = self.url("/api/ping/");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the backend")?;

        Self::check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RefreshTransport for ApiClient {
    async fn refresh_access(&self, refresh_token: &str) -> Result<String> {
        self.refresh(refresh_token).await
    }
}
