//! Video note model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated set of notes for one video, as serialized by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub youtube_title: String,
    pub youtube_link: String,
    /// Markdown text; render with [`crate::markdown::to_html`].
    pub notes_content: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
