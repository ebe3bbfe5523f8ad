//! Token persistence backends.
//!
//! Tokens are stored under fixed keys through the `TokenStore` trait so
//! the session layer can try an ordered list of backends: the OS keychain
//! first, then a TTL-bearing file in the cache directory when the keychain
//! is unavailable. An in-memory backend is provided for tests and
//! ephemeral sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};

/// Keyring service name
const SERVICE_NAME: &str = "ytnotes";

/// Token file name in the cache directory
const TOKEN_FILE: &str = "tokens.json";

/// Storage key for the short-lived access token
pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";

/// Storage key for the long-lived refresh token
pub const REFRESH_TOKEN: &str = "REFRESH_TOKEN";

/// A key-value store for token strings.
///
/// `ttl` is advisory: backends without expiry support (the keychain)
/// ignore it, while the file backend drops entries once it has passed.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Token storage in the OS keychain.
pub struct KeyringStore;

impl KeyringStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(key: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<()> {
        Self::entry(key)?
            .set_password(value)
            .context("Failed to store token in keychain")
    }

    fn remove(&self, key: &str) -> Result<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Utc::now() > exp).unwrap_or(false)
    }
}

/// Token storage in a JSON file under the cache directory.
///
/// Entries carry an optional absolute expiry so stale tokens read back
/// as absent even though the bytes are still on disk.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(TOKEN_FILE),
        }
    }

    fn load_entries(&self) -> Result<BTreeMap<String, StoredToken>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read token file")?;
        serde_json::from_str(&contents).context("Failed to parse token file")
    }

    fn save_entries(&self, entries: &BTreeMap<String, StoredToken>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load_entries()?;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut entries = self.load_entries().unwrap_or_default();
        entries.insert(
            key.to_string(),
            StoredToken {
                value: value.to_string(),
                expires_at: ttl.map(|d| Utc::now() + d),
            },
        );
        self.save_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.load_entries().unwrap_or_default();
        if entries.remove(key).is_some() {
            self.save_entries(&entries)?;
        }
        Ok(())
    }
}

/// In-memory token storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoredToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            StoredToken {
                value: value.to_string(),
                expires_at: ttl.map(|d| Utc::now() + d),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set(ACCESS_TOKEN, "abc", None).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
        store.remove(ACCESS_TOKEN).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        assert_eq!(store.get(ACCESS_TOKEN).unwrap(), None);

        store.set(ACCESS_TOKEN, "abc", Some(Duration::days(1))).unwrap();
        store.set(REFRESH_TOKEN, "def", Some(Duration::days(7))).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));
        assert_eq!(store.get(REFRESH_TOKEN).unwrap().as_deref(), Some("def"));

        // A second store instance over the same directory sees the data
        let reopened = FileTokenStore::new(dir.path().to_path_buf());
        assert_eq!(reopened.get(ACCESS_TOKEN).unwrap().as_deref(), Some("abc"));

        store.remove(ACCESS_TOKEN).unwrap();
        store.remove(REFRESH_TOKEN).unwrap();
        assert_eq!(store.get(ACCESS_TOKEN).unwrap(), None);
        assert_eq!(store.get(REFRESH_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_store_expired_entry_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        let mut entries = BTreeMap::new();
        entries.insert(
            ACCESS_TOKEN.to_string(),
            StoredToken {
                value: "stale".to_string(),
                expires_at: Some(Utc::now() - Duration::minutes(5)),
            },
        );
        store.save_entries(&entries).unwrap();

        assert_eq!(store.get(ACCESS_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_file_store_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        store.set(REFRESH_TOKEN, "first", None).unwrap();
        store.set(REFRESH_TOKEN, "second", None).unwrap();
        assert_eq!(store.get(REFRESH_TOKEN).unwrap().as_deref(), Some("second"));
    }
}
