use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::{debug, warn};

use super::SessionData;

/// Storage file name inside the origin directory
const STORAGE_FILE: &str = "local_storage.json";

/// Key holding the bare bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized login response
pub const USER_KEY: &str = "user";

/// Persistent string key-value store scoped to one origin.
///
/// Every mutation is written straight through to disk. There is no
/// locking; the last writer wins.
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the store for `base_url`'s origin under `root`
    pub fn for_origin(root: &Path, base_url: &Url) -> Result<Self> {
        Self::open(root.join(origin_dir_name(base_url)))
    }

    /// Open the store kept in `dir`, loading existing entries
    pub fn open(dir: PathBuf) -> Result<Self> {
        let path = dir.join(STORAGE_FILE);
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    // Same as a browser dropping a corrupt store: start over
                    warn!(error = %e, path = %path.display(), "Discarding unreadable local storage");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "Local storage opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.persist()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store `token` and `user` from a login response
    pub fn store_session(&mut self, session: &SessionData) -> Result<()> {
        let user = serde_json::to_string(session).context("Failed to serialize session")?;
        self.entries.insert(TOKEN_KEY.to_string(), session.token.clone());
        self.entries.insert(USER_KEY.to_string(), user);
        self.persist()
    }

    /// Rebuild the session from the `user` entry, preferring the `token`
    /// entry for the token itself
    pub fn load_session(&self) -> Result<Option<SessionData>> {
        let Some(user) = self.get_item(USER_KEY) else {
            return Ok(None);
        };
        let mut session: SessionData =
            serde_json::from_str(user).context("Failed to parse stored user")?;
        if let Some(token) = self.get_item(TOKEN_KEY) {
            session.token = token.to_string();
        }
        Ok(Some(session))
    }

    /// Remove the session keys, leaving any other entries alone
    pub fn clear_session(&mut self) -> Result<()> {
        let removed_token = self.entries.remove(TOKEN_KEY).is_some();
        let removed_user = self.entries.remove(USER_KEY).is_some();
        if removed_token || removed_user {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Directory name for an origin, e.g. `http_localhost_8080`
pub fn origin_dir_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown");
    let port = url
        .port_or_known_default()
        .map(|p| p.to_string())
        .unwrap_or_default();
    format!("{}_{}_{}", url.scheme(), host, port)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
