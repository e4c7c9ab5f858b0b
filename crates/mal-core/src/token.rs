use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;

/// OAuth token material persisted between runs. Opaque outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Loads and saves the credential record under the per-user config dir.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing, unreadable, or undecodable record all read as not-found;
    /// the caller answers that by re-authenticating.
    pub fn load(&self) -> Result<Credential, Error> {
        let bytes = fs::read(&self.path).map_err(|_| Error::TokenNotFound)?;
        let credential = serde_json::from_slice(&bytes).map_err(|_| Error::TokenNotFound)?;
        debug!(path = %self.path.display(), "loaded persisted credential");
        Ok(credential)
    }

    /// Write-then-rename so a failed save never clobbers a good record.
    pub fn save(&self, credential: &Credential) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let bytes =
            serde_json::to_vec_pretty(credential).map_err(|e| Error::Parse(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "saved credential");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn credential() -> Credential {
        Credential {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some("2026-09-01T00:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        let original = credential();
        store.save(&original).unwrap();
        assert_eq!(store.load().unwrap(), original);
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("nested/deeper/token.json"));
        store.save(&credential()).unwrap();
        assert_eq!(store.load().unwrap(), credential());
    }

    #[test]
    fn missing_record_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));
        assert!(matches!(store.load().unwrap_err(), Error::TokenNotFound));
    }

    #[test]
    fn corrupt_record_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, b"not json at all").unwrap();
        let store = TokenStore::new(path);
        assert!(matches!(store.load().unwrap_err(), Error::TokenNotFound));
    }
}
