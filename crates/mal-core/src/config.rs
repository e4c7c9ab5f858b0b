use std::env;
use std::path::PathBuf;

use crate::error::Error;

/// Environment variable carrying the MAL API client id.
pub const CLIENT_ID_VAR: &str = "MAL_CLIENT_ID";

const APP_DIR: &str = "malwatch";

/// Process configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub token_path: PathBuf,
}

impl Config {
    pub fn new(client_id: impl Into<String>, token_path: PathBuf) -> Result<Self, Error> {
        let client_id = client_id.into();
        if client_id.is_empty() {
            return Err(Error::MissingClientId);
        }
        Ok(Self {
            client_id,
            token_path,
        })
    }

    /// Read the client id from the environment and compute per-user paths.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(
            env::var(CLIENT_ID_VAR).unwrap_or_default(),
            default_token_path(),
        )
    }
}

fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
        .join("token.json")
}

/// Per-user data directory, used for the log file.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR)
}
