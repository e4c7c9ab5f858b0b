use thiserror::Error as ThisError;

/// Everything that can go wrong below the UI layer.
///
/// Only `TokenNotFound` is recoverable (the session bootstrap answers it by
/// re-running the OAuth flow); the rest take the process down.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("MAL_CLIENT_ID is not set; create an API client id at myanimelist.net and export it")]
    MissingClientId,

    /// Covers a missing, unreadable, or undecodable token record.
    #[error("no usable persisted token")]
    TokenNotFound,

    #[error("token store I/O: {0}")]
    TokenIo(#[from] std::io::Error),

    #[error("OAuth callback listener: {0}")]
    Listener(String),

    #[error("authorization code exchange failed: {0}")]
    Exchange(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MAL API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed API payload: {0}")]
    Parse(String),
}
