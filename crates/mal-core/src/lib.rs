//! Domain crate for malwatch: the MyAnimeList API client, the OAuth2 PKCE
//! flow with its one-shot callback listener, token persistence, and session
//! bootstrap. No UI concerns live here.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod token;
pub mod types;

pub use client::MalClient;
pub use error::Error;
