use reqwest::Client;
use tracing::warn;

use crate::error::Error;
use crate::token::Credential;
use crate::types::{AnimePage, EpisodeUpdate, Paging, UpdateResponse};

const BASE_URL: &str = "https://api.myanimelist.net";
const LIST_FIELDS: &str = "list_status,num_episodes,alternative_titles";

/// Authenticated MyAnimeList API v2 session.
///
/// Cheap to share behind an `Arc`; the inner reqwest client is safe for
/// concurrent use, and nothing here is mutated after construction.
pub struct MalClient {
    access_token: String,
    http: Client,
}

impl MalClient {
    pub fn new(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token.clone(),
            http: Client::new(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, "MAL API error");
            Err(Error::Api { status, message })
        }
    }

    /// First page of the user's currently-watching list, most recently
    /// updated first. Subsequent pages are fetched through [`next_page`];
    /// pagination is driven by the UI, not hidden here.
    ///
    /// [`next_page`]: MalClient::next_page
    pub async fn watching_list(&self) -> Result<AnimePage, Error> {
        let resp = self
            .http
            .get(format!("{BASE_URL}/v2/users/@me/animelist"))
            .header("Authorization", self.auth_header())
            .query(&[
                ("status", "watching"),
                ("sort", "list_updated_at"),
                ("fields", LIST_FIELDS),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| Error::Parse(e.to_string()))
    }

    /// Fetch the page behind the cursor's `next` link.
    pub async fn next_page(&self, paging: &Paging) -> Result<AnimePage, Error> {
        let url = paging
            .next
            .as_deref()
            .ok_or_else(|| Error::Parse("cursor has no next page".to_string()))?;

        let resp = self
            .http
            .get(url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| Error::Parse(e.to_string()))
    }

    /// Apply a subset update to one list entry and return the
    /// server-confirmed status.
    pub async fn update_anime(
        &self,
        id: u64,
        update: &EpisodeUpdate,
    ) -> Result<UpdateResponse, Error> {
        let mut form: Vec<(&str, String)> = vec![(
            "num_watched_episodes",
            update.num_watched_episodes.to_string(),
        )];
        if let Some(status) = update.status {
            form.push(("status", status.as_str().to_string()));
        }

        let resp = self
            .http
            .patch(format!("{BASE_URL}/v2/anime/{id}/my_list_status"))
            .header("Authorization", self.auth_header())
            .form(&form)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        resp.json().await.map_err(|e| Error::Parse(e.to_string()))
    }
}
