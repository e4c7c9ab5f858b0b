use tracing::{info, warn};

use crate::auth;
use crate::client::MalClient;
use crate::config::Config;
use crate::error::Error;
use crate::token::TokenStore;

/// Produce an authenticated client: the stored credential when one exists,
/// a full PKCE flow otherwise. Freshly acquired credentials are persisted
/// before the client is handed out; any failure propagates unchanged, with
/// no retry.
pub async fn establish(config: &Config) -> Result<MalClient, Error> {
    let store = TokenStore::new(config.token_path.clone());

    match store.load() {
        Ok(credential) => {
            info!("using persisted credential");
            Ok(MalClient::new(&credential))
        }
        Err(Error::TokenNotFound) => {
            warn!("no usable persisted credential, starting the OAuth flow");
            let credential = auth::authorize(&config.client_id).await?;
            store.save(&credential)?;
            Ok(MalClient::new(&credential))
        }
        Err(e) => Err(e),
    }
}
