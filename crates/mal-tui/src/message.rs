//! Message enum and deferred effects — everything the update loop processes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use mal_core::types::{AnimePage, UpdateResponse};
use mal_core::{Error, MalClient};
use ratatui::crossterm::event::KeyEvent;

/// One unit of deferred work. Spawned by the app loop onto the runtime;
/// resolves to exactly one message that re-enters the loop. `update` never
/// awaits one of these inline.
pub type Effect = Pin<Box<dyn Future<Output = Msg> + Send>>;

pub fn effect<F>(fut: F) -> Effect
where
    F: Future<Output = Msg> + Send + 'static,
{
    Box::pin(fut)
}

/// Everything the update loop can process, in strict arrival order.
pub enum Msg {
    Key(KeyEvent),
    /// 100ms animation pulse.
    Tick,
    /// Session bootstrap finished (token store or full OAuth flow).
    SessionReady(Result<Arc<MalClient>, Error>),
    /// Initial watching-list fetch finished.
    ListLoaded(Result<AnimePage, Error>),
    /// A next-page fetch finished; entries are appended, never replaced.
    PageLoaded(Result<AnimePage, Error>),
    /// An episode-count mutation finished for the entry with this id.
    EntryUpdated {
        id: u64,
        result: Result<UpdateResponse, Error>,
    },
}
