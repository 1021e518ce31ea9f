//! Catalog reader: the client-side cache of the server song list.

use parking_lot::Mutex;

use crate::api::CatalogClient;
use crate::models::{CatalogState, Song};

/// Fetches the song list and holds the last successful read.
///
/// Reads are wholesale replacements, no incremental merge. A failed read
/// keeps whatever was cached before and is reported only to the log: the
/// stale list stays usable and the next trigger retries implicitly.
#[derive(Debug)]
pub struct CatalogReader {
    client: CatalogClient,
    cache: Mutex<CatalogState>,
}

impl CatalogReader {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            cache: Mutex::new(CatalogState::NotLoaded),
        }
    }

    /// Replace the cached catalog with a fresh read.
    ///
    /// Overlapping calls are not coalesced; the last response to resolve
    /// wins.
    pub async fn fetch_all(&self) {
        match self.client.list().await {
            Ok(songs) => {
                tracing::debug!(count = songs.len(), "catalog refreshed");
                *self.cache.lock() = CatalogState::Loaded(songs);
            }
            Err(error) => {
                tracing::warn!(error = %error, "catalog read failed, keeping cached list");
            }
        }
    }

    /// Snapshot of the cached catalog.
    pub fn catalog(&self) -> CatalogState {
        self.cache.lock().clone()
    }

    /// Songs from the cached catalog; empty when nothing has loaded yet.
    pub fn songs(&self) -> Vec<Song> {
        self.cache.lock().songs().to_vec()
    }
}
