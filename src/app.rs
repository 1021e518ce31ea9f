//! Application controller: owns the client-side state and sequences the
//! submit flow.

use parking_lot::Mutex;
use reqwest::Client;

use crate::api::{CatalogClient, StorageClient};
use crate::catalog::CatalogReader;
use crate::config::Config;
use crate::error::UploadError;
use crate::media::TagHints;
use crate::models::{CatalogState, DraftFile, Song, UploadDraft};
use crate::player::Player;
use crate::uploader::Uploader;

/// Client-side session state, owned in one place and handed to view code by
/// reference.
#[derive(Debug)]
pub struct App {
    pub reader: CatalogReader,
    pub uploader: Uploader,
    pub player: Player,
    draft: Mutex<UploadDraft>,
}

impl App {
    /// Wire the components against the configured service addresses, sharing
    /// one HTTP connection pool.
    ///
    /// The pool is built without a request timeout: a hung request stalls
    /// only the operation that issued it.
    pub fn new(config: &Config) -> Self {
        let http = Client::new();
        Self::with_clients(
            StorageClient::new(http.clone(), config.stream_base()),
            CatalogClient::new(http, config.catalog_base()),
            config.max_upload_bytes(),
        )
    }

    pub fn with_clients(
        storage: StorageClient,
        catalog: CatalogClient,
        max_upload_bytes: Option<u64>,
    ) -> Self {
        Self {
            reader: CatalogReader::new(catalog.clone()),
            uploader: Uploader::new(storage, catalog, max_upload_bytes),
            player: Player::new(),
            draft: Mutex::new(UploadDraft::default()),
        }
    }

    /// Initial catalog load.
    pub async fn start(&self) {
        self.reader.fetch_all().await;
    }

    pub fn catalog(&self) -> CatalogState {
        self.reader.catalog()
    }

    /// Snapshot of the upload form state.
    pub fn draft(&self) -> UploadDraft {
        self.draft.lock().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.draft.lock().title = title.into();
    }

    pub fn set_artist(&self, artist: impl Into<String>) {
        self.draft.lock().artist = artist.into();
    }

    /// Attach a file payload. Tag hints fill title/artist only where the
    /// user has not typed anything yet.
    pub fn attach_file(&self, file: DraftFile, hints: TagHints) {
        let mut draft = self.draft.lock();
        draft.file = Some(file);

        if draft.title.trim().is_empty() {
            if let Some(title) = hints.title {
                draft.title = title;
            }
        }
        if draft.artist.trim().is_empty() {
            if let Some(artist) = hints.artist {
                draft.artist = artist;
            }
        }
    }

    /// Submit the current draft through both services.
    ///
    /// On success the draft is cleared and the catalog re-read once; on any
    /// failure the draft stays exactly as the user filled it so they can
    /// retry.
    pub async fn submit_draft(&self) -> Result<(), UploadError> {
        let draft = self.draft();
        self.uploader.submit(&draft).await?;

        self.draft.lock().clear();
        self.reader.fetch_all().await;
        Ok(())
    }

    /// Select the song at `index` (catalog order) for playback.
    pub fn play(&self, index: usize) -> Option<Song> {
        let song = self.reader.songs().get(index).cloned()?;
        self.player.select(song.clone());
        Some(song)
    }
}
