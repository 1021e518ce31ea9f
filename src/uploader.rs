//! Two-phase upload orchestration.
//!
//! Phase A stores the binary with the stream service; phase B registers the
//! metadata with the catalog service. The two phases are not a transaction:
//! a phase B failure leaves the stored blob orphaned, and the error carries
//! that blob's URL instead of pretending nothing happened. There is no
//! compensating delete and no rollback.

use parking_lot::Mutex;
use validator::Validate;

use crate::api::{CatalogClient, StorageClient};
use crate::error::{UploadError, UploadErrorKind};
use crate::media;
use crate::models::{NewSong, UploadDraft};

/// Submission progress, queryable by view code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    /// A submission holds the single in-flight slot.
    Uploading,
    /// Last submission failed; the draft it came from is untouched.
    Failed(UploadErrorKind),
}

/// Sequences one upload at a time across the two services.
#[derive(Debug)]
pub struct Uploader {
    storage: StorageClient,
    catalog: CatalogClient,
    max_upload_bytes: Option<u64>,
    state: Mutex<SubmitState>,
}

impl Uploader {
    pub fn new(
        storage: StorageClient,
        catalog: CatalogClient,
        max_upload_bytes: Option<u64>,
    ) -> Self {
        Self {
            storage,
            catalog,
            max_upload_bytes,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Current submit state.
    pub fn state(&self) -> SubmitState {
        *self.state.lock()
    }

    pub fn in_flight(&self) -> bool {
        self.state() == SubmitState::Uploading
    }

    /// Run one submission to completion.
    ///
    /// Preconditions are checked locally before any network call; a draft
    /// that fails them produces zero side effects. While a submission is
    /// unresolved, any further `submit` returns [`UploadError::InFlight`]
    /// without touching the network. The draft itself is never mutated here;
    /// clearing it after success is the caller's job.
    pub async fn submit(&self, draft: &UploadDraft) -> Result<(), UploadError> {
        self.check_preconditions(draft)?;
        self.begin()?;

        let result = self.run_phases(draft).await;

        if let Err(error) = &result {
            tracing::warn!(code = error.code(), error = %error, "upload failed");
        }

        *self.state.lock() = match &result {
            Ok(()) => SubmitState::Idle,
            Err(error) => SubmitState::Failed(error.kind()),
        };

        result
    }

    /// Local validation only; no network, no state transition.
    fn check_preconditions(&self, draft: &UploadDraft) -> Result<(), UploadError> {
        draft
            .validate()
            .map_err(|e| UploadError::Validation(e.to_string()))?;

        if let Some(file) = draft.file.as_ref() {
            if !media::looks_like_audio(&file.name, &file.content_type) {
                return Err(UploadError::Validation(format!(
                    "{} does not look like an audio file",
                    file.name
                )));
            }

            if let Some(cap) = self.max_upload_bytes {
                if file.size() > cap {
                    return Err(UploadError::Validation(format!(
                        "file is {} bytes, the limit is {}",
                        file.size(),
                        cap
                    )));
                }
            }
        }

        Ok(())
    }

    /// Claim the single in-flight slot.
    fn begin(&self) -> Result<(), UploadError> {
        let mut state = self.state.lock();
        if *state == SubmitState::Uploading {
            return Err(UploadError::InFlight);
        }
        *state = SubmitState::Uploading;
        Ok(())
    }

    /// Phase A, then phase B, strictly in that order. Phase B's request is
    /// not even constructed until phase A's response has been validated.
    async fn run_phases(&self, draft: &UploadDraft) -> Result<(), UploadError> {
        let Some(file) = draft.file.as_ref() else {
            return Err(UploadError::Validation(
                "an audio file is required".to_string(),
            ));
        };

        let url = self
            .storage
            .upload(file)
            .await
            .map_err(UploadError::Storage)?;
        tracing::info!(url = %url, file = %file.name, "file stored");

        let record = NewSong::from_draft(draft, url.clone());
        self.catalog
            .insert(&record)
            .await
            .map_err(|source| UploadError::CatalogWrite { url, source })?;
        tracing::info!(title = %record.title, artist = %record.artist, "song registered");

        Ok(())
    }
}
