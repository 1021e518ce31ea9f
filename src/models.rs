//! Core data model: catalog songs and the in-progress upload draft.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Artist written to the catalog when the uploader leaves the field blank.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A song record as returned by the catalog service.
///
/// Records are created by the catalog service in response to an insert and are
/// immutable from this client's point of view. The `url` points at the stored
/// audio blob and is assigned by the storage service, never by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Service-assigned identifier.
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub url: String,
}

/// Insert payload for the catalog service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub url: String,
}

impl NewSong {
    /// Build the catalog record for a draft once storage has assigned a URL.
    ///
    /// A blank artist becomes [`UNKNOWN_ARTIST`].
    pub fn from_draft(draft: &UploadDraft, url: String) -> Self {
        let artist = if draft.artist.trim().is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            draft.artist.clone()
        };

        Self {
            title: draft.title.clone(),
            artist,
            url,
        }
    }
}

/// Binary payload attached to an upload draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftFile {
    /// Original file name, forwarded as the multipart file name.
    pub name: String,
    /// MIME type, expected to be `audio/*`.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DraftFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The in-progress, unsaved upload form state.
///
/// Transient and client-local: cleared after a successful submit, left intact
/// after a failed one so the user can retry without re-entering anything.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UploadDraft {
    #[validate(length(min = 1, message = "title is required"), custom = "non_blank")]
    pub title: String,
    pub artist: String,
    #[validate(required(message = "an audio file is required"))]
    pub file: Option<DraftFile>,
}

impl UploadDraft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.artist.is_empty() && self.file.is_none()
    }

    /// Reset all fields, dropping the attached file.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("non_blank");
        err.message = Some("title must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Client-side view of the server catalog.
///
/// The catalog is a cache, not a source of truth: it may be stale until the
/// next read. An empty loaded list is distinct from "not yet loaded".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CatalogState {
    /// No read has completed yet.
    #[default]
    NotLoaded,
    /// Last successful read, in server order.
    Loaded(Vec<Song>),
}

impl CatalogState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Songs from the last successful read; empty when nothing is loaded yet.
    pub fn songs(&self) -> &[Song] {
        match self {
            Self::NotLoaded => &[],
            Self::Loaded(songs) => songs,
        }
    }
}
