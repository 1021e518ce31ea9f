//! Application error types and handling.
//!
//! The upload flow is a two-step write across two independently-failable
//! services, so its errors are typed per step: a caller can tell "nothing
//! happened" (`Storage`) from "a blob was stored but never registered"
//! (`CatalogWrite`).

use reqwest::StatusCode;

/// Transport-level failure talking to a backend service.
///
/// Shared by the storage and catalog clients; the upload error below records
/// which phase it came from.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("service returned {0}")]
    Status(StatusCode),

    /// Response body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response decoded but a required field was missing or empty.
    #[error("response missing field `{0}`")]
    MissingField(&'static str),
}

/// Stable discriminant for [`UploadError`], used by the submit state machine
/// and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorKind {
    Validation,
    InFlight,
    Storage,
    CatalogWrite,
}

/// Failure of a single upload submission.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Local precondition failure; zero network calls were made.
    #[error("invalid draft: {0}")]
    Validation(String),

    /// Another submission is still unresolved on this uploader.
    #[error("an upload is already in progress")]
    InFlight,

    /// Phase A failed: the file never made it into storage (or storage
    /// answered without a usable URL). No catalog entry was created.
    #[error("storage upload failed: {0}")]
    Storage(#[source] ServiceError),

    /// Phase B failed after phase A succeeded: the blob at `url` is stored
    /// but unreferenced. Retrying re-runs both phases.
    #[error("catalog write failed, stored blob at {url} is unreferenced: {source}")]
    CatalogWrite {
        url: String,
        #[source]
        source: ServiceError,
    },
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            Self::Validation(_) => UploadErrorKind::Validation,
            Self::InFlight => UploadErrorKind::InFlight,
            Self::Storage(_) => UploadErrorKind::Storage,
            Self::CatalogWrite { .. } => UploadErrorKind::CatalogWrite,
        }
    }

    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            UploadErrorKind::Validation => "VALIDATION_ERROR",
            UploadErrorKind::InFlight => "UPLOAD_IN_FLIGHT",
            UploadErrorKind::Storage => "STORAGE_UPLOAD_FAILED",
            UploadErrorKind::CatalogWrite => "CATALOG_WRITE_FAILED",
        }
    }

    /// URL of the blob left behind in storage, when this failure produced one.
    pub fn orphaned_blob(&self) -> Option<&str> {
        match self {
            Self::CatalogWrite { url, .. } => Some(url),
            _ => None,
        }
    }
}
