//! Local audio file helpers for building upload drafts.

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::prelude::Accessor;
use lofty::read_from_path;

use crate::models::DraftFile;

/// Supported audio file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "wav", "m4a", "aac", "wma", "opus", "aiff", "ape",
];

/// Check if a file has a supported audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// MIME type for a file name, guessed from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "opus" => "audio/opus",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "wma" => "audio/x-ms-wma",
        "aiff" => "audio/aiff",
        _ => "application/octet-stream",
    }
}

/// Whether a draft payload plausibly holds audio, by MIME type or file name.
pub fn looks_like_audio(name: &str, content_type: &str) -> bool {
    content_type.starts_with("audio/") || is_audio_file(Path::new(name))
}

/// Title/artist read from a file's tags, for prefilling a draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagHints {
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Errors attaching a local file to the draft.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a local file into a draft payload, plus any tag hints it carries.
///
/// Tag reading is best-effort: a file whose tags cannot be parsed still
/// attaches, with empty hints.
pub fn load_draft_file(path: &Path) -> Result<(DraftFile, TagHints), MediaError> {
    if !is_audio_file(path) {
        return Err(MediaError::UnsupportedFormat(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let hints = read_tag_hints(path);

    let file = DraftFile {
        content_type: content_type_for(&name).to_string(),
        name,
        bytes,
    };

    Ok((file, hints))
}

fn read_tag_hints(path: &Path) -> TagHints {
    let Ok(tagged_file) = read_from_path(path) else {
        return TagHints::default();
    };

    let Some(tag) = tagged_file.first_tag() else {
        return TagHints::default();
    };

    TagHints {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("song.mp3")));
        assert!(is_audio_file(Path::new("song.FLAC")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("song")));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("track.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("track.M4A"), "audio/mp4");
        assert_eq!(content_type_for("track.bin"), "application/octet-stream");
    }

    #[test]
    fn test_looks_like_audio() {
        assert!(looks_like_audio("anything", "audio/mpeg"));
        assert!(looks_like_audio("track.ogg", "application/octet-stream"));
        assert!(!looks_like_audio("notes.txt", "text/plain"));
    }

    #[test]
    fn test_load_draft_file_rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = load_draft_file(&path).unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_draft_file_reads_bytes_without_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, b"not really mpeg frames").unwrap();

        let (file, hints) = load_draft_file(&path).unwrap();

        assert_eq!(file.name, "clip.mp3");
        assert_eq!(file.content_type, "audio/mpeg");
        assert_eq!(file.bytes, b"not really mpeg frames");
        // Unparseable tags degrade to empty hints rather than an error.
        assert_eq!(hints, TagHints::default());
    }

    #[test]
    fn test_load_draft_file_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.mp3");

        let err = load_draft_file(&path).unwrap_err();
        assert!(matches!(err, MediaError::Io(_)));
    }
}
