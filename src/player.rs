//! Playback selection: which song the playback surface should be playing.

use parking_lot::Mutex;

use crate::models::Song;

/// Holds the zero-or-one song currently designated for playback.
///
/// The selection is a value copy, deliberately decoupled from catalog
/// membership: a refresh that drops the song leaves the selection playable
/// for as long as its URL stays valid. Decoding and streaming belong to the
/// playback surface, not here.
#[derive(Debug, Default)]
pub struct Player {
    current: Mutex<Option<Song>>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a song for playback, replacing any prior selection.
    ///
    /// Re-selecting the current song is a restart, not a no-op.
    pub fn select(&self, song: Song) {
        tracing::debug!(title = %song.title, artist = %song.artist, "now playing");
        *self.current.lock() = Some(song);
    }

    /// The current selection, if any.
    pub fn current(&self) -> Option<Song> {
        self.current.lock().clone()
    }
}
