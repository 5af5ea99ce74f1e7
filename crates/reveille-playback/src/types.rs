use serde::{Deserialize, Serialize};

/// An output device known to the playback backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDevice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// A playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Backend URI handed back verbatim when issuing play.
    pub uri: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artist: String,
}

/// A playlist; `tracks` is populated only when fetched individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Snapshot of the playback position reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub progress_ms: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn remaining_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.progress_ms)
    }
}
