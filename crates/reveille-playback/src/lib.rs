//! `reveille-playback` — remote music-playback collaborator.
//!
//! Wraps the external playback backend behind the [`MusicService`] trait
//! (devices, playlists, play/pause, playback status) with a reqwest-backed
//! production implementation, keeps player configuration (default playlist,
//! one-shot track override) in a small SQLite key-value table, selects the
//! next wakeup track, and polls playback status until the current track is
//! nearly over.

pub mod client;
pub mod db;
pub mod error;
pub mod selection;
pub mod store;
pub mod types;
pub mod wait;

pub use client::{HttpMusicService, MusicService};
pub use error::{PlaybackError, Result};
pub use selection::TrackSelector;
pub use store::{PlayerConfigStore, DEFAULT_PLAYLIST_KEY, NEXT_WAKEUP_TRACK_KEY};
pub use types::{PlaybackState, PlayerDevice, Playlist, Track};
pub use wait::{wait_for_track, NEAR_END_MS, POLL_INTERVAL, WAIT_TIMEOUT};
