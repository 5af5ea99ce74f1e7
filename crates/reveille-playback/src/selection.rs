use std::sync::Arc;

use rand::Rng;
use tracing::info;

use crate::client::MusicService;
use crate::error::{PlaybackError, Result};
use crate::store::{PlayerConfigStore, DEFAULT_PLAYLIST_KEY, NEXT_WAKEUP_TRACK_KEY};
use crate::types::Track;

/// Chooses the next wakeup track: an explicit one-shot override if one is
/// stored, otherwise a uniformly-random track from the default playlist.
#[derive(Clone)]
pub struct TrackSelector {
    music: Arc<dyn MusicService>,
    config: PlayerConfigStore,
}

impl TrackSelector {
    pub fn new(music: Arc<dyn MusicService>, config: PlayerConfigStore) -> Self {
        Self { music, config }
    }

    pub async fn next_wakeup_track(&self) -> Result<Track> {
        if let Some(track_id) = self.config.get(NEXT_WAKEUP_TRACK_KEY)? {
            info!(track_id = %track_id, "using stored wakeup track override");
            return self.music.track(&track_id).await;
        }
        self.random_playlist_track().await
    }

    async fn random_playlist_track(&self) -> Result<Track> {
        let playlist_id = self
            .config
            .get(DEFAULT_PLAYLIST_KEY)?
            .ok_or(PlaybackError::NoDefaultPlaylist)?;
        let playlist = self.music.playlist(&playlist_id).await?;
        if playlist.tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist { id: playlist.id });
        }
        let index = rand::thread_rng().gen_range(0..playlist.tracks.len());
        Ok(playlist.tracks[index].clone())
    }

    /// Stored override track id, if any.
    pub fn next_track_override(&self) -> Result<Option<String>> {
        self.config.get(NEXT_WAKEUP_TRACK_KEY)
    }

    pub fn set_next_track(&self, track_id: &str) -> Result<()> {
        self.config.set(NEXT_WAKEUP_TRACK_KEY, track_id)
    }

    /// Clear the one-shot override so the next run picks randomly again.
    pub fn clear_next_track(&self) -> Result<()> {
        self.config.clear(NEXT_WAKEUP_TRACK_KEY)
    }

    pub fn default_playlist_id(&self) -> Result<Option<String>> {
        self.config.get(DEFAULT_PLAYLIST_KEY)
    }

    pub fn set_default_playlist(&self, playlist_id: &str) -> Result<()> {
        self.config.set(DEFAULT_PLAYLIST_KEY, playlist_id)
    }
}
