use async_trait::async_trait;
use tracing::debug;

use crate::error::{PlaybackError, Result};
use crate::types::{PlaybackState, PlayerDevice, Playlist, Track};

/// Interface to the external music-playback backend.
///
/// Implementations must be `Send + Sync`; the wakeup run drives one from a
/// scheduler job while HTTP handlers query it concurrently.
#[async_trait]
pub trait MusicService: Send + Sync {
    async fn devices(&self) -> Result<Vec<PlayerDevice>>;
    async fn playlists(&self) -> Result<Vec<Playlist>>;
    /// One playlist with its tracks populated.
    async fn playlist(&self, id: &str) -> Result<Playlist>;
    async fn track(&self, id: &str) -> Result<Track>;
    async fn search(&self, query: &str) -> Result<Vec<Track>>;
    /// Start playing `track` on `device`.
    async fn play(&self, track: &Track, device: &PlayerDevice) -> Result<()>;
    /// Pause whatever is playing.
    async fn pause(&self) -> Result<()>;
    /// Position of the current track.
    async fn currently_playing(&self) -> Result<PlaybackState>;
}

/// reqwest-backed [`MusicService`] speaking the backend's JSON API.
pub struct HttpMusicService {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpMusicService {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_token)
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_token)
    }

    fn check(resp: &reqwest::Response, operation: &'static str) -> Result<()> {
        if !resp.status().is_success() {
            return Err(PlaybackError::Api {
                operation,
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MusicService for HttpMusicService {
    async fn devices(&self) -> Result<Vec<PlayerDevice>> {
        let resp = self.get("/devices").send().await?;
        Self::check(&resp, "listing devices")?;
        Ok(resp.json().await?)
    }

    async fn playlists(&self) -> Result<Vec<Playlist>> {
        let resp = self.get("/playlists").send().await?;
        Self::check(&resp, "listing playlists")?;
        Ok(resp.json().await?)
    }

    async fn playlist(&self, id: &str) -> Result<Playlist> {
        let resp = self.get(&format!("/playlists/{id}")).send().await?;
        Self::check(&resp, "fetching playlist")?;
        Ok(resp.json().await?)
    }

    async fn track(&self, id: &str) -> Result<Track> {
        let resp = self.get(&format!("/tracks/{id}")).send().await?;
        Self::check(&resp, "fetching track")?;
        Ok(resp.json().await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<Track>> {
        let resp = self
            .get("/search")
            .query(&[("q", query)])
            .send()
            .await?;
        Self::check(&resp, "searching tracks")?;
        Ok(resp.json().await?)
    }

    async fn play(&self, track: &Track, device: &PlayerDevice) -> Result<()> {
        debug!(track = %track.name, device = %device.name, "issuing play");
        let resp = self
            .put("/play")
            .json(&serde_json::json!({
                "device_id": device.id,
                "uri": track.uri,
            }))
            .send()
            .await?;
        Self::check(&resp, "starting playback")
    }

    async fn pause(&self) -> Result<()> {
        let resp = self.put("/pause").send().await?;
        Self::check(&resp, "pausing playback")
    }

    async fn currently_playing(&self) -> Result<PlaybackState> {
        let resp = self.get("/now-playing").send().await?;
        if resp.status() == reqwest::StatusCode::NO_CONTENT {
            return Err(PlaybackError::NothingPlaying);
        }
        Self::check(&resp, "checking currently playing")?;
        Ok(resp.json().await?)
    }
}
