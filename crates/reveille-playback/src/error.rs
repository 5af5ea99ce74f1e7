use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Playback API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Playback API {operation} returned status {status}")]
    Api { operation: &'static str, status: u16 },

    /// The status endpoint reported no active track.
    #[error("No track is currently playing")]
    NothingPlaying,

    #[error("No default playlist is configured")]
    NoDefaultPlaylist,

    #[error("Default playlist {id} has no tracks")]
    EmptyPlaylist { id: String },

    /// The near-completion poll exceeded its absolute deadline.
    #[error("Timed out waiting for the wakeup track to finish")]
    WaitTimeout,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
