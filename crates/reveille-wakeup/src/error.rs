use thiserror::Error;

#[derive(Debug, Error)]
pub enum WakeupError {
    #[error("Setting volume failed: {0}")]
    Volume(String),

    #[error("Playback device not found: {name}")]
    DeviceNotFound { name: String },

    #[error("Playback error: {0}")]
    Playback(#[from] reveille_playback::PlaybackError),

    #[error("Speech error: {0}")]
    Speech(#[from] reveille_speech::SpeechError),

    /// The speech task stopped without producing a result (panic or abort).
    #[error("Speech task died: {0}")]
    SpeechTask(String),

    #[error("Audio output error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, WakeupError>;
