use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// One content plugin failed; the whole briefing is abandoned.
    #[error("Content plugin {plugin} failed: {reason}")]
    Plugin { plugin: String, reason: String },

    #[error("Speech API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Speech API returned status {status}")]
    Api { status: u16 },

    #[error("Speech audio payload could not be decoded: {0}")]
    BadAudio(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, SpeechError>;
