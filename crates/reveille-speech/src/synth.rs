use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SpeechError};

const LANGUAGE_CODE: &str = "en-US";
const AUDIO_ENCODING: &str = "LINEAR16";

/// Renders text to an audio payload (WAV bytes).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed synthesizer: POSTs the briefing, receives the audio
/// base64-encoded in a JSON envelope.
pub struct HttpSpeechSynthesizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct SynthesizeResponse {
    audio_content: String,
}

/// Decode the base64 audio payload out of a synthesis response body.
fn decode_audio(resp: SynthesizeResponse) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(resp.audio_content)?)
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!(chars = text.len(), "synthesizing speech");
        let resp = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "input": { "text": text },
                "voice": { "language_code": LANGUAGE_CODE },
                "audio": { "encoding": AUDIO_ENCODING },
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SpeechError::Api {
                status: resp.status().as_u16(),
            });
        }

        decode_audio(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_payload() {
        let resp = SynthesizeResponse {
            audio_content: STANDARD.encode(b"RIFFdata"),
        };
        assert_eq!(decode_audio(resp).unwrap(), b"RIFFdata");
    }

    #[test]
    fn rejects_invalid_base64() {
        let resp = SynthesizeResponse {
            audio_content: "not base64!!".to_string(),
        };
        assert!(matches!(
            decode_audio(resp),
            Err(SpeechError::BadAudio(_))
        ));
    }
}
