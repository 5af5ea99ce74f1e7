use async_trait::async_trait;

use crate::error::{Result, WakeupError};

/// Local audio output for the synthesized briefing.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Decode `audio` and play it on the local device, returning once
    /// playback completes.
    async fn play(&self, audio: Vec<u8>) -> Result<()>;
}

/// rodio-backed sink. Decoding and playback are blocking, so the whole
/// render runs on the blocking pool.
pub struct RodioSink;

#[async_trait]
impl AudioSink for RodioSink {
    async fn play(&self, audio: Vec<u8>) -> Result<()> {
        tokio::task::spawn_blocking(move || -> Result<()> {
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| WakeupError::Audio(format!("opening output stream: {e}")))?;
            let sink = rodio::Sink::try_new(&handle)
                .map_err(|e| WakeupError::Audio(format!("creating sink: {e}")))?;
            let source = rodio::Decoder::new(std::io::Cursor::new(audio))
                .map_err(|e| WakeupError::Audio(format!("decoding briefing audio: {e}")))?;
            sink.append(source);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| WakeupError::Audio(format!("playback task died: {e}")))?
    }
}
