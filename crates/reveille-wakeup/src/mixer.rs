use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, WakeupError};

/// Volume control over the local audio output path.
#[async_trait]
pub trait Mixer: Send + Sync {
    /// Raise the output path to wakeup volume.
    async fn raise(&self) -> Result<()>;
}

/// Shells out to `amixer sset <control> <level>` for each configured
/// simple control.
pub struct AmixerMixer {
    controls: Vec<String>,
    volume: String,
}

impl AmixerMixer {
    pub fn new(controls: Vec<String>, volume: String) -> Self {
        Self { controls, volume }
    }
}

#[async_trait]
impl Mixer for AmixerMixer {
    async fn raise(&self) -> Result<()> {
        for control in &self.controls {
            debug!(control = %control, volume = %self.volume, "setting mixer volume");
            let status = tokio::process::Command::new("amixer")
                .arg("sset")
                .arg(control)
                .arg(&self.volume)
                .status()
                .await
                .map_err(|e| WakeupError::Volume(format!("running amixer for {control}: {e}")))?;
            if !status.success() {
                return Err(WakeupError::Volume(format!(
                    "amixer sset {control} {} exited with {status}",
                    self.volume
                )));
            }
        }
        Ok(())
    }
}
