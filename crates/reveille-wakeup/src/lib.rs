//! `reveille-wakeup` — the side effects of an alarm firing.
//!
//! A [`WakeupRunner`](run::WakeupRunner) raises the output volume, plays a
//! wakeup track on the configured device until it is nearly over, and then
//! speaks a generated morning briefing through the local audio output. Music
//! playback and briefing generation run concurrently and rendezvous once the
//! music is paused.

pub mod audio;
pub mod error;
pub mod mixer;
pub mod run;

pub use audio::{AudioSink, RodioSink};
pub use error::{Result, WakeupError};
pub use mixer::{AmixerMixer, Mixer};
pub use run::WakeupRunner;
