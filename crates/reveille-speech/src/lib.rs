//! `reveille-speech` — the spoken morning briefing.
//!
//! Content plugins ([`plugins::ContentPlugin`]) each contribute one sentence
//! (calendar agenda, weather forecast); [`message::build_message`] chains
//! them into a single briefing, and a [`synth::SpeechSynthesizer`] renders
//! the briefing to an audio payload the wakeup run plays after the music
//! stops.

pub mod error;
pub mod message;
pub mod plugins;
pub mod synth;

pub use error::{Result, SpeechError};
pub use message::{build_message, SIGN_OFF};
pub use plugins::{CalendarPlugin, ContentPlugin, WeatherPlugin};
pub use synth::{HttpSpeechSynthesizer, SpeechSynthesizer};
