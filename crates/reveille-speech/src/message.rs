use std::sync::Arc;

use crate::error::{Result, SpeechError};
use crate::plugins::ContentPlugin;

/// Closing sentence appended to every briefing.
pub const SIGN_OFF: &str = "Have a great day!";

/// Concatenate each plugin's sentence into one briefing.
///
/// Plugins run in their configured order; a single failure abandons the
/// message for this run (a partial briefing would silently drop content).
pub async fn build_message(plugins: &[Arc<dyn ContentPlugin>]) -> Result<String> {
    let mut message = String::new();
    for plugin in plugins {
        let text = match plugin.text().await {
            Ok(text) => text,
            Err(e @ SpeechError::Plugin { .. }) => return Err(e),
            Err(e) => {
                return Err(SpeechError::Plugin {
                    plugin: plugin.name().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        message.push_str(&text);
    }
    message.push_str(SIGN_OFF);
    Ok(message)
}
