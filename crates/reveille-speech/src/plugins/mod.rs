use async_trait::async_trait;

use crate::error::Result;

pub mod calendar;
pub mod weather;

pub use calendar::CalendarPlugin;
pub use weather::WeatherPlugin;

/// A source of one briefing sentence.
///
/// Plugins are independent: each succeeds or fails on its own, and the
/// briefing builder treats any failure as fatal for the run.
#[async_trait]
pub trait ContentPlugin: Send + Sync {
    /// Stable lowercase identifier, used in error reports.
    fn name(&self) -> &str;

    /// Produce this plugin's sentence.
    async fn text(&self) -> Result<String>;
}
