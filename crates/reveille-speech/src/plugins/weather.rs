use async_trait::async_trait;
use serde::Deserialize;

use reveille_core::config::WeatherConfig;

use crate::error::{Result, SpeechError};
use crate::plugins::ContentPlugin;

/// Today's forecast as one sentence.
pub struct WeatherPlugin {
    client: reqwest::Client,
    config: WeatherConfig,
}

impl WeatherPlugin {
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
}

#[derive(Deserialize)]
struct ForecastEntry {
    weather: Vec<WeatherCondition>,
    main: ForecastMain,
}

#[derive(Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Deserialize)]
struct ForecastMain {
    temp_max: f64,
    temp_min: f64,
}

fn forecast_sentence(entry: &ForecastEntry) -> String {
    let description = entry
        .weather
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("unknown");
    format!(
        "Today's forecast is {} with a high of {:.0} degrees and a low of {:.0} degrees. ",
        description,
        entry.main.temp_max.round(),
        entry.main.temp_min.round(),
    )
}

#[async_trait]
impl ContentPlugin for WeatherPlugin {
    fn name(&self) -> &str {
        "weather"
    }

    async fn text(&self) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}/forecast/daily", self.config.base_url))
            .query(&[
                ("id", self.config.place_id.to_string()),
                ("cnt", "1".to_string()),
                ("units", self.config.units.clone()),
                ("appid", self.config.api_key.clone()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SpeechError::Api {
                status: resp.status().as_u16(),
            });
        }

        let forecast: ForecastResponse = resp.json().await?;
        let entry = forecast.list.first().ok_or_else(|| SpeechError::Plugin {
            plugin: "weather".to_string(),
            reason: "forecast response contained no entries".to_string(),
        })?;

        Ok(forecast_sentence(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_rounds_temperatures() {
        let entry = ForecastEntry {
            weather: vec![WeatherCondition {
                description: "scattered clouds".to_string(),
            }],
            main: ForecastMain {
                temp_max: 21.6,
                temp_min: 12.3,
            },
        };
        assert_eq!(
            forecast_sentence(&entry),
            "Today's forecast is scattered clouds with a high of 22 degrees and a low of 12 degrees. "
        );
    }

    #[test]
    fn sentence_survives_missing_condition() {
        let entry = ForecastEntry {
            weather: vec![],
            main: ForecastMain {
                temp_max: 0.0,
                temp_min: -3.5,
            },
        };
        assert!(forecast_sentence(&entry).starts_with("Today's forecast is unknown"));
    }
}
