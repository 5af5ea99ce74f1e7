use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Cadence of the scheduler drive loop (seconds between `run_pending` scans).
pub const SCHEDULER_TICK_SECS: u64 = 30;
/// Cadence of the maintenance heartbeat job.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 3600;

/// Top-level config (reveille.toml + REVEILLE_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReveilleConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub plugins: PluginsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl Default for ReveilleConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            player: PlayerConfig::default(),
            speech: SpeechConfig::default(),
            plugins: PluginsConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Remote music-playback backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_base_url")]
    pub base_url: String,
    /// Bearer token for the playback API.
    #[serde(default)]
    pub api_token: String,
    /// Name of the output device wakeup tracks are played on.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: default_player_base_url(),
            api_token: String::new(),
            device_name: default_device_name(),
        }
    }
}

/// Text-to-speech backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_speech_base_url(),
            api_key: String::new(),
        }
    }
}

/// Content plugins contributing sentences to the spoken briefing.
/// A section left out of the TOML disables that plugin.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PluginsConfig {
    pub weather: Option<WeatherConfig>,
    pub calendar: Option<CalendarConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    pub api_key: String,
    /// Forecast place identifier understood by the weather backend.
    pub place_id: i64,
    #[serde(default = "default_weather_units")]
    pub units: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    /// Calendar names whose events are read into the briefing.
    #[serde(default)]
    pub calendars: Vec<String>,
}

/// Local audio output path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Mixer simple-control names passed to `amixer sset`.
    #[serde(default = "default_mixer_controls")]
    pub mixer_controls: Vec<String>,
    /// Level argument for `amixer sset`, e.g. "100%".
    #[serde(default = "default_volume")]
    pub volume: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            mixer_controls: default_mixer_controls(),
            volume: default_volume(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.reveille/reveille.db", home)
}
fn default_player_base_url() -> String {
    "http://localhost:9090".to_string()
}
fn default_device_name() -> String {
    "bedroom-speaker".to_string()
}
fn default_speech_base_url() -> String {
    "http://localhost:9091".to_string()
}
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}
fn default_weather_units() -> String {
    "metric".to_string()
}
fn default_mixer_controls() -> Vec<String> {
    vec!["DAC".to_string(), "Line Out".to_string()]
}
fn default_volume() -> String {
    "100%".to_string()
}

impl ReveilleConfig {
    /// Load config from a TOML file with REVEILLE_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. REVEILLE_CONFIG env var
    ///   3. ~/.reveille/reveille.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ReveilleConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("REVEILLE_").split("_"))
            .extract()
            .map_err(|e| crate::error::ReveilleError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    std::env::var("REVEILLE_CONFIG").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{}/.reveille/reveille.toml", home)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let cfg = ReveilleConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert!(cfg.database.path.ends_with("reveille.db"));
        assert!(cfg.plugins.weather.is_none());
        assert!(cfg.plugins.calendar.is_none());
        assert_eq!(cfg.audio.mixer_controls.len(), 2);
    }

    #[test]
    fn plugins_deserialize_when_present() {
        let cfg: ReveilleConfig = serde_json::from_value(serde_json::json!({
            "plugins": {
                "weather": { "api_key": "k", "place_id": 5391959 },
                "calendar": { "base_url": "http://cal", "calendars": ["Default"] }
            }
        }))
        .unwrap();
        let weather = cfg.plugins.weather.unwrap();
        assert_eq!(weather.units, "metric");
        assert_eq!(cfg.plugins.calendar.unwrap().calendars, vec!["Default"]);
    }
}
