use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::kmeans::{DEFAULT_MAX_ITERATIONS, DEFAULT_N_INIT, DEFAULT_SEED};
use crate::models::{WeatherCondition, WeatherSnapshot};
use crate::services::nominatim::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub roster: RosterSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout(),
        }
    }
}

fn default_geocoder_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_geocoder_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_condition")]
    pub condition: String,
    #[serde(default = "default_temperature")]
    pub temperature_c: f64,
    #[serde(default = "default_fallback_condition")]
    pub fallback_condition: String,
    #[serde(default = "default_temperature")]
    pub fallback_temperature_c: f64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            condition: default_condition(),
            temperature_c: default_temperature(),
            fallback_condition: default_fallback_condition(),
            fallback_temperature_c: default_temperature(),
        }
    }
}

impl WeatherSettings {
    /// Snapshot reported by the static provider
    pub fn snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot::new(WeatherCondition::from_label(&self.condition), self.temperature_c)
    }

    /// Snapshot used when the provider fails
    pub fn fallback(&self) -> WeatherSnapshot {
        WeatherSnapshot::new(
            WeatherCondition::from_label(&self.fallback_condition),
            self.fallback_temperature_c,
        )
    }
}

fn default_condition() -> String { "Clear".to_string() }
fn default_fallback_condition() -> String { "Unknown".to_string() }
fn default_temperature() -> f64 { 26.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_n_init")]
    pub n_init: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            n_init: default_n_init(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_seed() -> u64 { DEFAULT_SEED }
fn default_n_init() -> usize { DEFAULT_N_INIT }
fn default_max_iterations() -> usize { DEFAULT_MAX_ITERATIONS }

#[derive(Debug, Clone, Deserialize)]
pub struct RosterSettings {
    #[serde(default = "default_roster_path")]
    pub path: String,
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self { path: default_roster_path() }
    }
}

fn default_roster_path() -> String { "data/roster.toml".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with COMMUTE)
    /// 5. NOMINATIM_ENDPOINT and ROSTER_PATH
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., COMMUTE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("COMMUTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("COMMUTE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed environment variables on top
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(endpoint) = env::var("NOMINATIM_ENDPOINT") {
        builder = builder.set_override("geocoder.endpoint", endpoint)?;
    }
    if let Ok(path) = env::var("ROSTER_PATH") {
        builder = builder.set_override("roster.path", path)?;
    }

    builder.build()
}
