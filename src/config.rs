use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::{ConfidenceThresholds, MatchingWeights, MATCHING_WEIGHTS};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    /// Upper bound on candidate ids accepted per request
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            thresholds: ThresholdsConfig::default(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_candidates() -> usize { 500 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_email_exact_weight")]
    pub email_exact: u32,
    #[serde(default = "default_surname_postcode_weight")]
    pub surname_postcode: u32,
    #[serde(default = "default_surname_town_weight")]
    pub surname_town: u32,
    #[serde(default = "default_phone_weight")]
    pub phone: u32,
    #[serde(default = "default_postcode_only_weight")]
    pub postcode_only: u32,
    #[serde(default = "default_town_only_weight")]
    pub town_only: u32,
    #[serde(default = "default_house_number_weight")]
    pub house_number: u32,
    #[serde(default = "default_player_postcode_bonus_weight")]
    pub player_postcode_bonus: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            email_exact: default_email_exact_weight(),
            surname_postcode: default_surname_postcode_weight(),
            surname_town: default_surname_town_weight(),
            phone: default_phone_weight(),
            postcode_only: default_postcode_only_weight(),
            town_only: default_town_only_weight(),
            house_number: default_house_number_weight(),
            player_postcode_bonus: default_player_postcode_bonus_weight(),
        }
    }
}

impl From<&WeightsConfig> for MatchingWeights {
    fn from(config: &WeightsConfig) -> Self {
        MatchingWeights {
            email_exact: config.email_exact,
            surname_postcode: config.surname_postcode,
            surname_town: config.surname_town,
            phone: config.phone,
            postcode_only: config.postcode_only,
            town_only: config.town_only,
            house_number: config.house_number,
            player_postcode_bonus: config.player_postcode_bonus,
        }
    }
}

fn default_email_exact_weight() -> u32 { MATCHING_WEIGHTS.email_exact }
fn default_surname_postcode_weight() -> u32 { MATCHING_WEIGHTS.surname_postcode }
fn default_surname_town_weight() -> u32 { MATCHING_WEIGHTS.surname_town }
fn default_phone_weight() -> u32 { MATCHING_WEIGHTS.phone }
fn default_postcode_only_weight() -> u32 { MATCHING_WEIGHTS.postcode_only }
fn default_town_only_weight() -> u32 { MATCHING_WEIGHTS.town_only }
fn default_house_number_weight() -> u32 { MATCHING_WEIGHTS.house_number }
fn default_player_postcode_bonus_weight() -> u32 { MATCHING_WEIGHTS.player_postcode_bonus }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_high_threshold")]
    pub high: u32,
    #[serde(default = "default_medium_threshold")]
    pub medium: u32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

impl From<&ThresholdsConfig> for ConfidenceThresholds {
    fn from(config: &ThresholdsConfig) -> Self {
        ConfidenceThresholds {
            high: config.high,
            medium: config.medium,
        }
    }
}

fn default_high_threshold() -> u32 { 60 }
fn default_medium_threshold() -> u32 { 40 }

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
fn default_log_format() -> String { "plain".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with GUARDIAN_MATCH__)
    /// 4. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GUARDIAN_MATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        let settings = apply_database_url(settings)?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("GUARDIAN_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `DATABASE_URL` wins over any configured `database.url`
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
