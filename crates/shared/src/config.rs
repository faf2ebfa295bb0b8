//! Application configuration management.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Report destination configuration.
    pub report: ReportConfig,
    /// Batch input configuration.
    pub input: InputConfig,
    /// Install-date memo configuration.
    #[serde(default)]
    pub memo: MemoConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Tariff schedule overrides. Empty means the built-in schedule.
    #[serde(default)]
    pub tariffs: Vec<TariffEntry>,
}

/// Report destination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Template file copied to the destination before rows are appended.
    pub template: PathBuf,
    /// Destination in `file@sheet` form (the `@sheet` part is optional).
    pub target: String,
}

/// Batch input configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the JSON batch document.
    pub batch: PathBuf,
    /// JSON buildings list (`{"2022": ["ул Ленина 5"]}`) the report is
    /// limited to. Overrides the batch's own list.
    #[serde(default)]
    pub buildings: Option<PathBuf>,
}

/// Install-date memo configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoConfig {
    /// Install date reported for individual meters with no recorded replacement.
    #[serde(default = "default_install_date")]
    pub default_install_date: String,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            default_install_date: default_install_date(),
        }
    }
}

fn default_install_date() -> String {
    "01.01.2019".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "heatbill=info".to_string()
}

/// One tariff schedule entry: the price in effect from `from` onwards.
#[derive(Debug, Clone, Deserialize)]
pub struct TariffEntry {
    /// First period the price applies to, `YYYY-MM` or `MM.YYYY`.
    pub from: String,
    /// Price per unit of heat energy.
    pub price: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `HEATBILL__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HEATBILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
