//! Engine configuration management.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{DetailLevel, VarianceMode};

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Rendering defaults.
    #[serde(default)]
    pub render: RenderConfig,
    /// Trailing-twelve-month settings.
    #[serde(default)]
    pub ltm: LtmConfig,
    /// Report definition sources.
    #[serde(default)]
    pub reports: ReportsConfig,
}

/// Rendering defaults applied when a caller does not override them.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Symbol prepended to currency-formatted values.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Which rows survive rendering.
    #[serde(default)]
    pub detail_level: DetailLevel,
    /// Which variance fields are exposed.
    #[serde(default)]
    pub variance_mode: VarianceMode,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            detail_level: DetailLevel::default(),
            variance_mode: VarianceMode::default(),
        }
    }
}

/// Trailing-twelve-month configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LtmConfig {
    /// Number of months in the rolling window.
    #[serde(default = "default_window_length")]
    pub window_length: i32,
}

fn default_window_length() -> i32 {
    12
}

impl Default for LtmConfig {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
        }
    }
}

/// Where report definitions are loaded from.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Directory scanned for `*.json` report definitions.
    #[serde(default = "default_reports_directory")]
    pub directory: String,
    /// Default report id keyed by statement type name.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

fn default_reports_directory() -> String {
    "reports".to_string()
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            directory: default_reports_directory(),
            defaults: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `FINSTATE__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration with config files taken from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a present config file is malformed or a value has
    /// the wrong type.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FINSTATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
