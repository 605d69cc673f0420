use super::filter::FilterConfig;
use super::grid::{GridConfig, PriorConfig};

use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("configuration error")]
    ParseError(#[from] ConfigError),
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// The sample rate of the input signal, in hertz.
    /// Default: 1000
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Samples consumed per filter step.
    /// Default: 100
    #[serde(default = "default_window")]
    pub window: usize,

    /// Grid of candidate spread values.
    pub grid: GridConfig,

    /// Distribution to start from.
    #[serde(default)]
    pub prior: PriorConfig,

    /// Filter coefficients and readout.
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Config {
    /// Load a JSON file, then apply environment overrides such as
    /// `<PREFIX>_FILTER<SEP>ALPHA=0.02`.
    pub fn new(
        path: &Path,
        env_prefix: &str,
        env_separator: &str,
    ) -> Result<Self, ConfigurationError> {
        let config_file = File::from(path).format(FileFormat::Json);
        config::Config::builder()
            .add_source(config_file)
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator(env_separator)
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| e.into())
    }
}

fn default_sample_rate() -> f64 {
    1000.0
}

fn default_window() -> usize {
    100
}
