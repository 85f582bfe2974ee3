//! Application configuration management.
//!
//! This module handles loading, parsing, and validating the application configuration
//! from a TOML file layered with `SENSOR_READOUT_*` environment variables, with
//! support for runtime overrides from CLI arguments.

use crate::error::{ConfigError, Result};
use crate::output::OutputKind;
use crate::readout::{DisplayMode, ErrorPolicy};
use crate::sensors::SensorConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "sensor-readout.toml";

const ENV_PREFIX: &str = "SENSOR_READOUT";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
}

/// How readings are shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_mode")]
    pub mode: DisplayMode,
    #[serde(default = "default_output")]
    pub output: OutputKind,
    #[serde(default = "default_error_policy")]
    pub error_policy: ErrorPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_mode() -> DisplayMode {
    DisplayMode::Snapshot
}

fn default_output() -> OutputKind {
    OutputKind::Auto
}

fn default_error_policy() -> ErrorPolicy {
    ErrorPolicy::Log
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            output: default_output(),
            error_policy: default_error_policy(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// A missing file is an error only when `required` is set. Values are not
    /// validated here; call `validate()` once CLI overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();
        if required && !path.exists() {
            return Err(ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
            .into());
        }

        let config: AppConfig = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Sensor options are deliberately left alone; the device decides what
    /// it accepts.
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                message: format!("must be one of {}", LOG_LEVELS.join(", ")),
            }
            .into());
        }

        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }

        if cli.json_logs {
            self.logging.json = true;
        }

        if let Some(mode) = cli.mode {
            self.display.mode = mode;
        }

        if let Some(output) = cli.output {
            self.display.output = output;
        }

        if let Some(kind) = cli.sensor {
            self.sensor.kind = kind;
        }

        if let Some(frequency) = cli.frequency {
            self.sensor.frequency = Some(frequency);
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }
}
