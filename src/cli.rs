//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure using gumdrop. Every option except
//! `--config` overrides the corresponding configuration value.

use crate::output::OutputKind;
use crate::readout::DisplayMode;
use crate::sensors::SensorKind;
use gumdrop::Options;
use std::path::PathBuf;

/// sensor-readout: show live readings from a motion or orientation sensor
#[derive(Debug, Options)]
pub struct Cli {
    #[options(help = "print help message")]
    pub help: bool,

    #[options(help = "print version and exit")]
    pub version: bool,

    #[options(help = "path to configuration file", meta = "PATH")]
    pub config: Option<PathBuf>,

    #[options(help = "log level: trace, debug, info, warn, error", meta = "LEVEL")]
    pub log_level: Option<String>,

    #[options(help = "display mode: snapshot or accumulate", meta = "MODE")]
    pub mode: Option<DisplayMode>,

    #[options(help = "sensor type: gyroscope or relative-orientation", meta = "KIND")]
    pub sensor: Option<SensorKind>,

    #[options(help = "output surface: auto, terminal or plain", meta = "OUTPUT")]
    pub output: Option<OutputKind>,

    #[options(help = "sampling frequency in Hz", meta = "HZ")]
    pub frequency: Option<f64>,

    #[options(no_short, help = "emit logs as JSON")]
    pub json_logs: bool,

    #[options(no_short, help = "print the effective configuration and exit")]
    pub dump_config: bool,
}

impl Cli {
    /// Parse command-line arguments, exiting on `--help` or a parse error
    pub fn parse_args() -> Self {
        Self::parse_args_default_or_exit()
    }
}
