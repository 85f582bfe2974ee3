//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use crate::error::{Result, ServiceError};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Filter from `RUST_LOG` when set, otherwise from the configured level
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber.
///
/// Logs go to the configured file if any, otherwise to stderr. When the
/// console is taken by the terminal surface and no file is configured, logs
/// are discarded.
pub fn init(config: &LoggingConfig, console_available: bool) -> Result<()> {
    let (writer, ansi) = match (&config.file, console_available) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, true) => (
            BoxMakeWriter::new(io::stderr),
            atty::is(atty::Stream::Stderr),
        ),
        (None, false) => (BoxMakeWriter::new(io::sink), false),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.level))
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ServiceError::LoggingError(e.to_string()))?;

    Ok(())
}
