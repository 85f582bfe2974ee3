//! Service layer wiring the sensor, the surface and the readout together.
//!
//! The readout runs on the current task until a shutdown signal arrives. The
//! sensor is never stopped explicitly; it is released with the readout.

use crate::config::AppConfig;
use crate::error::{Result, ServiceError};
use crate::output::{self, OutputKind, input};
use crate::readout::SensorReadout;
use crate::sensors;
use futures_util::stream::StreamExt;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio_util::sync::CancellationToken;

/// Cancel `shutdown` on SIGINT or SIGTERM
pub fn spawn_signal_listener(shutdown: CancellationToken) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])
        .map_err(|e| ServiceError::SignalError(e.to_string()))?;

    tokio::spawn(async move {
        if let Some(signal) = signals.next().await {
            tracing::info!(signal, "Received shutdown signal");
            shutdown.cancel();
        }
    });

    Ok(())
}

/// Build the readout described by `config` and run it until shutdown.
///
/// `config.display.output` should already be resolved (see `OutputKind::resolve`).
pub async fn run(config: AppConfig) -> Result<()> {
    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone())?;

    let sensor = sensors::create(&config.sensor);
    // Resolved once by the caller
    let output_kind = config.display.output;
    let surface = output::create(output_kind, &sensor.info())?;
    if output_kind == OutputKind::Terminal {
        input::spawn_quit_listener(shutdown.clone())?;
    }

    let mut readout = SensorReadout::initialize(
        sensor,
        surface,
        config.display.mode,
        config.display.error_policy.handler(),
    );
    readout.run(shutdown).await
}
