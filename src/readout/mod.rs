//! The sensor readout: one sensor handle, one output surface.
//!
//! `SensorReadout` starts its sensor once and then turns every reading
//! notification into a synchronous write to its surface. It never stops the
//! sensor; the handle is released when the readout is dropped.

use crate::error::{AppError, Result, SensorError};
use crate::output::OutputSurface;
use crate::sensors::{Reading, Sensor, SensorEvent};
use tokio_util::sync::CancellationToken;

pub mod handler;
pub mod view;

pub use handler::{ErrorHandler, ErrorOutcome, ErrorPolicy};
pub use view::{DisplayMode, ReadoutView};

/// Lifecycle of the readout. `start()` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutState {
    Idle,
    Started,
}

pub struct SensorReadout {
    sensor: Box<dyn Sensor>,
    surface: Box<dyn OutputSurface>,
    view: ReadoutView,
    error_handler: Box<dyn ErrorHandler>,
    state: ReadoutState,
}

impl SensorReadout {
    pub fn initialize(
        sensor: Box<dyn Sensor>,
        surface: Box<dyn OutputSurface>,
        mode: DisplayMode,
        error_handler: Box<dyn ErrorHandler>,
    ) -> Self {
        tracing::debug!(sensor = %sensor.info(), ?mode, "Readout initialized");
        Self {
            sensor,
            surface,
            view: ReadoutView::new(mode),
            error_handler,
            state: ReadoutState::Idle,
        }
    }

    pub fn state(&self) -> ReadoutState {
        self.state
    }

    pub fn view(&self) -> &ReadoutView {
        &self.view
    }

    /// Ask the sensor to begin producing readings.
    ///
    /// A failure reported by the device is treated exactly like an error
    /// notification, so it only escapes under a propagating policy.
    pub fn start(&mut self) -> Result<()> {
        if self.state == ReadoutState::Started {
            tracing::debug!("Readout already started");
            return Ok(());
        }
        self.state = ReadoutState::Started;
        tracing::info!("Starting {}", self.sensor.info());

        match self.sensor.start() {
            Ok(()) => Ok(()),
            Err(e) => self.on_error(e),
        }
    }

    /// Render one reading and write it to the surface
    pub fn on_reading(&mut self, reading: &Reading) -> Result<()> {
        if self.state != ReadoutState::Started {
            tracing::debug!("Dropping reading delivered before start");
            return Ok(());
        }
        let text = self.view.apply(reading);
        tracing::trace!(timestamp = %reading.timestamp(), %text, "Reading");
        self.surface.write(&text)?;
        Ok(())
    }

    /// Hand an error notification to the configured handler. The surface is
    /// left untouched.
    pub fn on_error(&mut self, error: SensorError) -> Result<()> {
        match self.error_handler.handle(&error) {
            ErrorOutcome::Handled | ErrorOutcome::Ignored => Ok(()),
            ErrorOutcome::Unhandled => Err(AppError::Sensor(error)),
        }
    }

    /// Start the sensor and process its notifications until `shutdown` fires.
    ///
    /// Notifications are handled one at a time, in delivery order. If the
    /// sensor's event stream ends, the last output stays in place until
    /// shutdown.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<()> {
        let Some(mut events) = self.sensor.subscribe() else {
            return Err(AppError::Sensor(SensorError::NotReadable(
                "sensor events already subscribed".to_string(),
            )));
        };
        self.start()?;

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = events.recv() => match event {
                    Some(SensorEvent::Reading(reading)) => self.on_reading(&reading)?,
                    Some(SensorEvent::Error(error)) => self.on_error(error)?,
                    None => {
                        tracing::info!("Sensor event stream ended");
                        shutdown.cancelled().await;
                        break;
                    }
                },
            }
        }

        tracing::info!("Readout shutting down");
        Ok(())
    }
}
