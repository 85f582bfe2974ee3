//! Sensor capability consumed by the readout.
//!
//! A sensor is constructed for a fixed kind, started once, and then delivers
//! `SensorEvent`s on a single channel until it is dropped.

use crate::error::SensorError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub mod replay;
pub mod simulated;

/// Sampling frequency used when none is configured
pub const DEFAULT_FREQUENCY_HZ: f64 = 60.0;

/// Sensor types the readout can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorKind {
    /// Angular rate around the X, Y and Z axes
    Gyroscope,
    /// Device orientation relative to a stationary frame, as a quaternion
    RelativeOrientation,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Gyroscope => f.write_str("gyroscope"),
            SensorKind::RelativeOrientation => f.write_str("relative-orientation"),
        }
    }
}

impl FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gyroscope" | "gyro" => Ok(SensorKind::Gyroscope),
            "relative-orientation" | "relative_orientation" | "orientation" => {
                Ok(SensorKind::RelativeOrientation)
            }
            other => Err(format!("unknown sensor kind '{}'", other)),
        }
    }
}

/// Coordinate frame readings are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFrame {
    Device,
    Screen,
}

/// Options handed to the device untouched
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorOptions {
    pub frequency: Option<f64>,
    pub reference_frame: Option<ReferenceFrame>,
}

impl SensorOptions {
    /// Interval between readings, rejecting frequencies the device can't honour
    pub fn sample_period(&self) -> Result<Duration, SensorError> {
        let hz = self.frequency.unwrap_or(DEFAULT_FREQUENCY_HZ);
        let unsupported = || SensorError::NotSupported(format!("sampling frequency {} Hz", hz));
        if !hz.is_finite() || hz <= 0.0 {
            return Err(unsupported());
        }
        // Periods too long for a Duration or shorter than a nanosecond
        match Duration::try_from_secs_f64(1.0 / hz) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => Err(unsupported()),
        }
    }
}

/// Backing device selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeviceConfig {
    Simulated {
        #[serde(default = "default_true")]
        available: bool,
    },
    Replay {
        path: PathBuf,
    },
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::Simulated { available: true }
    }
}

fn default_true() -> bool {
    true
}

/// Sensor section of the application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    #[serde(default = "default_kind")]
    pub kind: SensorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_frame: Option<ReferenceFrame>,
    #[serde(default)]
    pub device: DeviceConfig,
}

fn default_kind() -> SensorKind {
    SensorKind::Gyroscope
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            frequency: None,
            reference_frame: None,
            device: DeviceConfig::default(),
        }
    }
}

impl SensorConfig {
    pub fn options(&self) -> SensorOptions {
        SensorOptions {
            frequency: self.frequency,
            reference_frame: self.reference_frame,
        }
    }
}

/// One angular-rate style reading. Axes the device leaves undefined are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReading {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl AxisReading {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            timestamp: Utc::now(),
        }
    }
}

/// One orientation reading as an `[x, y, z, w]` quaternion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationReading {
    pub quaternion: [f64; 4],
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Axes(AxisReading),
    Orientation(OrientationReading),
}

impl Reading {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Reading::Axes(r) => r.timestamp,
            Reading::Orientation(r) => r.timestamp,
        }
    }
}

/// Notifications delivered by a started sensor
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Reading(Reading),
    Error(SensorError),
}

/// A platform sensor handle
#[cfg_attr(test, mockall::automock)]
pub trait Sensor: Send {
    fn kind(&self) -> SensorKind;

    /// Human-readable description for titles and logs
    fn info(&self) -> String;

    /// Ask the device to begin producing readings
    fn start(&mut self) -> Result<(), SensorError>;

    /// Take the event receiver. Only the first call returns `Some`.
    fn subscribe(&mut self) -> Option<UnboundedReceiver<SensorEvent>>;

    /// Stop producing readings
    fn stop(&mut self);
}

/// Construct the sensor handle described by `config`
pub fn create(config: &SensorConfig) -> Box<dyn Sensor> {
    let options = config.options();
    tracing::debug!(kind = %config.kind, ?options, "Creating sensor handle");

    match &config.device {
        DeviceConfig::Simulated { available } => Box::new(
            simulated::SimulatedSensor::new(config.kind, options).with_available(*available),
        ),
        DeviceConfig::Replay { path } => {
            Box::new(replay::ReplaySensor::new(config.kind, options, path.clone()))
        }
    }
}
