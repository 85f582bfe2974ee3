//! Display modes and text rendering of readings.

use crate::output::LINE_BREAK;
use crate::sensors::{AxisReading, Reading};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How readings are turned into displayed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Show only the most recent reading
    Snapshot,
    /// Show the running sum of every reading since start
    Accumulate,
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snapshot" => Ok(DisplayMode::Snapshot),
            "accumulate" | "sum" => Ok(DisplayMode::Accumulate),
            other => Err(format!("unknown display mode '{}'", other)),
        }
    }
}

/// Running per-axis totals. Never reset; no clamping or overflow handling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Accumulator {
    /// Add one reading; an undefined axis contributes 0
    pub fn add(&mut self, reading: &AxisReading) {
        self.x += reading.x.unwrap_or(0.0);
        self.y += reading.y.unwrap_or(0.0);
        self.z += reading.z.unwrap_or(0.0);
    }
}

/// Render a number the way the platform's number-to-text conversion does
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if value == 0.0 {
        // also folds -0
        "0".to_string()
    } else if value.abs() >= 1e21 || value.abs() < 1e-6 {
        exponent_form(value)
    } else {
        value.to_string()
    }
}

/// `1e+21` / `1e-7` style, with the shortest round-tripping mantissa
fn exponent_form(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => formatted,
    }
}

fn format_axis(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_else(|| "null".to_string())
}

fn render_axes(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> String {
    format!(
        "X: {}{br}Y: {}{br}Z: {}",
        format_axis(x),
        format_axis(y),
        format_axis(z),
        br = LINE_BREAK
    )
}

/// Display state: the mode plus the accumulator it owns
#[derive(Debug, Clone)]
pub struct ReadoutView {
    mode: DisplayMode,
    accumulator: Accumulator,
}

impl ReadoutView {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            accumulator: Accumulator::default(),
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Fold `reading` into the view and return the text to display
    pub fn apply(&mut self, reading: &Reading) -> String {
        match (self.mode, reading) {
            (DisplayMode::Snapshot, Reading::Axes(r)) => render_axes(r.x, r.y, r.z),
            (DisplayMode::Accumulate, Reading::Axes(r)) => {
                self.accumulator.add(r);
                let Accumulator { x, y, z } = self.accumulator;
                render_axes(Some(x), Some(y), Some(z))
            }
            // Quaternions are shown as-is in either mode
            (_, Reading::Orientation(r)) => r
                .quaternion
                .iter()
                .map(|c| format_value(*c))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
