//! Replays recorded readings from a JSON-lines file.
//!
//! Each non-empty line holds one reading, either axes
//! (`{"x": 0.1, "y": -0.2, "z": 0.0}`) or an orientation
//! (`{"quaternion": [0, 0, 0, 1]}`), with an optional RFC 3339 `timestamp`.

use super::{
    AxisReading, OrientationReading, Reading, Sensor, SensorEvent, SensorKind, SensorOptions,
};
use crate::error::SensorError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time;

#[derive(Debug, Deserialize)]
struct RecordedReading {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    quaternion: Option<[f64; 4]>,
    timestamp: Option<DateTime<Utc>>,
}

pub struct ReplaySensor {
    kind: SensorKind,
    options: SensorOptions,
    path: PathBuf,
    sender: Option<UnboundedSender<SensorEvent>>,
    receiver: Option<UnboundedReceiver<SensorEvent>>,
    task: Option<JoinHandle<()>>,
}

impl ReplaySensor {
    pub fn new(kind: SensorKind, options: SensorOptions, path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            kind,
            options,
            path,
            sender: Some(sender),
            receiver: Some(receiver),
            task: None,
        }
    }
}

/// Parse one recorded line into the event it replays as
fn parse_line(kind: SensorKind, line_no: usize, line: &str) -> SensorEvent {
    let record: RecordedReading = match serde_json::from_str(line) {
        Ok(record) => record,
        Err(e) => {
            return SensorEvent::Error(SensorError::NotReadable(format!(
                "line {}: {}",
                line_no, e
            )));
        }
    };
    let timestamp = record.timestamp.unwrap_or_else(Utc::now);

    match (kind, record.quaternion) {
        (SensorKind::Gyroscope, None) => SensorEvent::Reading(Reading::Axes(AxisReading {
            x: record.x,
            y: record.y,
            z: record.z,
            timestamp,
        })),
        (SensorKind::RelativeOrientation, Some(quaternion)) => {
            SensorEvent::Reading(Reading::Orientation(OrientationReading {
                quaternion,
                timestamp,
            }))
        }
        (SensorKind::Gyroscope, Some(_)) => SensorEvent::Error(SensorError::NotReadable(
            format!("line {}: expected axis values, found quaternion", line_no),
        )),
        (SensorKind::RelativeOrientation, None) => SensorEvent::Error(SensorError::NotReadable(
            format!("line {}: missing quaternion", line_no),
        )),
    }
}

/// Parse a whole recording, skipping blank lines
pub fn parse_recording(kind: SensorKind, content: &str) -> Vec<SensorEvent> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(kind, idx + 1, line))
        .collect()
}

impl Sensor for ReplaySensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn info(&self) -> String {
        format!("Replayed {} ({})", self.kind, self.path.display())
    }

    fn start(&mut self) -> Result<(), SensorError> {
        let Some(sender) = self.sender.take() else {
            return Ok(());
        };

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), "Recording unreadable: {}", e);
                let _ = sender.send(SensorEvent::Error(SensorError::NotReadable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
                return Ok(());
            }
        };

        let period = self.options.sample_period()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SensorError::NotSupported(format!("no event loop: {}", e)))?;
        let events = parse_recording(self.kind, &content);
        tracing::info!(
            path = %self.path.display(),
            count = events.len(),
            "Replaying recorded {} readings",
            self.kind
        );

        self.task = Some(runtime.spawn(async move {
            let mut interval = time::interval(period);
            for event in events {
                interval.tick().await;
                if sender.send(event).is_err() {
                    return;
                }
            }
            tracing::debug!("Recording exhausted");
        }));

        Ok(())
    }

    fn subscribe(&mut self) -> Option<UnboundedReceiver<SensorEvent>> {
        self.receiver.take()
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReplaySensor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
