use super::{
    AxisReading, OrientationReading, Reading, Sensor, SensorEvent, SensorKind, SensorOptions,
};
use crate::error::SensorError;
use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Peak angular rate of the synthetic gyroscope, rad/s
const GYRO_AMPLITUDE: f64 = 0.5;
/// Rotation rate of the synthetic orientation around Z, rad/s
const YAW_RATE: f64 = 0.25;

/// Synthetic device that produces smooth readings at the configured rate
pub struct SimulatedSensor {
    kind: SensorKind,
    options: SensorOptions,
    available: bool,
    sender: Option<UnboundedSender<SensorEvent>>,
    receiver: Option<UnboundedReceiver<SensorEvent>>,
    task: Option<JoinHandle<()>>,
}

impl SimulatedSensor {
    pub fn new(kind: SensorKind, options: SensorOptions) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            kind,
            options,
            available: true,
            sender: Some(sender),
            receiver: Some(receiver),
            task: None,
        }
    }

    /// An unavailable device reports `NotReadable` once started
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

/// Reading the device reports `elapsed` seconds after start
pub fn synthesize(kind: SensorKind, elapsed: f64) -> Reading {
    let timestamp = Utc::now();
    match kind {
        SensorKind::Gyroscope => Reading::Axes(AxisReading {
            x: Some(GYRO_AMPLITUDE * elapsed.sin()),
            y: Some(GYRO_AMPLITUDE * (elapsed * 0.5).cos()),
            z: Some(GYRO_AMPLITUDE * (elapsed * 0.25).sin()),
            timestamp,
        }),
        SensorKind::RelativeOrientation => {
            let half = YAW_RATE * elapsed / 2.0;
            Reading::Orientation(OrientationReading {
                quaternion: [0.0, 0.0, half.sin(), half.cos()],
                timestamp,
            })
        }
    }
}

impl Sensor for SimulatedSensor {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn info(&self) -> String {
        let frame = self
            .options
            .reference_frame
            .map(|f| format!(", {:?} frame", f))
            .unwrap_or_default();
        format!(
            "Simulated {} ({} Hz{})",
            self.kind,
            self.options.frequency.unwrap_or(super::DEFAULT_FREQUENCY_HZ),
            frame
        )
    }

    fn start(&mut self) -> Result<(), SensorError> {
        let Some(sender) = self.sender.take() else {
            return Ok(());
        };

        if !self.available {
            tracing::debug!("Simulated {} unavailable", self.kind);
            let _ = sender.send(SensorEvent::Error(SensorError::NotReadable(
                "simulated device unavailable".to_string(),
            )));
            return Ok(());
        }

        let period = self.options.sample_period()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SensorError::NotSupported(format!("no event loop: {}", e)))?;
        let kind = self.kind;

        self.task = Some(runtime.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let started = time::Instant::now();

            loop {
                interval.tick().await;
                let elapsed = started.elapsed().as_secs_f64();
                if sender
                    .send(SensorEvent::Reading(synthesize(kind, elapsed)))
                    .is_err()
                {
                    break;
                }
            }
        }));

        tracing::info!(?period, "Simulated {} started", self.kind);
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

impl Drop for SimulatedSensor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_synthesized_orientation_is_unit_quaternion() {
        for elapsed in [0.0, 1.0, 7.5] {
            match synthesize(SensorKind::RelativeOrientation, elapsed) {
                Reading::Orientation(r) => {
                    let norm: f64 = r.quaternion.iter().map(|c| c * c).sum();
                    assert!((norm - 1.0).abs() < 1e-9);
                }
                other => panic!("unexpected reading {:?}", other),
            }
        }
    }

    #[test]
    fn test_synthesized_gyroscope_defines_all_axes() {
        match synthesize(SensorKind::Gyroscope, 2.0) {
            Reading::Axes(r) => {
                assert!(r.x.is_some() && r.y.is_some() && r.z.is_some());
            }
            other => panic!("unexpected reading {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_started_sensor_emits_readings() {
        let options = SensorOptions {
            frequency: Some(200.0),
            reference_frame: None,
        };
        let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, options);
        let mut events = sensor.subscribe().unwrap();
        sensor.start().unwrap();

        for _ in 0..3 {
            let event = time::timeout(Duration::from_secs(2), events.recv())
                .await
                .unwrap()
                .unwrap();
            assert!(matches!(event, SensorEvent::Reading(Reading::Axes(_))));
        }
    }

    #[tokio::test]
    async fn test_no_readings_before_start() {
        let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, SensorOptions::default());
        let mut events = sensor.subscribe().unwrap();
        let waited = time::timeout(Duration::from_millis(100), events.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_unavailable_sensor_reports_not_readable() {
        let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, SensorOptions::default())
            .with_available(false);
        let mut events = sensor.subscribe().unwrap();
        sensor.start().unwrap();

        let event = events.recv().await.unwrap();
        assert!(matches!(
            event,
            SensorEvent::Error(SensorError::NotReadable(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_frequency_rejected_at_start() {
        let options = SensorOptions {
            frequency: Some(0.0),
            reference_frame: None,
        };
        let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, options);
        assert!(matches!(
            sensor.start(),
            Err(SensorError::NotSupported(_))
        ));
    }

    #[tokio::test]
    async fn test_unrepresentable_frequencies_rejected_without_panicking() {
        for hz in [1e-300, 1e12] {
            let options = SensorOptions {
                frequency: Some(hz),
                reference_frame: None,
            };
            let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, options);
            assert!(matches!(
                sensor.start(),
                Err(SensorError::NotSupported(_))
            ));
        }
    }

    #[test]
    fn test_subscribe_only_once() {
        let mut sensor = SimulatedSensor::new(SensorKind::Gyroscope, SensorOptions::default());
        assert!(sensor.subscribe().is_some());
        assert!(sensor.subscribe().is_none());
    }
}
