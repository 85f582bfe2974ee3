//! Custom error types for the sensor-readout application.
//!
//! This module defines domain-specific error types using thiserror,
//! providing clear error messages and proper error context propagation.

use thiserror::Error;

/// Condition kinds a sensor device can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCondition {
    NotReadable,
    NotAllowed,
    NotSupported,
    Disconnected,
}

/// Errors reported by a sensor device, either from `start()` or as an
/// error notification on its event stream
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    #[error("Sensor is not readable: {0}")]
    NotReadable(String),

    #[error("Sensor access not allowed: {0}")]
    NotAllowed(String),

    #[error("Sensor not supported: {0}")]
    NotSupported(String),

    #[error("Sensor disconnected: {0}")]
    Disconnected(String),
}

impl SensorError {
    /// The condition kind of this error, independent of its message
    pub fn condition(&self) -> ErrorCondition {
        match self {
            SensorError::NotReadable(_) => ErrorCondition::NotReadable,
            SensorError::NotAllowed(_) => ErrorCondition::NotAllowed,
            SensorError::NotSupported(_) => ErrorCondition::NotSupported,
            SensorError::Disconnected(_) => ErrorCondition::Disconnected,
        }
    }
}

/// Errors related to application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors related to the output surface
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Terminal initialization failed: {0}")]
    InitializationError(String),

    #[error("Output write failed: {0}")]
    WriteError(String),
}

/// Errors related to service/runtime operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Logging initialization failed: {0}")]
    LoggingError(String),

    #[error("Signal handling error: {0}")]
    SignalError(String),
}

/// Application-level errors that can wrap other error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unhandled sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_ignores_message() {
        assert_eq!(
            SensorError::NotReadable("a".into()).condition(),
            SensorError::NotReadable("b".into()).condition()
        );
        assert_eq!(
            SensorError::Disconnected(String::new()).condition(),
            ErrorCondition::Disconnected
        );
    }

    #[test]
    fn test_app_error_wraps_sensor_error() {
        let err: AppError = SensorError::NotAllowed("permission denied".into()).into();
        assert_eq!(
            err.to_string(),
            "Unhandled sensor error: Sensor access not allowed: permission denied"
        );
    }
}
