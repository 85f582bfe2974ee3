//! Error notification handlers.
//!
//! Which errors the readout reacts to is a configuration choice: log the
//! recognized conditions, ignore everything, or let every error escape.

use crate::error::{ErrorCondition, SensorError};
use serde::{Deserialize, Serialize};

/// What became of an error notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Recognized and reported
    Handled,
    /// Dropped without a trace
    Ignored,
    /// Not handled; the readout loop must terminate with the error
    Unhandled,
}

#[cfg_attr(test, mockall::automock)]
pub trait ErrorHandler: Send {
    fn handle(&mut self, error: &SensorError) -> ErrorOutcome;
}

/// Configured error handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Log recognized conditions, ignore the rest
    Log,
    /// No error listener; everything is swallowed
    Ignore,
    /// No error listener; errors terminate the readout
    Propagate,
}

impl ErrorPolicy {
    pub fn handler(self) -> Box<dyn ErrorHandler> {
        match self {
            ErrorPolicy::Log => Box::new(LoggingErrorHandler::default()),
            ErrorPolicy::Ignore => Box::new(IgnoringErrorHandler),
            ErrorPolicy::Propagate => Box::new(PropagatingErrorHandler),
        }
    }
}

/// Logs the conditions it recognizes at warn level
pub struct LoggingErrorHandler {
    recognized: Vec<ErrorCondition>,
}

impl LoggingErrorHandler {
    pub fn new(recognized: Vec<ErrorCondition>) -> Self {
        Self { recognized }
    }
}

impl Default for LoggingErrorHandler {
    fn default() -> Self {
        Self::new(vec![ErrorCondition::NotReadable])
    }
}

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&mut self, error: &SensorError) -> ErrorOutcome {
        if !self.recognized.contains(&error.condition()) {
            return ErrorOutcome::Ignored;
        }
        match error.condition() {
            ErrorCondition::NotReadable => {
                tracing::warn!(detail = %error, "Sensor is not available.")
            }
            _ => tracing::warn!("{}", error),
        }
        ErrorOutcome::Handled
    }
}

pub struct IgnoringErrorHandler;

impl ErrorHandler for IgnoringErrorHandler {
    fn handle(&mut self, _error: &SensorError) -> ErrorOutcome {
        ErrorOutcome::Ignored
    }
}

pub struct PropagatingErrorHandler;

impl ErrorHandler for PropagatingErrorHandler {
    fn handle(&mut self, _error: &SensorError) -> ErrorOutcome {
        ErrorOutcome::Unhandled
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        pub(crate) fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static + use<> {
            tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .finish()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_logging_handler_logs_not_readable() {
        let logs = CapturedLogs::default();
        let mut handler = LoggingErrorHandler::default();

        let outcome = tracing::subscriber::with_default(logs.subscriber(), || {
            handler.handle(&SensorError::NotReadable("no device".into()))
        });

        assert_eq!(outcome, ErrorOutcome::Handled);
        assert!(logs.text().contains("Sensor is not available."));
    }

    #[test]
    fn test_logging_handler_ignores_other_conditions_silently() {
        let logs = CapturedLogs::default();
        let mut handler = LoggingErrorHandler::default();

        let outcomes: Vec<_> = tracing::subscriber::with_default(logs.subscriber(), || {
            [
                SensorError::NotAllowed("denied".into()),
                SensorError::NotSupported("no gyro".into()),
                SensorError::Disconnected("unplugged".into()),
            ]
            .iter()
            .map(|e| handler.handle(e))
            .collect()
        });

        assert!(outcomes.iter().all(|o| *o == ErrorOutcome::Ignored));
        assert!(logs.text().is_empty());
    }

    #[test]
    fn test_logging_handler_with_extra_conditions() {
        let mut handler = LoggingErrorHandler::new(vec![
            ErrorCondition::NotReadable,
            ErrorCondition::NotAllowed,
        ]);
        assert_eq!(
            handler.handle(&SensorError::NotAllowed("denied".into())),
            ErrorOutcome::Handled
        );
        assert_eq!(
            handler.handle(&SensorError::Disconnected("gone".into())),
            ErrorOutcome::Ignored
        );
    }

    #[test]
    fn test_policies() {
        let error = SensorError::NotReadable("x".into());
        assert_eq!(ErrorPolicy::Log.handler().handle(&error), ErrorOutcome::Handled);
        assert_eq!(ErrorPolicy::Ignore.handler().handle(&error), ErrorOutcome::Ignored);
        assert_eq!(
            ErrorPolicy::Propagate.handler().handle(&error),
            ErrorOutcome::Unhandled
        );
    }
}
