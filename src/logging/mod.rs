//! Logging statistics from orchestrated runs
mod cli;

pub use cli::CLILogger;

use enum_map::Enum;
use std::borrow::Cow;
use std::io;
use thiserror::Error;

/// Orchestrator run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Event {
    /// One observe-act-step-learn iteration.
    Tick,
    /// One call to `Orchestrator::run`.
    Episode,
}

/// A value that can be logged.
#[derive(Debug, Clone, PartialEq)]
pub enum Loggable {
    /// Nothing. No data to log.
    /// Logging Nothing data may still produce a placeholder entry for the name.
    Nothing,
    /// A scalar value. Aggregate by taking means.
    Scalar(f64),
    /// A sample from a distrbution over 0 .. (size-1)
    IndexSample { value: usize, size: usize },
    /// A message string. Aggregate by counting occurrences.
    Message(Cow<'static, str>),
}

impl From<f64> for Loggable {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for Loggable {
    fn from(value: f32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<&'static str> for Loggable {
    fn from(message: &'static str) -> Self {
        Self::Message(Cow::Borrowed(message))
    }
}

impl From<String> for Loggable {
    fn from(message: String) -> Self {
        Self::Message(Cow::Owned(message))
    }
}

/// Log statistics from an orchestrated run.
pub trait Logger {
    /// Log a value.
    ///
    /// # Args
    /// * `event` - The event associated with this value.
    /// * `name` - The name that identifies this value.
    /// * `value` - The value to log.
    ///
    /// # Returns
    /// May return an error if the logged value is structurally incompatible
    /// with previous values logged under the same name.
    fn log(&mut self, event: Event, name: &str, value: Loggable) -> Result<(), LogError>;

    /// Mark the end of an event.
    fn done(&mut self, event: Event) -> Result<(), LogError>;
}

/// Logger that does nothing
impl Logger for () {
    fn log(&mut self, _: Event, _: &str, _: Loggable) -> Result<(), LogError> {
        Ok(())
    }

    fn done(&mut self, _: Event) -> Result<(), LogError> {
        Ok(())
    }
}

impl<T: Logger + ?Sized> Logger for &mut T {
    fn log(&mut self, event: Event, name: &str, value: Loggable) -> Result<(), LogError> {
        T::log(self, event, name, value)
    }

    fn done(&mut self, event: Event) -> Result<(), LogError> {
        T::done(self, event)
    }
}

/// Error logging a value.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("\"{name}\": incompatible value {value:?}, expected {expected}")]
    IncompatibleValue {
        name: String,
        value: Loggable,
        expected: String,
    },
    #[error("error writing log summary")]
    Io(#[from] io::Error),
}
