//! Command-line logger
use super::{Event, LogError, Loggable, Logger};
use enum_map::{enum_map, EnumMap};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use yansi::Paint;

/// Logger that writes periodic summaries to standard output.
///
/// Values are aggregated per event and name between displays:
/// scalars by their mean, index samples by their empirical distribution,
/// and messages by their number of occurrences.
pub struct CLILogger<W: Write = io::Stdout> {
    events: EnumMap<Event, EventLog>,

    display_period: Duration,
    last_display_time: Instant,

    writer: W,
}

impl CLILogger {
    pub fn new(display_period: Duration) -> Self {
        Self::with_writer(io::stdout(), display_period)
    }
}

impl<W: Write> CLILogger<W> {
    /// Create a logger that writes its summaries to `writer`.
    pub fn with_writer(writer: W, display_period: Duration) -> Self {
        Self {
            events: enum_map! { _ => EventLog::new() },
            display_period,
            last_display_time: Instant::now(),
            writer,
        }
    }

    /// Display the summary and clear all committed data.
    pub fn display(&mut self) -> io::Result<()> {
        writeln!(self.writer)?;
        for (event, event_log) in self.events.iter_mut() {
            let summary_size = event_log.index - event_log.summary_start_index;
            if summary_size == 0 {
                continue;
            }

            let per_event =
                event_log.summary_duration / u32::try_from(summary_size).unwrap_or(u32::MAX);
            writeln!(
                self.writer,
                "==== {} {} - {} ({:?} / event) ====",
                Paint::fixed(35, format!("{:?}s", event)),
                event_log.summary_start_index,
                event_log.index - 1,
                per_event
            )?;

            for (name, entry) in &mut event_log.entries {
                writeln!(self.writer, "{:<24} {}", name, entry.aggregator)?;
                entry.aggregator.clear();
            }
            event_log.summary_start_index = event_log.index;
        }
        self.last_display_time = Instant::now();
        self.writer.flush()
    }
}

impl<W: Write> Logger for CLILogger<W> {
    fn log(&mut self, event: Event, name: &str, value: Loggable) -> Result<(), LogError> {
        // Separate get / insert so that the name is only copied the first time it is seen.
        let entries = &mut self.events[event].entries;
        if let Some(entry) = entries.get_mut(name) {
            return entry.stage(name, value);
        }
        let mut entry = Entry::new(Aggregator::for_value(&value));
        entry.stage(name, value)?;
        entries.insert(name.to_owned(), entry);
        Ok(())
    }

    fn done(&mut self, event: Event) -> Result<(), LogError> {
        let event_log = &mut self.events[event];
        event_log.index += 1;
        for entry in event_log.entries.values_mut() {
            entry.commit();
        }

        let time_since_display = self.last_display_time.elapsed();
        event_log.summary_duration = time_since_display;
        if time_since_display >= self.display_period {
            self.display()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for CLILogger<W> {
    fn drop(&mut self) {
        // Flush whatever has been committed since the last display.
        let _ = self.display();
    }
}

struct EventLog {
    /// Global index for this event
    index: u64,
    /// Value of `index` at the start of this summary period
    summary_start_index: u64,
    /// Duration of this summary period up to the most recent event
    summary_duration: Duration,
    entries: BTreeMap<String, Entry>,
}

impl EventLog {
    #[allow(clippy::missing_const_for_fn)] // BTreeMap const new not stabilized
    fn new() -> Self {
        Self {
            index: 0,
            summary_start_index: 0,
            summary_duration: Duration::new(0, 0),
            entries: BTreeMap::new(),
        }
    }
}

/// An aggregator and the value logged for it during the current event.
struct Entry {
    aggregator: Aggregator,
    pending: Option<Loggable>,
}

impl Entry {
    const fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            pending: None,
        }
    }

    /// Stage a value to be committed at the end of the event.
    fn stage(&mut self, name: &str, value: Loggable) -> Result<(), LogError> {
        if let Err(expected) = self.aggregator.check(&value) {
            return Err(LogError::IncompatibleValue {
                name: name.to_owned(),
                value,
                expected,
            });
        }
        self.pending = Some(value);
        Ok(())
    }

    fn commit(&mut self) {
        if let Some(value) = self.pending.take() {
            self.aggregator.insert(value);
        }
    }
}

#[derive(Debug)]
enum Aggregator {
    Nothing,
    Mean { sum: f64, count: u64 },
    Distribution { counts: Vec<u64> },
    Messages { counts: BTreeMap<Cow<'static, str>, u64> },
}

impl Aggregator {
    /// An empty aggregator of the kind that accepts `value`.
    fn for_value(value: &Loggable) -> Self {
        match value {
            Loggable::Nothing => Self::Nothing,
            Loggable::Scalar(_) => Self::Mean { sum: 0.0, count: 0 },
            Loggable::IndexSample { size, .. } => Self::Distribution {
                counts: vec![0; *size],
            },
            Loggable::Message(_) => Self::Messages {
                counts: BTreeMap::new(),
            },
        }
    }

    /// Check that a value can be aggregated; on failure describe what was expected.
    fn check(&self, value: &Loggable) -> Result<(), String> {
        match (self, value) {
            (Self::Nothing, Loggable::Nothing)
            | (Self::Mean { .. }, Loggable::Scalar(_))
            | (Self::Messages { .. }, Loggable::Message(_)) => Ok(()),
            (Self::Distribution { counts }, Loggable::IndexSample { value, size })
                if *size == counts.len() && value < size =>
            {
                Ok(())
            }
            (Self::Nothing, _) => Err("Nothing".into()),
            (Self::Mean { .. }, _) => Err("Scalar".into()),
            (Self::Distribution { counts }, _) => {
                Err(format!("IndexSample{{size: {}}}", counts.len()))
            }
            (Self::Messages { .. }, _) => Err("Message".into()),
        }
    }

    /// Insert a checked value.
    fn insert(&mut self, value: Loggable) {
        match (self, value) {
            (Self::Mean { sum, count }, Loggable::Scalar(x)) => {
                *sum += x;
                *count += 1;
            }
            (Self::Distribution { counts }, Loggable::IndexSample { value, .. }) => {
                counts[value] += 1;
            }
            (Self::Messages { counts }, Loggable::Message(message)) => {
                *counts.entry(message).or_insert(0) += 1;
            }
            _ => {}
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Nothing => {}
            Self::Mean { sum, count } => {
                *sum = 0.0;
                *count = 0;
            }
            Self::Distribution { counts } => counts.iter_mut().for_each(|c| *c = 0),
            Self::Messages { counts } => counts.clear(),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "Nothing"),
            Self::Mean { count: 0, .. } => write!(f, "None"),
            Self::Mean { sum, count } => write!(f, "{}", sum / (*count as f64)),
            Self::Distribution { counts } => {
                let total: u64 = counts.iter().sum();
                if total == 0 {
                    return write!(f, "None");
                }
                write!(f, "[")?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:.3}", (*c as f64) / (total as f64))?;
                }
                write!(f, "]")
            }
            Self::Messages { counts } if counts.len() == 1 => {
                for (message, count) in counts {
                    write!(f, "[x{}] {}", count, message)?;
                }
                Ok(())
            }
            Self::Messages { counts } => {
                for (message, count) in counts {
                    write!(f, "\n\t[x{}] {}", count, message)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output<F: FnOnce(&mut CLILogger<&mut Vec<u8>>)>(f: F) -> String {
        let mut buffer = Vec::new();
        {
            let mut logger = CLILogger::with_writer(&mut buffer, Duration::from_secs(3600));
            f(&mut logger);
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn displays_scalar_mean_on_drop() {
        let out = output(|logger| {
            logger.log(Event::Tick, "reward", 1.0.into()).unwrap();
            logger.done(Event::Tick).unwrap();
            logger.log(Event::Tick, "reward", 3.0.into()).unwrap();
            logger.done(Event::Tick).unwrap();
        });
        assert!(out.contains("Ticks"));
        assert!(out.contains("reward"));
        assert!(out.contains(" 2\n"));
    }

    #[test]
    fn displays_index_distribution() {
        let out = output(|logger| {
            for value in [0, 1, 1, 1] {
                logger
                    .log(Event::Tick, "action", Loggable::IndexSample { value, size: 2 })
                    .unwrap();
                logger.done(Event::Tick).unwrap();
            }
        });
        assert!(out.contains("[0.250, 0.750]"));
    }

    #[test]
    fn displays_message_counts() {
        let out = output(|logger| {
            logger.log(Event::Episode, "end", "terminated".into()).unwrap();
            logger.done(Event::Episode).unwrap();
            logger.log(Event::Episode, "end", "terminated".into()).unwrap();
            logger.done(Event::Episode).unwrap();
        });
        assert!(out.contains("[x2] terminated"));
    }

    #[test]
    fn uncommitted_values_are_not_displayed() {
        let out = output(|logger| {
            logger.log(Event::Tick, "reward", 1.0.into()).unwrap();
        });
        assert!(!out.contains("reward"));
    }

    #[test]
    fn incompatible_value_is_rejected() {
        let mut logger = CLILogger::with_writer(io::sink(), Duration::from_secs(3600));
        logger.log(Event::Tick, "reward", 1.0.into()).unwrap();
        let result = logger.log(Event::Tick, "reward", "high".into());
        assert!(matches!(
            result,
            Err(LogError::IncompatibleValue { ref expected, .. }) if expected == "Scalar"
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut logger = CLILogger::with_writer(io::sink(), Duration::from_secs(3600));
        let result = logger.log(Event::Tick, "action", Loggable::IndexSample { value: 2, size: 2 });
        assert!(result.is_err());
    }

    #[test]
    fn same_name_in_different_events() {
        let mut logger = CLILogger::with_writer(io::sink(), Duration::from_secs(3600));
        logger.log(Event::Tick, "reward", 1.0.into()).unwrap();
        logger
            .log(Event::Episode, "reward", "finished".into())
            .unwrap();
    }
}
