//! Diagnostic events
//!
//! The sensor never prints. Everything worth logging is handed to an
//! [`EventLog`] as a [`SensorEvent`]; the firmware forwards them to defmt,
//! tests collect them. Recording an event never influences the sensor.

use desk_height_protocol::{FrameError, QueryCommand};

use crate::config::{ConfigError, SensorConfig};
use crate::interpreter::IgnoreReason;
use crate::scheduler::Transition;

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
}

/// Something the sensor observed or did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorEvent {
    /// A frame was dropped by the receiver
    FrameRejected(FrameError),
    /// The serial port reported a receive error
    ReadFailed,
    /// A query could not be written
    WriteFailed(QueryCommand),
    /// A message type this sensor does not use
    MessageUnhandled { msg_type: u8, length: u8 },
    /// A height broadcast that carried no height
    ReadingIgnored(IgnoreReason),
    /// A height was decoded (0.1 cm units)
    HeightDecoded { value_x10: u16 },
    /// A height was handed to the sink (0.1 cm units)
    HeightPublished { value_x10: u16 },
    /// Poll state changed
    StateChanged(Transition),
    /// A query was written
    QuerySent(QueryCommand),
    /// A configuration was applied
    Configured(SensorConfig),
    /// A configuration was refused, the previous one stays
    ConfigRejected(ConfigError),
}

impl SensorEvent {
    /// Severity used when logging this event
    pub fn level(&self) -> Level {
        match self {
            SensorEvent::FrameRejected(_)
            | SensorEvent::ReadFailed
            | SensorEvent::WriteFailed(_)
            | SensorEvent::ConfigRejected(_) => Level::Warn,
            SensorEvent::HeightPublished { .. }
            | SensorEvent::StateChanged(_)
            | SensorEvent::Configured(_) => Level::Info,
            SensorEvent::ReadingIgnored(_)
            | SensorEvent::HeightDecoded { .. }
            | SensorEvent::QuerySent(_) => Level::Debug,
            SensorEvent::MessageUnhandled { .. } => Level::Trace,
        }
    }
}

/// Sink for diagnostic events
pub trait EventLog {
    /// Record one event
    fn record(&mut self, event: SensorEvent);
}

/// Discards every event
impl EventLog for () {
    fn record(&mut self, _event: SensorEvent) {}
}

impl<L: EventLog + ?Sized> EventLog for &mut L {
    fn record(&mut self, event: SensorEvent) {
        (**self).record(event)
    }
}
