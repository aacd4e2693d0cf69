//! Collaborator traits
//!
//! These traits define what the sensor hands its host: finished heights
//! and a stream of diagnostic events. The serial port and clock come from
//! `desk-height-hal`.

pub mod log;
pub mod sink;

pub use log::{EventLog, Level, SensorEvent};
pub use sink::HeightSink;
