//! Height interpretation
//!
//! Turns received packets into height readings and decides which of them
//! are worth publishing.

pub mod height;
pub mod publish;

pub use height::{decode_height, HeightInterpreter, HeightReading, IgnoreReason, Interpretation};
pub use publish::PublishGate;
