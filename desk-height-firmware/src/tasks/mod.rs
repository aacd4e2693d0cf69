//! Embassy async tasks
//!
//! Each task runs independently and communicates via pipes/signals.

pub mod report;
pub mod sensor;
pub mod serial;

pub use report::report_task;
pub use sensor::sensor_task;
pub use serial::{serial_rx_task, serial_tx_task};
