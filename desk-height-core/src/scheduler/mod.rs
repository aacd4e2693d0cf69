//! Poll scheduler
//!
//! Drives the poll state machine from a monotonic millisecond clock and
//! decides when a query frame goes out.

pub mod poller;

pub use poller::{PollAction, PollScheduler, Transition};
