//! Poll state machine
//!
//! Decides how eagerly the controller is queried. The state machine is
//! explicit, finite, and deterministic; timing lives in the scheduler.

pub mod events;
pub mod machine;

pub use events::PollEvent;
pub use machine::PollState;
