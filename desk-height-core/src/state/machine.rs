//! State machine definition
//!
//! Query cadence is a function of the current state; the state only
//! moves on an event.

use super::events::PollEvent;

/// Poll states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollState {
    /// Power-on, waiting before the first query
    #[default]
    BootWait,
    /// Desk still, slow polling
    Idle,
    /// Desk moving, fast polling
    Active,
}

impl PollState {
    /// Check if this state sends periodic queries
    pub fn polls(&self) -> bool {
        matches!(self, PollState::Idle | PollState::Active)
    }

    /// Check if this is the fast polling state
    pub fn is_active(&self) -> bool {
        matches!(self, PollState::Active)
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: PollEvent) -> Self {
        use PollEvent::*;
        use PollState::*;

        match (self, event) {
            (BootWait, BootElapsed) => Idle,
            (Idle, HeightChanged) => Active,
            (Active, ActivityTimeout) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
