//! Adaptive poll scheduler
//!
//! Slow polling while the desk is still, fast polling while it moves.
//! Every elapsed-time check goes through [`elapsed_ms`] so a wrapping
//! millisecond counter never stalls or floods the bus.

use desk_height_hal::elapsed_ms;
use desk_height_protocol::QueryCommand;

use crate::config::SensorConfig;
use crate::state::{PollEvent, PollState};

/// A state change made by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: PollState,
    pub to: PollState,
}

/// Outcome of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollAction {
    /// Query to write to the bus this tick
    pub query: Option<QueryCommand>,
    /// State change made this tick
    pub transition: Option<Transition>,
}

/// Poll scheduler
///
/// Owns the poll state and the three timestamps it is judged against.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    config: SensorConfig,
    state: PollState,
    boot_ms: u32,
    last_poll_ms: u32,
    last_activity_ms: u32,
}

impl PollScheduler {
    /// Create a scheduler that booted at `now_ms`
    pub fn new(config: SensorConfig, now_ms: u32) -> Self {
        Self {
            config,
            state: PollState::BootWait,
            boot_ms: now_ms,
            last_poll_ms: now_ms,
            last_activity_ms: now_ms,
        }
    }

    /// Current poll state
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Time of the last query (or boot)
    pub fn last_poll_ms(&self) -> u32 {
        self.last_poll_ms
    }

    /// Time of the last recorded activity (or boot)
    pub fn last_activity_ms(&self) -> u32 {
        self.last_activity_ms
    }

    /// Replace timing and query choices, keeping the current state
    pub fn reconfigure(&mut self, config: SensorConfig) {
        self.config = config;
    }

    /// Record bus activity, pushing back the active timeout
    pub fn note_activity(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// Report a height different from the previous one
    ///
    /// Switches idle polling to active polling. Entering the active state
    /// counts as activity.
    pub fn height_changed(&mut self, now_ms: u32) -> Option<Transition> {
        let transition = self.apply(PollEvent::HeightChanged);
        if transition.is_some() {
            self.last_activity_ms = now_ms;
        }
        transition
    }

    /// Advance timers
    ///
    /// Call once per host tick. Returns the query to send, if any, and the
    /// state change made, if any.
    pub fn tick(&mut self, now_ms: u32) -> PollAction {
        let timing = self.config.timing;
        let mut action = PollAction::default();

        match self.state {
            PollState::BootWait => {
                if elapsed_ms(now_ms, self.boot_ms) >= timing.boot_delay_ms {
                    action.transition = self.apply(PollEvent::BootElapsed);
                    action.query = Some(self.config.boot_query);
                    self.last_poll_ms = now_ms;
                }
            }
            PollState::Idle => {
                if elapsed_ms(now_ms, self.last_poll_ms) >= timing.idle_interval_ms {
                    action.query = self.config.idle_query;
                    self.last_poll_ms = now_ms;
                }
            }
            PollState::Active => {
                if elapsed_ms(now_ms, self.last_poll_ms) >= timing.active_interval_ms {
                    action.query = Some(self.config.active_query);
                    self.last_poll_ms = now_ms;
                }

                if elapsed_ms(now_ms, self.last_activity_ms) >= timing.activity_timeout_ms {
                    action.transition = self.apply(PollEvent::ActivityTimeout);
                }
            }
        }

        action
    }

    fn apply(&mut self, event: PollEvent) -> Option<Transition> {
        let from = self.state;
        let to = from.transition(event);
        if to == from {
            return None;
        }
        self.state = to;
        Some(Transition { from, to })
    }
}
