//! Events that trigger poll state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollEvent {
    /// Boot delay has elapsed
    BootElapsed,
    /// A decoded height differs from the previous one
    HeightChanged,
    /// No activity for the configured timeout
    ActivityTimeout,
}

impl PollEvent {
    /// Check if this event is produced by a timer rather than bus traffic
    pub fn is_timer_event(&self) -> bool {
        matches!(self, PollEvent::BootElapsed | PollEvent::ActivityTimeout)
    }
}
