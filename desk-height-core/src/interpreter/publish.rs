//! Publish de-duplication

use super::height::HeightReading;

/// Forwards a reading only when it is valid and new
///
/// Holds the single last published value. Starts empty, so the first
/// valid reading always goes out.
#[derive(Debug, Clone, Default)]
pub struct PublishGate {
    last_published_x10: Option<u16>,
}

impl PublishGate {
    /// Create a gate that has published nothing yet
    pub const fn new() -> Self {
        Self {
            last_published_x10: None,
        }
    }

    /// Decide whether to publish `reading`
    ///
    /// Returns the value in centimetres to hand to the sink, and records it
    /// as the last published value.
    pub fn admit(&mut self, reading: &HeightReading) -> Option<f32> {
        let value = reading.value_x10;
        if value == 0 || self.last_published_x10 == Some(value) {
            return None;
        }
        self.last_published_x10 = Some(value);
        Some(reading.value_cm())
    }

    /// Last value handed to the sink
    pub fn last_published_cm(&self) -> Option<f32> {
        self.last_published_x10.map(|v| v as f32 / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(value_x10: u16) -> HeightReading {
        HeightReading {
            value_x10,
            previous_x10: None,
        }
    }

    #[test]
    fn test_first_reading_publishes() {
        let mut gate = PublishGate::new();
        assert_eq!(gate.last_published_cm(), None);
        assert_eq!(gate.admit(&reading(1230)), Some(123.0));
        assert_eq!(gate.last_published_cm(), Some(123.0));
    }

    #[test]
    fn test_repeat_is_suppressed() {
        let mut gate = PublishGate::new();
        assert!(gate.admit(&reading(745)).is_some());
        assert_eq!(gate.admit(&reading(745)), None);
        assert_eq!(gate.admit(&reading(746)), Some(74.6));
        assert_eq!(gate.admit(&reading(745)), Some(74.5));
    }

    #[test]
    fn test_zero_never_publishes() {
        let mut gate = PublishGate::new();
        assert_eq!(gate.admit(&reading(0)), None);
        assert_eq!(gate.last_published_cm(), None);
    }
}
