//! Monotonic time source
//!
//! The sensor only ever compares two readings of the same clock, so a
//! free-running `u32` millisecond counter is enough. It wraps after ~49.7
//! days; [`elapsed_ms`] keeps comparisons correct across the wrap.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed from `since` to `now`
///
/// Computed with wrapping subtraction, so the result stays correct when the
/// counter overflows between the two readings.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
