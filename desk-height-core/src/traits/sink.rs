//! Height publishing

/// Receiver of published heights
///
/// Called only with a valid height that differs from the previous one.
pub trait HeightSink {
    /// Publish a height in centimetres
    fn publish(&mut self, value_cm: f32);
}

impl<S: HeightSink + ?Sized> HeightSink for &mut S {
    fn publish(&mut self, value_cm: f32) {
        (**self).publish(value_cm)
    }
}
