//! Microsecond delay abstraction
//!
//! Bus timing on a bit-banged bus comes entirely from busy-waiting. The
//! driver takes the delay as a capability so host builds can replace it
//! with a no-op or a simulated clock.

/// Blocking microsecond delay
pub trait PrecisionDelay {
    /// Busy-wait for at least `us` microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: PrecisionDelay + ?Sized> PrecisionDelay for &mut T {
    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }
}

/// Delay that returns immediately
///
/// For host builds and simulators where wall-clock timing is irrelevant.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl PrecisionDelay for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}

/// Adapter for any `embedded-hal` 1.0 delay provider
#[derive(Debug)]
pub struct HalDelay<D>(pub D);

impl<D: embedded_hal::delay::DelayNs> PrecisionDelay for HalDelay<D> {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }
}
