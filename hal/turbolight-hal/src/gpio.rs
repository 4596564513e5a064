//! GPIO line abstractions
//!
//! A two-wire bus line is never driven high against a device: idle and
//! "1" bits are produced by letting go of the line and relying on the
//! pull-up. The trait therefore exposes direction control next to level
//! control.

/// Digital output line with direction control
///
/// Implementations should handle the actual port manipulation for the
/// specific chip. All operations are infallible; the bus is best-effort.
pub trait DigitalOutputLine {
    /// Drive the line high (logic 1)
    fn set_high(&mut self);

    /// Drive the line low (logic 0)
    fn set_low(&mut self);

    /// Switch the line to output, driving the last set level
    fn set_direction_output(&mut self);

    /// Release the line (input, pulled up externally)
    fn set_direction_input(&mut self);

    /// Set the line to a specific level
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

impl<T: DigitalOutputLine + ?Sized> DigitalOutputLine for &mut T {
    fn set_high(&mut self) {
        T::set_high(self)
    }

    fn set_low(&mut self) {
        T::set_low(self)
    }

    fn set_direction_output(&mut self) {
        T::set_direction_output(self)
    }

    fn set_direction_input(&mut self) {
        T::set_direction_input(self)
    }
}

/// Adapter for an `embedded-hal` pin already configured as open-drain
///
/// An open-drain output driven high is electrically the same as a
/// released input, so direction changes collapse onto the level:
/// releasing the line drives the pin high, and switching back to output
/// restores the level last requested.
pub struct OpenDrainLine<P> {
    pin: P,
    level: bool,
}

impl<P> OpenDrainLine<P>
where
    P: embedded_hal::digital::OutputPin,
{
    /// Wrap an open-drain pin, releasing it
    pub fn new(mut pin: P) -> Self {
        let _ = pin.set_high();
        Self { pin, level: true }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> DigitalOutputLine for OpenDrainLine<P>
where
    P: embedded_hal::digital::OutputPin,
{
    fn set_high(&mut self) {
        self.level = true;
        let _ = self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.level = false;
        let _ = self.pin.set_low();
    }

    fn set_direction_output(&mut self) {
        let _ = self.pin.set_state(self.level.into());
    }

    fn set_direction_input(&mut self) {
        let _ = self.pin.set_high();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorType, OutputPin};

    /// Mock open-drain pin for testing
    struct MockPin {
        high: bool,
        writes: u8,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_new_releases_line() {
        let line = OpenDrainLine::new(MockPin {
            high: false,
            writes: 0,
        });
        let pin = line.release();
        assert!(pin.high);
        assert_eq!(pin.writes, 1);
    }

    #[test]
    fn test_release_then_output_restores_level() {
        let mut line = OpenDrainLine::new(MockPin {
            high: true,
            writes: 0,
        });

        line.set_low();
        line.set_direction_input();
        assert!(line.pin.high);

        // Back to output: the low level requested earlier comes back
        line.set_direction_output();
        assert!(!line.pin.high);
    }

    #[test]
    fn test_set_level() {
        let mut line = OpenDrainLine::new(MockPin {
            high: true,
            writes: 0,
        });
        line.set_level(false);
        assert!(!line.pin.high);
        line.set_level(true);
        assert!(line.pin.high);
    }
}
