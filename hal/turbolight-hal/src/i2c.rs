//! Two-wire bus abstractions
//!
//! The driver only ever writes to the display, one logical command per
//! transaction. The transport exposes exactly that shape: a start with the
//! device address, any number of byte runs, and a stop.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Write-only two-wire bus master
///
/// There is no error channel: the acknowledge slot is clocked but never
/// checked, so every write is best-effort.
pub trait TwoWireBus {
    /// Issue a start condition and clock out `address << 1 | write`
    ///
    /// # Arguments
    /// * `address` - 7-bit device address
    fn begin(&mut self, address: u8);

    /// Clock out bytes MSB-first, each followed by an acknowledge slot
    ///
    /// An empty slice is a no-op.
    fn write_bytes(&mut self, data: &[u8]);

    /// Issue a stop condition and release the bus
    fn end(&mut self);

    /// Run one complete transaction made of several byte runs
    ///
    /// The runs are sent back to back between a single start and stop,
    /// which lets a control byte and a payload share one transaction
    /// without copying them into one buffer.
    fn transaction(&mut self, address: u8, chunks: &[&[u8]]) {
        self.begin(address);
        for chunk in chunks {
            self.write_bytes(chunk);
        }
        self.end();
    }
}

impl<T: TwoWireBus + ?Sized> TwoWireBus for &mut T {
    fn begin(&mut self, address: u8) {
        T::begin(self, address)
    }

    fn write_bytes(&mut self, data: &[u8]) {
        T::write_bytes(self, data)
    }

    fn end(&mut self) {
        T::end(self)
    }
}

/// Bit timing for a software two-wire bus
///
/// The half-bit delay is never zero, whichever way the value was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawTiming", into = "RawTiming"))]
pub struct BusTiming {
    /// Hold time for each half of a bit period, in microseconds
    half_bit_delay_us: u32,
}

/// Serialized form of [`BusTiming`]; decoding goes through the clamp
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawTiming {
    half_bit_delay_us: u32,
}

#[cfg(feature = "serde")]
impl From<RawTiming> for BusTiming {
    fn from(raw: RawTiming) -> Self {
        Self::from_half_bit_delay(raw.half_bit_delay_us)
    }
}

#[cfg(feature = "serde")]
impl From<BusTiming> for RawTiming {
    fn from(timing: BusTiming) -> Self {
        Self {
            half_bit_delay_us: timing.half_bit_delay_us,
        }
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BusTiming {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self::from_frequency(100_000);

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self::from_frequency(400_000);

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self::from_frequency(1_000_000);

    /// Derive the half-bit delay for a target clock frequency
    ///
    /// The half period is rounded up so the bus never runs faster than
    /// requested; the result is at least 1 µs.
    pub const fn from_frequency(hz: u32) -> Self {
        let hz = if hz == 0 { 1 } else { hz };
        Self::from_half_bit_delay(500_000u32.div_ceil(hz))
    }

    /// Use an explicit half-bit delay (clamped to at least 1 µs)
    pub const fn from_half_bit_delay(us: u32) -> Self {
        Self {
            half_bit_delay_us: if us == 0 { 1 } else { us },
        }
    }

    /// Hold time for each half of a bit period, in microseconds
    pub const fn half_bit_delay_us(&self) -> u32 {
        self.half_bit_delay_us
    }

    /// Nominal bus clock this timing produces, ignoring pin overhead
    pub const fn frequency(&self) -> u32 {
        let us = if self.half_bit_delay_us == 0 {
            1
        } else {
            self.half_bit_delay_us
        };
        500_000 / us
    }
}
