//! Driver configuration
//!
//! Everything the caller decides at startup: where the panel sits on the
//! bus, the two panel-tuning init parameters, and how fast and how eagerly
//! to talk to it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use turbolight_hal::BusTiming;

use crate::cmd;
use crate::flush::FlushMode;

/// Default 7-bit device address (SA0 low)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Panel and bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OledConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Pre-charge period (phase 1 in the low nibble, phase 2 in the high)
    pub pre_charge_period: u8,
    /// Clock divide ratio / oscillator frequency
    pub refresh_frequency: u8,
    /// V_COMH deselect level
    pub vcom_deselect: u8,
    /// When pixel changes reach the panel
    pub flush_mode: FlushMode,
    /// Software bus timing
    pub timing: BusTiming,
}

impl Default for OledConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            pre_charge_period: 0xF1,
            refresh_frequency: 0x80,
            vcom_deselect: cmd::VCOM_DESELECT_MIN,
            flush_mode: FlushMode::Batched,
            timing: BusTiming::STANDARD,
        }
    }
}

impl OledConfig {
    /// Set the bus address (masked to 7 bits)
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address & 0x7F;
        self
    }

    /// Set the pre-charge period
    pub fn with_pre_charge_period(mut self, period: u8) -> Self {
        self.pre_charge_period = period;
        self
    }

    /// Set the clock divide / oscillator byte
    pub fn with_refresh_frequency(mut self, frequency: u8) -> Self {
        self.refresh_frequency = frequency;
        self
    }

    /// Set the V_COMH deselect level
    pub fn with_vcom_deselect(mut self, level: u8) -> Self {
        self.vcom_deselect = level;
        self
    }

    /// Choose batched or immediate updates
    pub fn with_flush_mode(mut self, mode: FlushMode) -> Self {
        self.flush_mode = mode;
        self
    }

    /// Choose the bus timing
    pub fn with_timing(mut self, timing: BusTiming) -> Self {
        self.timing = timing;
        self
    }

    /// The init command stream this configuration produces
    pub fn init_sequence(&self) -> [u8; cmd::INIT_LEN] {
        cmd::init_sequence(
            self.refresh_frequency,
            self.pre_charge_period,
            self.vcom_deselect,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OledConfig::default();
        assert_eq!(config.address, 0x3C);
        assert_eq!(config.flush_mode, FlushMode::Batched);
        assert_eq!(config.timing, BusTiming::STANDARD);
    }

    #[test]
    fn test_builder_masks_address() {
        let config = OledConfig::default()
            .with_address(0xBD)
            .with_flush_mode(FlushMode::Immediate);
        assert_eq!(config.address, 0x3D);
        assert_eq!(config.flush_mode, FlushMode::Immediate);
    }

    #[test]
    fn test_init_sequence_uses_parameters() {
        let seq = OledConfig::default()
            .with_refresh_frequency(0xF0)
            .with_pre_charge_period(0x22)
            .with_vcom_deselect(0x30)
            .init_sequence();
        assert_eq!(seq[15], 0xF0);
        assert_eq!(seq[22], 0x22);
        assert_eq!(seq[24], 0x30);
    }
}
