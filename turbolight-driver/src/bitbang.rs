//! Software two-wire bus
//!
//! Drives SDA and SCL with plain GPIO toggles and busy-wait delays. Every
//! byte costs 9 clock pulses (8 data bits plus the acknowledge slot) and
//! four half-bit delays per pulse, which is why the layers above try hard
//! to keep transactions few and long.
//!
//! The acknowledge slot is clocked with SDA released but the level is
//! never sampled: a device that is missing or stuck still gets a complete
//! waveform and no error is reported.

use turbolight_hal::{BusTiming, DigitalOutputLine, PrecisionDelay, TwoWireBus};

/// R/W bit of the address byte for a write
const WRITE_BIT: u8 = 0;

/// Bit-banged two-wire bus master
pub struct SoftI2c<SDA, SCL, D> {
    sda: SDA,
    scl: SCL,
    delay: D,
    timing: BusTiming,
}

impl<SDA, SCL, D> SoftI2c<SDA, SCL, D>
where
    SDA: DigitalOutputLine,
    SCL: DigitalOutputLine,
    D: PrecisionDelay,
{
    /// Create a bus on two lines, leaving both released
    pub fn new(mut sda: SDA, mut scl: SCL, delay: D, timing: BusTiming) -> Self {
        sda.set_direction_input();
        scl.set_direction_input();
        Self {
            sda,
            scl,
            delay,
            timing,
        }
    }

    /// Current bit timing
    pub fn timing(&self) -> BusTiming {
        self.timing
    }

    /// Change the bit timing for subsequent transactions
    pub fn set_timing(&mut self, timing: BusTiming) {
        self.timing = timing;
    }

    /// Give the lines and delay back
    pub fn release(self) -> (SDA, SCL, D) {
        (self.sda, self.scl, self.delay)
    }

    fn half_bit(&mut self) {
        self.delay.delay_us(self.timing.half_bit_delay_us());
    }

    /// One clock pulse; SDA must already hold the bit
    fn clock(&mut self) {
        self.half_bit();
        self.scl.set_high();
        self.half_bit();
        self.scl.set_low();
    }

    fn byte_out(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.sda.set_level(byte & (1 << bit) != 0);
            self.clock();
        }

        // Acknowledge slot: let the device drive SDA, don't look at it
        self.sda.set_direction_input();
        self.clock();
        self.sda.set_direction_output();
    }
}

impl<SDA, SCL, D> TwoWireBus for SoftI2c<SDA, SCL, D>
where
    SDA: DigitalOutputLine,
    SCL: DigitalOutputLine,
    D: PrecisionDelay,
{
    fn begin(&mut self, address: u8) {
        // Idle: both high
        self.sda.set_high();
        self.scl.set_high();
        self.sda.set_direction_output();
        self.scl.set_direction_output();
        self.half_bit();

        // Start: SDA falls while SCL is high
        self.sda.set_low();
        self.half_bit();
        self.scl.set_low();

        self.byte_out((address << 1) | WRITE_BIT);
    }

    fn write_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.byte_out(byte);
        }
    }

    fn end(&mut self) {
        self.sda.set_low();
        self.half_bit();
        self.scl.set_high();
        self.half_bit();

        // Stop: SDA rises while SCL is high
        self.sda.set_high();
        self.half_bit();

        self.sda.set_direction_input();
        self.scl.set_direction_input();
    }
}

/// Error for the `embedded-hal` bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SoftI2cError {
    /// The bus has no input capability, reads are impossible
    ReadUnsupported,
}

impl embedded_hal::i2c::Error for SoftI2cError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        embedded_hal::i2c::ErrorKind::Other
    }
}

impl<SDA, SCL, D> embedded_hal::i2c::ErrorType for SoftI2c<SDA, SCL, D> {
    type Error = SoftI2cError;
}

/// Write-only `embedded-hal` view of the bus
///
/// Consecutive write operations share one transaction. Any read operation
/// fails the whole transaction before anything is clocked out.
impl<SDA, SCL, D> embedded_hal::i2c::I2c for SoftI2c<SDA, SCL, D>
where
    SDA: DigitalOutputLine,
    SCL: DigitalOutputLine,
    D: PrecisionDelay,
{
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        use embedded_hal::i2c::Operation;

        if operations
            .iter()
            .any(|op| matches!(op, Operation::Read(_)))
        {
            return Err(SoftI2cError::ReadUnsupported);
        }

        self.begin(address);
        for op in operations.iter() {
            if let Operation::Write(data) = op {
                self.write_bytes(data);
            }
        }
        self.end();
        Ok(())
    }
}
