//! The display driver
//!
//! [`Oled`] owns the bus interface, the framebuffer and the change tracker.
//! Callers mutate the framebuffer through pixel, fill and block-load
//! operations, then push the changes with [`Oled::flush`].

use turbolight_hal::{DigitalOutputLine, PrecisionDelay, TwoWireBus};

use crate::bitbang::SoftI2c;
use crate::cmd;
use crate::config::OledConfig;
use crate::error::DisplayError;
use crate::flush::{self, FlushMode, FlushStats};
use crate::framebuffer::Framebuffer;
use crate::interface::DisplayInterface;
use crate::tracking::{DirtyTracker, PageDirty};

/// 128x64 monochrome OLED on a two-wire bus
pub struct Oled<B, T = PageDirty> {
    iface: DisplayInterface<B>,
    frame: Framebuffer,
    tracker: T,
    config: OledConfig,
}

impl<B: TwoWireBus> Oled<B, PageDirty> {
    /// Create a driver with page-granularity change tracking
    pub fn new(bus: B, config: OledConfig) -> Self {
        Self::with_tracker(bus, config, PageDirty::default())
    }
}

impl<SDA, SCL, D> Oled<SoftI2c<SDA, SCL, D>, PageDirty>
where
    SDA: DigitalOutputLine,
    SCL: DigitalOutputLine,
    D: PrecisionDelay,
{
    /// Create a driver that bit-bangs the bus on two GPIO lines
    pub fn bit_banged(sda: SDA, scl: SCL, delay: D, config: OledConfig) -> Self {
        Self::new(SoftI2c::new(sda, scl, delay, config.timing), config)
    }
}

impl<B, T> Oled<B, T>
where
    B: TwoWireBus,
    T: DirtyTracker,
{
    /// Create a driver with a specific change tracker
    pub fn with_tracker(bus: B, config: OledConfig, mut tracker: T) -> Self {
        let config = config.with_address(config.address);
        tracker.mark_all();
        Self {
            iface: DisplayInterface::new(bus, config.address),
            frame: Framebuffer::new(),
            tracker,
            config,
        }
    }

    /// Initialize the controller with the stored configuration
    pub fn init(&mut self) {
        let config = self.config;
        self.initialize(
            config.address,
            config.pre_charge_period,
            config.refresh_frequency,
        );
    }

    /// Initialize the controller
    ///
    /// Sends the whole init sequence in one transaction, then clears the
    /// framebuffer and marks everything dirty so the next flush repaints
    /// the panel.
    pub fn initialize(&mut self, address: u8, pre_charge_period: u8, refresh_frequency: u8) {
        self.config = self
            .config
            .with_address(address)
            .with_pre_charge_period(pre_charge_period)
            .with_refresh_frequency(refresh_frequency);
        self.iface.set_address(self.config.address);

        info!("initializing display at {=u8:#x}", self.config.address);
        self.iface.send_commands(&self.config.init_sequence());

        self.frame.fill(0x00);
        self.tracker.mark_all();
    }

    /// Turn the panel on or off (RAM is retained)
    pub fn set_power(&mut self, on: bool) {
        debug!("display power {=bool}", on);
        self.iface
            .send_command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF });
    }

    /// Set panel contrast
    pub fn set_contrast(&mut self, value: u8) {
        self.iface.send_command2(cmd::SET_CONTRAST, value);
    }

    /// Invert display colors in hardware
    pub fn set_inverted(&mut self, inverted: bool) {
        self.iface
            .send_command(if inverted { cmd::SET_INVERSE } else { cmd::SET_NORMAL });
    }

    /// Set or clear one pixel
    ///
    /// Out-of-range coordinates are ignored and reported as
    /// [`DisplayError::OutOfRange`]. In [`FlushMode::Immediate`] a changed
    /// byte is written to the panel before this returns.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) -> Result<(), DisplayError> {
        let (loc, changed) = self
            .frame
            .set_pixel(x, y, on)
            .ok_or(DisplayError::OutOfRange)?;
        self.tracker.mark_byte(loc.index());

        if changed && self.config.flush_mode == FlushMode::Immediate {
            flush::sync_byte(&mut self.iface, &self.frame, &mut self.tracker, loc);
        }
        Ok(())
    }

    /// Read back one pixel from the framebuffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.frame.pixel(x, y)
    }

    /// Set every framebuffer byte to `value`
    pub fn fill(&mut self, value: u8) {
        self.frame.fill(value);
        self.tracker.mark_span(0..crate::framebuffer::BUFFER_SIZE);
    }

    /// Copy page-formatted image bytes into the framebuffer
    ///
    /// `offset` is a byte offset, rounded down to its page. Bytes past the
    /// end of the framebuffer are dropped. Returns how many bytes were
    /// committed.
    pub fn load_block(&mut self, data: &[u8], offset: usize) -> usize {
        let span = self.frame.load(data, offset);
        let committed = span.len();
        self.tracker.mark_span(span);
        committed
    }

    /// Push every dirty region to the panel
    pub fn flush(&mut self) -> FlushStats {
        let stats = flush::flush_dirty(&mut self.iface, &self.frame, &mut self.tracker);
        trace!(
            "flush: {=usize} blocks, {=usize} bytes",
            stats.blocks,
            stats.bytes
        );
        stats
    }

    /// Blank the framebuffer and the panel
    pub fn clear(&mut self) -> FlushStats {
        self.fill(0x00);
        self.flush()
    }

    /// Whether any part of `page` awaits a flush
    pub fn is_page_dirty(&self, page: usize) -> bool {
        self.tracker.is_page_dirty(page, &self.frame)
    }

    /// Read-only view of the framebuffer
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }

    /// Current configuration
    pub fn config(&self) -> &OledConfig {
        &self.config
    }

    /// Switch between batched and immediate updates
    pub fn set_flush_mode(&mut self, mode: FlushMode) {
        self.config.flush_mode = mode;
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.iface.release()
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut B {
        self.iface.bus_mut()
    }
}
