//! Image ingest from a serial link
//!
//! Two ways to get pixels onto the display from a host:
//!
//! - [`ImageLink::receive_image`] takes a raw stream of page-formatted
//!   bytes and commits each 128-byte page as soon as it is complete.
//! - [`ImageLink::serve_commands`] decodes framed [`ImageCommand`]s and
//!   applies them one by one.
//!
//! Both wait on the link by polling with a fixed interval and give up
//! once it has been idle for [`IngestConfig::idle_timeout_us`]. Whatever
//! was received before that stays in the framebuffer.

use turbolight_hal::{PrecisionDelay, TwoWireBus, UartRx};
use turbolight_protocol::{FrameParser, ImageCommand};

use crate::driver::Oled;
use crate::framebuffer::WIDTH;
use crate::tracking::DirtyTracker;

/// Link polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IngestConfig {
    /// Give up after this long without a byte
    pub idle_timeout_us: u32,
    /// Wait between two empty polls
    pub poll_interval_us: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            idle_timeout_us: 100_000,
            poll_interval_us: 50,
        }
    }
}

/// Ingest errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestError<E> {
    /// The link went idle before the image was complete
    Timeout {
        /// Bytes already written to the framebuffer
        committed: usize,
    },
    /// The receiver reported an error
    Uart(E),
}

/// Outcome of a command session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServeStats {
    /// Commands decoded and applied
    pub applied: usize,
    /// Frames dropped for a bad checksum, bad length or unknown type
    pub rejected: usize,
}

/// A serial receiver paired with the delay used to pace polling
pub struct ImageLink<R, D> {
    rx: R,
    delay: D,
    config: IngestConfig,
}

impl<R, D> ImageLink<R, D>
where
    R: UartRx,
    D: PrecisionDelay,
{
    pub fn new(rx: R, delay: D, config: IngestConfig) -> Self {
        Self { rx, delay, config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Give back the receiver and the delay
    pub fn release(self) -> (R, D) {
        (self.rx, self.delay)
    }

    /// Wait for the next byte; `Ok(None)` once the link has been idle
    /// for the configured timeout
    fn next_byte(&mut self) -> Result<Option<u8>, R::Error> {
        let step = self.config.poll_interval_us.max(1);
        let mut idle = 0u32;
        loop {
            if let Some(byte) = self.rx.try_read_byte()? {
                return Ok(Some(byte));
            }
            if idle >= self.config.idle_timeout_us {
                return Ok(None);
            }
            self.delay.delay_us(step);
            idle = idle.saturating_add(step);
        }
    }

    /// Receive `byte_count` raw framebuffer bytes starting at `offset`
    ///
    /// `offset` is rounded down to its page like [`Oled::load_block`].
    /// Bytes aimed past the end of the framebuffer are still read from
    /// the link but dropped.
    /// Each full page is committed as it arrives; on timeout the partial
    /// page is committed too. Returns the number of bytes committed.
    pub fn receive_image<B, T>(
        &mut self,
        oled: &mut Oled<B, T>,
        byte_count: usize,
        offset: usize,
    ) -> Result<usize, IngestError<R::Error>>
    where
        B: TwoWireBus,
        T: DirtyTracker,
    {
        let base = offset - offset % WIDTH;
        let mut chunk = [0u8; WIDTH];
        let mut filled = 0;
        let mut received = 0;
        let mut committed = 0;

        while received < byte_count {
            let Some(byte) = self.next_byte().map_err(IngestError::Uart)? else {
                let at = base.saturating_add(received - filled);
                committed += oled.load_block(&chunk[..filled], at);
                debug!(
                    "image ingest timed out after {=usize} of {=usize} bytes",
                    received,
                    byte_count
                );
                return Err(IngestError::Timeout { committed });
            };

            chunk[filled] = byte;
            filled += 1;
            received += 1;

            if filled == WIDTH || received == byte_count {
                let at = base.saturating_add(received - filled);
                committed += oled.load_block(&chunk[..filled], at);
                filled = 0;
            }
        }

        Ok(committed)
    }

    /// Apply framed commands until the link goes idle
    ///
    /// Malformed frames are counted and skipped. A frame cut short by the
    /// idle timeout counts as rejected.
    pub fn serve_commands<B, T>(
        &mut self,
        oled: &mut Oled<B, T>,
    ) -> Result<ServeStats, IngestError<R::Error>>
    where
        B: TwoWireBus,
        T: DirtyTracker,
    {
        let mut parser = FrameParser::new();
        let mut stats = ServeStats::default();

        while let Some(byte) = self.next_byte().map_err(IngestError::Uart)? {
            let frame = match parser.feed(byte) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(_e) => {
                    warn!("frame error: {:?}", _e);
                    stats.rejected += 1;
                    continue;
                }
            };

            match ImageCommand::from_frame(&frame) {
                Ok(command) => {
                    apply(oled, command);
                    stats.applied += 1;
                }
                Err(_e) => {
                    warn!("bad command {=u8:#x}: {:?}", frame.msg_type, _e);
                    stats.rejected += 1;
                }
            }
        }

        if parser.in_frame() {
            stats.rejected += 1;
        }
        debug!(
            "link idle: {=usize} applied, {=usize} rejected",
            stats.applied,
            stats.rejected
        );
        Ok(stats)
    }
}

fn apply<B, T>(oled: &mut Oled<B, T>, command: ImageCommand)
where
    B: TwoWireBus,
    T: DirtyTracker,
{
    match command {
        ImageCommand::Fill { value } => oled.fill(value),
        ImageCommand::LoadBlock { offset, data } => {
            oled.load_block(&data, usize::from(offset));
        }
        // Coordinates past the panel are dropped like any other caller's
        ImageCommand::SetPixel { x, y, on } => {
            let _ = oled.set_pixel(i32::from(x), i32::from(y), on);
        }
        ImageCommand::Flush => {
            oled.flush();
        }
        ImageCommand::Contrast { value } => oled.set_contrast(value),
        ImageCommand::Power { on } => oled.set_power(on),
    }
}
