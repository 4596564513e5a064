//! Flush engine
//!
//! Walks the pages in increasing order and, for every run the tracker
//! reports, re-sends the cursor position followed by one data block. The
//! controller cursor is never tracked in software, so no data block goes
//! out without its position.

use turbolight_hal::TwoWireBus;

use crate::framebuffer::{Framebuffer, PixelLocation, PAGES};
use crate::interface::DisplayInterface;
use crate::tracking::DirtyTracker;

/// How mutations reach the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlushMode {
    /// Mutations only touch memory; `flush()` pushes the dirty runs
    #[default]
    Batched,
    /// Each changed pixel byte is written to the panel inside `set_pixel`
    Immediate,
}

/// What a flush put on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    /// Data blocks written (each preceded by a position command)
    pub blocks: usize,
    /// Display bytes written
    pub bytes: usize,
}

impl FlushStats {
    /// Bus transactions issued
    pub fn transactions(&self) -> usize {
        self.blocks * 2
    }

    /// True when nothing was written
    pub fn is_empty(&self) -> bool {
        self.blocks == 0
    }
}

/// Write every dirty run to the panel
pub fn flush_dirty<B, T>(
    iface: &mut DisplayInterface<B>,
    frame: &Framebuffer,
    tracker: &mut T,
) -> FlushStats
where
    B: TwoWireBus,
    T: DirtyTracker,
{
    let mut stats = FlushStats::default();

    for page in 0..PAGES {
        let mut from = 0;
        while let Some(run) = tracker.next_dirty_run(page, from, frame) {
            if run.is_empty() {
                break;
            }
            iface.set_position(run.start as u8, page as u8);
            iface.write_data_block(&frame.page(page)[run.clone()]);
            tracker.mark_synced(page, run.clone(), frame);

            stats.blocks += 1;
            stats.bytes += run.len();
            from = run.end;
        }
    }

    stats
}

/// Write a single framebuffer byte straight to the panel
pub fn sync_byte<B, T>(
    iface: &mut DisplayInterface<B>,
    frame: &Framebuffer,
    tracker: &mut T,
    loc: PixelLocation,
) where
    B: TwoWireBus,
    T: DirtyTracker,
{
    iface.set_position(loc.column as u8, loc.page as u8);
    iface.write_data_block(&[frame.page(loc.page)[loc.column]]);
    tracker.mark_synced(loc.page, loc.column..loc.column + 1, frame);
}
