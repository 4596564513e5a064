//! Change detection
//!
//! A tracker decides which parts of the framebuffer have to be rewritten
//! on the panel. Marking more than what changed only costs bus time;
//! marking less leaves stale pixels on screen, so every tracker errs on
//! the side of over-marking.
//!
//! Two granularities are provided:
//! - [`PageDirty`]: one flag per page. Cheap in RAM, a touched page is
//!   always rewritten in full.
//! - [`ByteShadow`]: a copy of what the panel last received. Only columns
//!   that actually differ are rewritten, at the cost of another
//!   framebuffer worth of RAM.

use core::ops::Range;

use crate::framebuffer::{Framebuffer, BUFFER_SIZE, PAGES, WIDTH};

/// Pluggable change-detection granularity
pub trait DirtyTracker {
    /// Panel content is unknown; everything must be resent
    fn mark_all(&mut self);

    /// The byte at flat index `index` may have changed
    fn mark_byte(&mut self, index: usize);

    /// Bytes in `span` (flat indices) may have changed
    fn mark_span(&mut self, span: Range<usize>);

    /// Next run of columns in `page`, starting at or after `from`, that
    /// has to be written
    fn next_dirty_run(&self, page: usize, from: usize, frame: &Framebuffer)
        -> Option<Range<usize>>;

    /// Columns `cols` of `page` were just written from `frame`
    fn mark_synced(&mut self, page: usize, cols: Range<usize>, frame: &Framebuffer);

    /// Whether any part of `page` still has to be written
    fn is_page_dirty(&self, page: usize, frame: &Framebuffer) -> bool {
        self.next_dirty_run(page, 0, frame).is_some()
    }
}

/// Pages touched by a span of flat indices
fn pages_of(span: Range<usize>) -> Range<usize> {
    if span.is_empty() {
        return 0..0;
    }
    let end = span.end.min(BUFFER_SIZE);
    span.start / WIDTH..end.div_ceil(WIDTH)
}

/// One dirty flag per page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDirty {
    dirty: [bool; PAGES],
}

impl Default for PageDirty {
    /// Starts all dirty: nothing is known about the panel yet
    fn default() -> Self {
        Self {
            dirty: [true; PAGES],
        }
    }
}

impl PageDirty {
    /// Number of pages currently flagged
    pub fn dirty_pages(&self) -> usize {
        self.dirty.iter().filter(|d| **d).count()
    }
}

impl DirtyTracker for PageDirty {
    fn mark_all(&mut self) {
        self.dirty = [true; PAGES];
    }

    fn mark_byte(&mut self, index: usize) {
        if let Some(flag) = self.dirty.get_mut(index / WIDTH) {
            *flag = true;
        }
    }

    fn mark_span(&mut self, span: Range<usize>) {
        for page in pages_of(span) {
            self.dirty[page] = true;
        }
    }

    fn next_dirty_run(
        &self,
        page: usize,
        from: usize,
        _frame: &Framebuffer,
    ) -> Option<Range<usize>> {
        // A dirty page is always one run from column 0
        (from == 0 && self.dirty.get(page) == Some(&true)).then_some(0..WIDTH)
    }

    fn mark_synced(&mut self, page: usize, cols: Range<usize>, _frame: &Framebuffer) {
        // Partial writes can't prove the rest of the page is clean
        if cols.start == 0 && cols.end >= WIDTH {
            if let Some(flag) = self.dirty.get_mut(page) {
                *flag = false;
            }
        }
    }
}

/// Clean columns worth resending to save a new position + data pair
///
/// Starting a new run costs a position transaction and a second data
/// header, roughly seven byte times on the bus.
pub const MERGE_GAP: usize = 7;

/// Shadow copy of the panel RAM
#[derive(Clone, PartialEq, Eq)]
pub struct ByteShadow {
    /// Last value written to each byte of the panel
    shadow: [u8; BUFFER_SIZE],
    /// Bytes whose panel value is unknown
    unknown: [u8; BUFFER_SIZE / 8],
    /// Pages that may contain differences
    hint: [bool; PAGES],
}

impl Default for ByteShadow {
    fn default() -> Self {
        let mut tracker = Self {
            shadow: [0; BUFFER_SIZE],
            unknown: [0; BUFFER_SIZE / 8],
            hint: [false; PAGES],
        };
        tracker.mark_all();
        tracker
    }
}

impl core::fmt::Debug for ByteShadow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteShadow").field("hint", &self.hint).finish()
    }
}

impl ByteShadow {
    fn is_unknown(&self, index: usize) -> bool {
        self.unknown[index / 8] & (1 << (index % 8)) != 0
    }

    fn is_dirty(&self, index: usize, frame: &Framebuffer) -> bool {
        self.is_unknown(index) || self.shadow[index] != frame.byte(index)
    }

    fn first_dirty(&self, page: usize, from: usize, frame: &Framebuffer) -> Option<usize> {
        (from..WIDTH).find(|&col| self.is_dirty(page * WIDTH + col, frame))
    }

    fn first_clean(&self, page: usize, from: usize, frame: &Framebuffer) -> usize {
        (from..WIDTH)
            .find(|&col| !self.is_dirty(page * WIDTH + col, frame))
            .unwrap_or(WIDTH)
    }
}

impl DirtyTracker for ByteShadow {
    fn mark_all(&mut self) {
        self.unknown = [0xFF; BUFFER_SIZE / 8];
        self.hint = [true; PAGES];
    }

    fn mark_byte(&mut self, index: usize) {
        if let Some(hint) = self.hint.get_mut(index / WIDTH) {
            *hint = true;
        }
    }

    fn mark_span(&mut self, span: Range<usize>) {
        for page in pages_of(span) {
            self.hint[page] = true;
        }
    }

    fn next_dirty_run(
        &self,
        page: usize,
        from: usize,
        frame: &Framebuffer,
    ) -> Option<Range<usize>> {
        if !*self.hint.get(page)? {
            return None;
        }

        let start = self.first_dirty(page, from, frame)?;
        let mut end = self.first_clean(page, start, frame);
        while let Some(next) = self.first_dirty(page, end, frame) {
            if next - end > MERGE_GAP {
                break;
            }
            end = self.first_clean(page, next, frame);
        }
        Some(start..end)
    }

    fn mark_synced(&mut self, page: usize, cols: Range<usize>, frame: &Framebuffer) {
        if page >= PAGES {
            return;
        }
        for col in cols.start..cols.end.min(WIDTH) {
            let index = page * WIDTH + col;
            self.shadow[index] = frame.byte(index);
            self.unknown[index / 8] &= !(1 << (index % 8));
        }
        if self.first_dirty(page, 0, frame).is_none() {
            self.hint[page] = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_of_span() {
        assert_eq!(pages_of(0..0), 0..0);
        assert_eq!(pages_of(0..1), 0..1);
        assert_eq!(pages_of(0..128), 0..1);
        assert_eq!(pages_of(127..129), 0..2);
        assert_eq!(pages_of(256..BUFFER_SIZE + 50), 2..8);
    }

    #[test]
    fn test_page_dirty_starts_dirty() {
        let t = PageDirty::default();
        assert_eq!(t.dirty_pages(), PAGES);
    }

    #[test]
    fn test_page_dirty_full_sync_clears() {
        let fb = Framebuffer::new();
        let mut t = PageDirty::default();
        for page in 0..PAGES {
            assert_eq!(t.next_dirty_run(page, 0, &fb), Some(0..WIDTH));
            t.mark_synced(page, 0..WIDTH, &fb);
        }
        assert_eq!(t.dirty_pages(), 0);

        t.mark_byte(3 * WIDTH + 17);
        assert_eq!(t.dirty_pages(), 1);
        assert!(t.is_page_dirty(3, &fb));
        assert_eq!(t.next_dirty_run(3, WIDTH, &fb), None);
    }

    #[test]
    fn test_page_dirty_partial_sync_keeps_flag() {
        let fb = Framebuffer::new();
        let mut t = PageDirty::default();
        t.mark_synced(2, 10..11, &fb);
        assert!(t.is_page_dirty(2, &fb));
    }

    fn synced_shadow(fb: &Framebuffer) -> ByteShadow {
        let mut t = ByteShadow::default();
        for page in 0..PAGES {
            t.mark_synced(page, 0..WIDTH, fb);
        }
        t
    }

    #[test]
    fn test_shadow_starts_unknown() {
        let fb = Framebuffer::new();
        let t = ByteShadow::default();
        // Even a blank buffer must be written once
        for page in 0..PAGES {
            assert_eq!(t.next_dirty_run(page, 0, &fb), Some(0..WIDTH));
        }
    }

    #[test]
    fn test_shadow_single_byte_run() {
        let mut fb = Framebuffer::new();
        let mut t = synced_shadow(&fb);
        assert!((0..PAGES).all(|p| !t.is_page_dirty(p, &fb)));

        let (loc, _) = fb.set_pixel(40, 20, true).unwrap();
        t.mark_byte(loc.index());
        assert_eq!(t.next_dirty_run(2, 0, &fb), Some(40..41));
        assert_eq!(t.next_dirty_run(2, 41, &fb), None);

        t.mark_synced(2, 40..41, &fb);
        assert!(!t.is_page_dirty(2, &fb));
    }

    #[test]
    fn test_shadow_reverted_change_is_clean() {
        let mut fb = Framebuffer::new();
        let mut t = synced_shadow(&fb);

        fb.set_pixel(0, 0, true);
        t.mark_byte(0);
        fb.set_pixel(0, 0, false);
        assert!(!t.is_page_dirty(0, &fb));
    }

    #[test]
    fn test_shadow_merges_small_gaps() {
        let mut fb = Framebuffer::new();
        let t0 = synced_shadow(&fb);

        let mut t = t0.clone();
        fb.set_pixel(10, 0, true);
        fb.set_pixel(10 + 1 + MERGE_GAP as i32, 0, true);
        t.mark_span(0..WIDTH);
        assert_eq!(t.next_dirty_run(0, 0, &fb), Some(10..12 + MERGE_GAP));

        let mut fb = Framebuffer::new();
        let mut t = t0;
        fb.set_pixel(10, 0, true);
        fb.set_pixel(10 + 2 + MERGE_GAP as i32, 0, true);
        t.mark_span(0..WIDTH);
        assert_eq!(t.next_dirty_run(0, 0, &fb), Some(10..11));
        assert_eq!(
            t.next_dirty_run(0, 11, &fb),
            Some(12 + MERGE_GAP..13 + MERGE_GAP)
        );
    }

    #[test]
    fn test_shadow_hint_gates_scan() {
        let mut fb = Framebuffer::new();
        let t = synced_shadow(&fb);
        // Changed behind the tracker's back: not reported until marked
        fb.set_pixel(0, 0, true);
        assert!(!t.is_page_dirty(0, &fb));
    }
}
