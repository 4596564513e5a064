//! Page-organized framebuffer
//!
//! The controller addresses its RAM in pages: 8-pixel-tall strips, one
//! byte per column, bit `b` of a byte being row `page * 8 + b`. The buffer
//! uses the same layout so a page can be streamed to the panel verbatim.

use core::ops::Range;

/// Display width in pixels
pub const WIDTH: usize = 128;
/// Display height in pixels
pub const HEIGHT: usize = 64;
/// Rows per page
pub const PAGE_HEIGHT: usize = 8;
/// Number of pages
pub const PAGES: usize = HEIGHT / PAGE_HEIGHT;
/// Framebuffer size in bytes
pub const BUFFER_SIZE: usize = WIDTH * PAGES;

/// Location of one pixel inside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelLocation {
    /// Page holding the pixel
    pub page: usize,
    /// Column (byte within the page)
    pub column: usize,
    /// Bit mask within that byte
    pub mask: u8,
}

impl PixelLocation {
    /// Byte index in the flat buffer
    pub const fn index(&self) -> usize {
        self.page * WIDTH + self.column
    }
}

/// Map a coordinate to its byte and bit
///
/// Returns `None` outside the panel, including negative coordinates.
pub fn locate(x: i32, y: i32) -> Option<PixelLocation> {
    if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    Some(PixelLocation {
        page: y / PAGE_HEIGHT,
        column: x,
        mask: 1 << (y % PAGE_HEIGHT),
    })
}

/// In-memory mirror of the display RAM
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a cleared framebuffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Read one pixel
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        locate(x, y).map(|loc| self.pages[loc.page][loc.column] & loc.mask != 0)
    }

    /// Set or clear one pixel
    ///
    /// Returns the location touched and whether the byte changed.
    pub(crate) fn set_pixel(&mut self, x: i32, y: i32, on: bool) -> Option<(PixelLocation, bool)> {
        let loc = locate(x, y)?;
        let byte = &mut self.pages[loc.page][loc.column];
        let old = *byte;
        if on {
            *byte |= loc.mask;
        } else {
            *byte &= !loc.mask;
        }
        Some((loc, *byte != old))
    }

    /// Set every byte
    pub(crate) fn fill(&mut self, value: u8) {
        for page in self.pages.iter_mut() {
            page.fill(value);
        }
    }

    /// Copy page-formatted bytes in at a page-aligned offset
    ///
    /// The offset is rounded down to the start of its page and bytes that
    /// would land past the end are dropped. Returns the byte range written.
    pub(crate) fn load(&mut self, data: &[u8], offset: usize) -> Range<usize> {
        let start = (offset / WIDTH) * WIDTH;
        if start >= BUFFER_SIZE {
            return BUFFER_SIZE..BUFFER_SIZE;
        }
        let len = data.len().min(BUFFER_SIZE - start);
        self.pages.as_flattened_mut()[start..start + len].copy_from_slice(&data[..len]);
        start..start + len
    }

    /// One page of column bytes
    ///
    /// # Panics
    /// If `page >= PAGES`.
    pub fn page(&self, page: usize) -> &[u8; WIDTH] {
        &self.pages[page]
    }

    /// The raw buffer, page after page
    pub fn as_bytes(&self) -> &[u8] {
        self.pages.as_flattened()
    }

    /// Value of one byte by flat index
    ///
    /// # Panics
    /// If `index >= BUFFER_SIZE`.
    pub(crate) fn byte(&self, index: usize) -> u8 {
        self.pages[index / WIDTH][index % WIDTH]
    }
}

impl core::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self.as_bytes().iter().filter(|b| **b != 0).count();
        write!(f, "Framebuffer({} of {} bytes non-zero)", lit, BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_locate_corners() {
        assert_eq!(
            locate(0, 0),
            Some(PixelLocation {
                page: 0,
                column: 0,
                mask: 0x01
            })
        );
        assert_eq!(
            locate(127, 63),
            Some(PixelLocation {
                page: 7,
                column: 127,
                mask: 0x80
            })
        );
        assert_eq!(
            locate(5, 9),
            Some(PixelLocation {
                page: 1,
                column: 5,
                mask: 0x02
            })
        );
        assert_eq!(locate(5, 9).unwrap().index(), 133);
        assert_eq!(locate(127, 63).unwrap().index(), BUFFER_SIZE - 1);
    }

    #[test]
    fn test_locate_rejects_outside() {
        for (x, y) in [(-1, 0), (0, -1), (128, 0), (0, 64), (i32::MIN, i32::MAX)] {
            assert_eq!(locate(x, y), None);
        }
    }

    #[test]
    fn test_mapping_is_injective() {
        let mut seen = [0u8; BUFFER_SIZE];
        for y in 0..HEIGHT as i32 {
            for x in 0..WIDTH as i32 {
                let loc = locate(x, y).unwrap();
                assert_eq!(seen[loc.index()] & loc.mask, 0);
                seen[loc.index()] |= loc.mask;
            }
        }
        // Total: every bit claimed exactly once
        assert!(seen.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_set_pixel_reports_change() {
        let mut fb = Framebuffer::new();
        let (loc, changed) = fb.set_pixel(10, 10, true).unwrap();
        assert!(changed);
        assert_eq!(loc.page, 1);
        let (_, changed) = fb.set_pixel(10, 10, true).unwrap();
        assert!(!changed);
        assert_eq!(fb.set_pixel(200, 10, true), None);
    }

    #[test]
    fn test_fill_reads_back() {
        let mut fb = Framebuffer::new();
        fb.fill(0xFF);
        assert!((0..64).all(|y| (0..128).all(|x| fb.pixel(x, y) == Some(true))));
        fb.fill(0x00);
        assert!((0..64).all(|y| (0..128).all(|x| fb.pixel(x, y) == Some(false))));
    }

    #[test]
    fn test_byte_follows_flat_layout() {
        let mut fb = Framebuffer::new();
        let mut image = [0u8; BUFFER_SIZE];
        for (i, b) in image.iter_mut().enumerate() {
            *b = (i % 253) as u8;
        }
        fb.load(&image, 0);
        for index in [0, 1, WIDTH - 1, WIDTH, 5 * WIDTH + 17, BUFFER_SIZE - 1] {
            assert_eq!(fb.byte(index), image[index]);
            assert_eq!(fb.byte(index), fb.as_bytes()[index]);
        }
    }

    #[test]
    fn test_load_first_page() {
        let mut fb = Framebuffer::new();
        let mut pattern = [0u8; WIDTH];
        for (i, b) in pattern.iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        assert_eq!(fb.load(&pattern, 0), 0..WIDTH);
        assert_eq!(fb.page(0), &pattern);
        assert!(fb.page(1).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_load_rounds_offset_down() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.load(&[0xAA; 4], WIDTH + 37), WIDTH..WIDTH + 4);
        assert_eq!(&fb.page(1)[..4], &[0xAA; 4]);
    }

    #[test]
    fn test_load_truncates_at_end() {
        let mut fb = Framebuffer::new();
        let data = [0x0Fu8; 3 * WIDTH];
        assert_eq!(fb.load(&data, 6 * WIDTH), 6 * WIDTH..BUFFER_SIZE);
        assert_eq!(fb.load(&data, BUFFER_SIZE), BUFFER_SIZE..BUFFER_SIZE);
    }

    proptest! {
        #[test]
        fn prop_pixel_set_then_clear(x in 0i32..128, y in 0i32..64, fill in any::<u8>()) {
            let mut fb = Framebuffer::new();
            fb.fill(fill);
            fb.set_pixel(x, y, true);
            prop_assert_eq!(fb.pixel(x, y), Some(true));
            fb.set_pixel(x, y, false);
            prop_assert_eq!(fb.pixel(x, y), Some(false));
        }

        #[test]
        fn prop_pixel_write_touches_one_bit(x in 0i32..128, y in 0i32..64) {
            let mut fb = Framebuffer::new();
            fb.set_pixel(x, y, true);
            let lit: u32 = fb.as_bytes().iter().map(|b| b.count_ones()).sum();
            prop_assert_eq!(lit, 1);
        }

        #[test]
        fn prop_outside_leaves_buffer_alone(
            x in prop_oneof![i32::MIN..0, 128..i32::MAX],
            y in any::<i32>(),
        ) {
            let mut fb = Framebuffer::new();
            fb.fill(0x5A);
            let before = fb.clone();
            prop_assert_eq!(fb.set_pixel(x, y, true), None);
            prop_assert_eq!(fb, before);
        }
    }
}
