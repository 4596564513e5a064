//! Driver for 128x64 monochrome OLED panels on a bit-banged two-wire bus
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Oled: set_pixel / fill / load_block / flush  │
//! ├──────────────────────┬───────────────────────┤
//! │ Framebuffer (8 × 128)│ DirtyTracker          │
//! ├──────────────────────┴───────────────────────┤
//! │ DisplayInterface: control bytes, positioning │
//! ├──────────────────────────────────────────────┤
//! │ TwoWireBus: SoftI2c on two GPIO lines        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The panel memory is organized in 8 pages of 128 column bytes; bit `n`
//! of a byte is row `page * 8 + n`. All mutations land in the framebuffer
//! first. A [`DirtyTracker`] records what changed so that
//! [`Oled::flush`] only sends those regions: [`PageDirty`] tracks whole
//! pages, [`ByteShadow`] keeps a copy of the panel RAM and sends only the
//! bytes that differ.
//!
//! Bus errors are not detected. The acknowledge bit is clocked but never
//! sampled, so a missing or unresponsive panel looks like a working one.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod bitbang;
pub mod cmd;
pub mod config;
pub mod driver;
pub mod error;
pub mod flush;
pub mod framebuffer;
#[cfg(feature = "graphics")]
pub mod graphics;
pub mod ingest;
pub mod interface;
pub mod tracking;

#[cfg(test)]
mod mock;

pub use bitbang::{SoftI2c, SoftI2cError};
pub use config::{OledConfig, DEFAULT_ADDRESS};
pub use driver::Oled;
pub use error::DisplayError;
pub use flush::{FlushMode, FlushStats};
pub use framebuffer::{Framebuffer, HEIGHT, PAGES, WIDTH};
pub use ingest::{ImageLink, IngestConfig, IngestError, ServeStats};
pub use interface::DisplayInterface;
pub use tracking::{ByteShadow, DirtyTracker, PageDirty};
