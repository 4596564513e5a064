//! Turbolight image-streaming protocol
//!
//! A host streams bitmap data and display requests to the driver over a
//! serial link. Every message travels in a small binary frame:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬───────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CRC-8 │
//! │ 1B    │ 1B     │ 1B   │ 0–130B      │ 1B    │
//! └───────┴────────┴──────┴─────────────┴───────┘
//! ```
//!
//! The payload limit fits one full display page (128 bytes) plus a
//! two-byte framebuffer offset, so a whole image is eight frames.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;

pub use frame::{crc8, Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{ImageCommand, MAX_BLOCK_DATA};
