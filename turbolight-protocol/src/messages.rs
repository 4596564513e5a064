//! Message types carried by protocol frames
//!
//! Each message maps onto one public driver operation. Payload integers
//! are little-endian.

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use heapless::Vec;

// Message type IDs: host → display
pub const MSG_FILL: u8 = 0x30;
pub const MSG_LOAD_BLOCK: u8 = 0x31;
pub const MSG_SET_PIXEL: u8 = 0x32;
pub const MSG_FLUSH: u8 = 0x33;
pub const MSG_CONTRAST: u8 = 0x34;
pub const MSG_POWER: u8 = 0x35;

/// Largest bitmap chunk one load-block message can carry
pub const MAX_BLOCK_DATA: usize = MAX_PAYLOAD_SIZE - 2;

/// Requests streamed from the host to the display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageCommand {
    /// Set every framebuffer byte to `value`
    Fill { value: u8 },
    /// Copy page-formatted bytes into the framebuffer at a byte offset
    LoadBlock {
        offset: u16,
        data: Vec<u8, MAX_BLOCK_DATA>,
    },
    /// Set or clear one pixel
    SetPixel { x: u8, y: u8, on: bool },
    /// Push dirty regions to the panel
    Flush,
    /// Set panel contrast
    Contrast { value: u8 },
    /// Turn the panel on or off
    Power { on: bool },
}

impl ImageCommand {
    /// Build a load-block command, rejecting chunks over one frame
    pub fn load_block(offset: u16, data: &[u8]) -> Result<Self, FrameError> {
        Ok(ImageCommand::LoadBlock {
            offset,
            data: Vec::from_slice(data).map_err(|_| FrameError::PayloadTooLarge)?,
        })
    }

    /// Parse a command from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let p = &frame.payload;
        match (frame.msg_type, p.len()) {
            (MSG_FILL, 1) => Ok(ImageCommand::Fill { value: p[0] }),
            (MSG_LOAD_BLOCK, n) if n >= 2 => {
                let offset = u16::from_le_bytes([p[0], p[1]]);
                Self::load_block(offset, &p[2..])
            }
            (MSG_SET_PIXEL, 3) => Ok(ImageCommand::SetPixel {
                x: p[0],
                y: p[1],
                on: p[2] != 0,
            }),
            (MSG_FLUSH, 0) => Ok(ImageCommand::Flush),
            (MSG_CONTRAST, 1) => Ok(ImageCommand::Contrast { value: p[0] }),
            (MSG_POWER, 1) => Ok(ImageCommand::Power { on: p[0] != 0 }),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ImageCommand::Fill { value } => Frame::new(MSG_FILL, &[*value]),
            ImageCommand::LoadBlock { offset, data } => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&offset.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .extend_from_slice(data)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Frame::new(MSG_LOAD_BLOCK, &payload)
            }
            ImageCommand::SetPixel { x, y, on } => {
                Frame::new(MSG_SET_PIXEL, &[*x, *y, u8::from(*on)])
            }
            ImageCommand::Flush => Ok(Frame::empty(MSG_FLUSH)),
            ImageCommand::Contrast { value } => Frame::new(MSG_CONTRAST, &[*value]),
            ImageCommand::Power { on } => Frame::new(MSG_POWER, &[u8::from(*on)]),
        }
    }
}
