//! Frame encoding and decoding.
//!
//! Frame format:
//! - START (1 byte): 0xA5 synchronization byte
//! - LENGTH (1 byte): payload length (0-130)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-130 bytes): type-specific data
//! - CRC (1 byte): CRC-8 (poly 0x07) over LENGTH, TYPE and PAYLOAD

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Maximum payload size in bytes (offset + one display page)
pub const MAX_PAYLOAD_SIZE: usize = 2 + 128;

/// Maximum complete frame size (START + LENGTH + TYPE + MAX_PAYLOAD + CRC)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + 1 + MAX_PAYLOAD_SIZE + 1;

/// Codec and parser failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// LENGTH or payload over [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// CRC mismatch
    InvalidChecksum,
    /// Unknown message type or malformed payload
    InvalidFrame,
    /// Output buffer shorter than the encoded frame
    BufferTooSmall,
}

/// CRC-8 with polynomial 0x07 (x^8 + x^2 + x + 1), initial value 0
pub fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |crc, &byte| crc8_step(crc, byte))
}

fn crc8_step(mut crc: u8, byte: u8) -> u8 {
    crc ^= byte;
    for _ in 0..8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ 0x07
        } else {
            crc << 1
        };
    }
    crc
}

/// One message on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type (`MSG_*`)
    pub msg_type: u8,
    /// Type-specific payload
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Build a frame, rejecting payloads over [`MAX_PAYLOAD_SIZE`]
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Frame carrying only a type
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    fn crc(&self) -> u8 {
        let header = crc8_step(crc8_step(0, self.payload.len() as u8), self.msg_type);
        self.payload
            .iter()
            .fold(header, |crc, &byte| crc8_step(crc, byte))
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Write the frame into `buffer`, returning the byte count
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        let out = buffer.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;

        out[0] = FRAME_START;
        out[1] = self.payload.len() as u8;
        out[2] = self.msg_type;
        out[3..len - 1].copy_from_slice(&self.payload);
        out[len - 1] = self.crc();

        Ok(len)
    }

    /// Encode into an owned, fixed-capacity buffer
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Where the parser is within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    /// Hunting for START
    Sync,
    /// Next byte is LENGTH
    Length,
    /// Next byte is TYPE
    Type,
    /// Collecting payload bytes
    Payload,
    /// Next byte is the CRC
    Crc,
}

/// Byte-at-a-time frame decoder
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: RxState,
    length: usize,
    current: Frame,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Parser waiting for a START byte
    pub fn new() -> Self {
        Self {
            state: RxState::Sync,
            length: 0,
            current: Frame::empty(0),
        }
    }

    /// Drop any partial frame and hunt for the next START
    pub fn reset(&mut self) {
        self.state = RxState::Sync;
        self.length = 0;
        self.current.payload.clear();
    }

    /// True while the parser is between START and CRC
    pub fn in_frame(&self) -> bool {
        self.state != RxState::Sync
    }

    /// Advance the parser by one received byte
    ///
    /// Yields `Ok(Some(frame))` once the CRC of a frame checks out and
    /// `Ok(None)` while a frame is still being collected or the parser is
    /// hunting for START. An error drops the partial frame and the parser
    /// goes back to hunting.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            RxState::Sync => {
                // Line noise between frames is skipped
                if byte == FRAME_START {
                    self.state = RxState::Length;
                }
            }
            RxState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                self.length = byte as usize;
                self.state = RxState::Type;
            }
            RxState::Type => {
                self.current.msg_type = byte;
                self.current.payload.clear();
                self.state = if self.length == 0 {
                    RxState::Crc
                } else {
                    RxState::Payload
                };
            }
            RxState::Payload => {
                // Capacity is guaranteed by the LENGTH check
                let _ = self.current.payload.push(byte);
                if self.current.payload.len() == self.length {
                    self.state = RxState::Crc;
                }
            }
            RxState::Crc => {
                let valid = byte == self.current.crc();
                let frame = self.current.clone();
                self.reset();
                if !valid {
                    return Err(FrameError::InvalidChecksum);
                }
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Bytes after that frame are left unread; callers streaming several
    /// frames should use [`FrameParser::feed`].
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
