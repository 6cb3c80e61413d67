//! Frame encoding and decoding for the bridge link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

use crate::messages::is_known_type;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes of framing around the payload (START + LENGTH + TYPE + CHECKSUM)
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Invalid frame structure or payload
    InvalidFrame,
    /// TYPE byte names no message of this link
    UnknownType(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + FRAME_OVERHEAD
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();

        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// State machine for parsing incoming frames
///
/// Bytes received outside a frame are discarded until the next START
/// byte, so the parser resynchronises after line noise or a bridge reset.
/// A frame whose TYPE byte is not a message of this link is dropped at
/// that byte instead of after its payload, and the rest of it is skipped
/// as noise.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// XOR of every byte after START seen so far
    running: u8,
    discarded: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Idle,
    Length,
    Type { length: u8 },
    Payload { length: u8, msg_type: u8 },
    Checksum { msg_type: u8 },
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Idle,
            payload: Vec::new(),
            running: 0,
            discarded: 0,
        }
    }

    /// Drop any partial frame and wait for the next START byte
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.payload.clear();
        self.running = 0;
    }

    /// Number of bytes skipped while hunting for a START byte
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    /// After an error the parser is back in its idle state.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        let next = match self.state {
            ParseState::Idle => {
                if byte == FRAME_START {
                    ParseState::Length
                } else {
                    self.discarded = self.discarded.wrapping_add(1);
                    ParseState::Idle
                }
            }
            ParseState::Length if byte as usize > MAX_PAYLOAD_SIZE => {
                return Err(self.fail(FrameError::InvalidFrame));
            }
            ParseState::Length => ParseState::Type { length: byte },
            ParseState::Type { .. } if !is_known_type(byte) => {
                return Err(self.fail(FrameError::UnknownType(byte)));
            }
            ParseState::Type { length: 0 } => ParseState::Checksum { msg_type: byte },
            ParseState::Type { length } => ParseState::Payload {
                length,
                msg_type: byte,
            },
            ParseState::Payload { length, msg_type } => {
                // Length was bounded when it was read
                let _ = self.payload.push(byte);
                if self.payload.len() == length as usize {
                    ParseState::Checksum { msg_type }
                } else {
                    self.state
                }
            }
            ParseState::Checksum { msg_type } => {
                if byte != self.running {
                    return Err(self.fail(FrameError::InvalidChecksum));
                }
                let frame = Frame {
                    msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        };

        if self.state != ParseState::Idle {
            self.running ^= byte;
        }
        self.state = next;
        Ok(None)
    }

    fn fail(&mut self, error: FrameError) -> FrameError {
        self.reset();
        error
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
