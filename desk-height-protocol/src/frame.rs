//! Frame encoding and decoding for the desk controller bus.
//!
//! Frame format:
//! - START (1 byte): 0x9B or 0x98 synchronization byte
//! - LENGTH (1 byte): frame length minus two (covers LENGTH..PAYLOAD plus END)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (LENGTH - 2 bytes): type-specific data
//! - END (1 byte): always 0x9D
//!
//! There is no checksum. A frame whose END byte is wrong is dropped whole
//! and the receiver goes back to hunting for a START byte.

use heapless::Vec;

/// Frame synchronization bytes
pub const START_BYTES: [u8; 2] = [0x9B, 0x98];

/// Frame terminator
pub const END_BYTE: u8 = 0x9D;

/// Receive buffer size, also the largest frame the receiver accepts
pub const RX_BUFFER_SIZE: usize = 32;

/// START + LENGTH + TYPE + END
const FRAME_OVERHEAD: usize = 4;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = RX_BUFFER_SIZE - FRAME_OVERHEAD;

/// Smallest LENGTH that still leaves room for TYPE and END
const MIN_LENGTH: u8 = 2;

/// Check whether a byte opens a frame
#[inline]
pub fn is_start_byte(byte: u8) -> bool {
    START_BYTES.contains(&byte)
}

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame reached its announced length without the 0x9D terminator
    BadEndByte(u8),
    /// LENGTH byte too small to describe any frame
    BadLength(u8),
    /// Receive buffer filled up before the frame completed
    Overflow,
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Start byte is not one of [`START_BYTES`]
    InvalidStart(u8),
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A received or constructed frame
///
/// The END byte is not stored: a packet only exists once it has been
/// checked to be [`END_BYTE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Start byte the frame arrived with (0x9B or 0x98)
    pub start: u8,
    /// LENGTH field as sent on the wire
    pub length: u8,
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data, `length - 2` bytes
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Packet {
    /// Create a packet with the given start byte, message type and payload
    pub fn new(start: u8, msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        if !is_start_byte(start) {
            return Err(FrameError::InvalidStart(start));
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            start,
            length: (payload.len() + MIN_LENGTH as usize) as u8,
            msg_type,
            payload: payload_vec,
        })
    }

    /// Total size on the wire, START through END
    pub fn frame_len(&self) -> usize {
        self.length as usize + 2
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.frame_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = self.start;
        buffer[1] = self.length;
        buffer[2] = self.msg_type;
        buffer[3..3 + self.payload.len()].copy_from_slice(&self.payload);
        buffer[frame_len - 1] = END_BYTE;

        Ok(frame_len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, RX_BUFFER_SIZE>, FrameError> {
        let mut buffer = [0u8; RX_BUFFER_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Build a packet from a complete, verified receive buffer
    fn from_frame(frame: &[u8]) -> Self {
        let mut payload = Vec::new();
        // Cannot fail: the frame fits RX_BUFFER_SIZE, so the payload fits MAX_PAYLOAD_SIZE
        let _ = payload.extend_from_slice(&frame[3..frame.len() - 1]);

        Self {
            start: frame[0],
            length: frame[1],
            msg_type: frame[2],
            payload,
        }
    }
}

/// Incremental receiver for the desk bus byte stream
///
/// Bytes outside a frame are discarded until a START byte shows up. Once
/// the LENGTH byte is in, the receiver knows where the frame must end.
/// Any framing violation drops everything buffered so far; there is no
/// attempt to salvage a partial frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReceiver {
    buffer: Vec<u8, RX_BUFFER_SIZE>,
}

impl FrameReceiver {
    /// Create a new frame receiver
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Reset the receiver, discarding any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes of the current partial frame
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Whether a frame is currently being accumulated
    pub fn in_frame(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Full frame size announced by the LENGTH byte, once it has arrived
    fn expected_len(&self) -> Option<usize> {
        self.buffer.get(1).map(|&length| length as usize + 2)
    }

    /// Feed a single byte to the receiver
    ///
    /// Returns `Ok(Some(packet))` when a complete valid frame is received,
    /// `Ok(None)` when more bytes are needed, or `Err` when the frame being
    /// accumulated was dropped.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, FrameError> {
        if self.buffer.is_empty() {
            if is_start_byte(byte) {
                let _ = self.buffer.push(byte);
            }
            // Anything between frames is line noise
            return Ok(None);
        }

        // Cannot fail: the buffer is drained before it reaches capacity
        let _ = self.buffer.push(byte);

        if self.buffer.len() == 2 && byte < MIN_LENGTH {
            self.reset();
            return Err(FrameError::BadLength(byte));
        }

        if let Some(expected) = self.expected_len() {
            if self.buffer.len() == expected {
                let end = self.buffer[expected - 1];
                let result = if end == END_BYTE {
                    Ok(Some(Packet::from_frame(&self.buffer)))
                } else {
                    Err(FrameError::BadEndByte(end))
                };
                self.reset();
                return result;
            }
        }

        if self.buffer.len() >= RX_BUFFER_SIZE {
            self.reset();
            return Err(FrameError::Overflow);
        }

        Ok(None)
    }

    /// Feed a chunk of bytes, yielding every frame outcome it completes
    ///
    /// The iterator must be driven to the end for all bytes to be consumed.
    pub fn frames<'r, 'b>(&'r mut self, bytes: &'b [u8]) -> Frames<'r, 'b> {
        Frames {
            receiver: self,
            bytes: bytes.iter(),
        }
    }
}

/// Iterator returned by [`FrameReceiver::frames`]
#[derive(Debug)]
pub struct Frames<'r, 'b> {
    receiver: &'r mut FrameReceiver,
    bytes: core::slice::Iter<'b, u8>,
}

impl Iterator for Frames<'_, '_> {
    type Item = Result<Packet, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.receiver.feed(byte) {
                Ok(Some(packet)) => return Some(Ok(packet)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
