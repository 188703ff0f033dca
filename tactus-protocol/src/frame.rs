//! Command frame encoding and the byte-stream framing state machine.
//!
//! A frame on the wire is `0xAA` followed by exactly [`MOTOR_COUNT`] raw
//! intensity bytes, one per motor index in ascending order. The protocol
//! carries no checksum and no resync marker: a byte dropped or duplicated
//! mid-frame desynchronizes every following frame until the stream happens
//! to carry `0xAA` in header position again. The short-range transport is
//! expected to be loss-free; whether that assumption holds is a known
//! robustness gap, not something this layer papers over.

use heapless::Vec;

/// Frame header (synchronization) byte
pub const FRAME_HEADER: u8 = 0xAA;

/// Number of motors in the array, and therefore bytes in a frame payload
pub const MOTOR_COUNT: usize = 10;

/// Complete frame size on the wire (HEADER + one byte per motor)
pub const WIRE_FRAME_SIZE: usize = 1 + MOTOR_COUNT;

/// A complete intensity command, index-aligned with motor indices `0..=9`.
///
/// Intensity bytes are opaque amplitude codes passed straight through to
/// the driver chips; they are not validated or scaled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFrame {
    intensities: [u8; MOTOR_COUNT],
}

impl CommandFrame {
    /// Create a frame from per-motor intensity bytes
    pub const fn new(intensities: [u8; MOTOR_COUNT]) -> Self {
        Self { intensities }
    }

    /// All intensity bytes, index-aligned with motor indices
    pub fn intensities(&self) -> &[u8; MOTOR_COUNT] {
        &self.intensities
    }

    /// Intensity for a single motor index, if in range
    pub fn intensity(&self, index: u8) -> Option<u8> {
        self.intensities.get(index as usize).copied()
    }

    /// Encode this frame into its wire image (controller side and tests)
    pub fn encode(&self) -> [u8; WIRE_FRAME_SIZE] {
        let mut wire = [0u8; WIRE_FRAME_SIZE];
        wire[0] = FRAME_HEADER;
        wire[1..].copy_from_slice(&self.intensities);
        wire
    }
}

impl From<[u8; MOTOR_COUNT]> for CommandFrame {
    fn from(intensities: [u8; MOTOR_COUNT]) -> Self {
        Self::new(intensities)
    }
}

/// State machine turning the incoming byte stream into [`CommandFrame`]s.
///
/// Two states: waiting for the header byte, and collecting payload. Once
/// collection starts, every byte is payload - a `0xAA` inside the payload
/// is not reinterpreted as a new header.
#[derive(Debug, Clone)]
pub struct CommandFramer {
    state: FramerState,
    buffer: Vec<u8, MOTOR_COUNT>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramerState {
    /// Discarding bytes until the header appears
    WaitHeader,
    /// Header seen, collecting payload bytes
    CollectData,
}

impl Default for CommandFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFramer {
    /// Create a new framer, waiting for a header byte
    pub fn new() -> Self {
        Self {
            state: FramerState::WaitHeader,
            buffer: Vec::new(),
        }
    }

    /// Discard any partial frame and return to waiting for a header
    pub fn reset(&mut self) {
        self.state = FramerState::WaitHeader;
        self.buffer.clear();
    }

    /// True while a partially collected frame is buffered
    pub fn in_frame(&self) -> bool {
        self.state == FramerState::CollectData
    }

    /// Feed a single byte from the transport
    ///
    /// Returns `Some(frame)` when this byte completes a frame; the framer
    /// is then back in the header-waiting state, ready for the next frame.
    pub fn feed(&mut self, byte: u8) -> Option<CommandFrame> {
        match self.state {
            FramerState::WaitHeader => {
                if byte == FRAME_HEADER {
                    self.buffer.clear();
                    self.state = FramerState::CollectData;
                }
                // Silently ignore non-header bytes while waiting
                None
            }
            FramerState::CollectData => {
                // Cannot fail: the buffer capacity equals the frame size
                let _ = self.buffer.push(byte);
                if self.buffer.is_full() {
                    let mut intensities = [0u8; MOTOR_COUNT];
                    intensities.copy_from_slice(&self.buffer);
                    self.reset();
                    Some(CommandFrame::new(intensities))
                } else {
                    None
                }
            }
        }
    }

    /// Feed multiple bytes from the transport
    ///
    /// Returns the first complete frame found, if any. Bytes after that
    /// frame are not consumed; callers that may receive more than one frame
    /// per notification should feed byte-by-byte instead.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<CommandFrame> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte) {
                return Some(frame);
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any non-header garbage prefix is discarded; the frame after it
        /// parses to exactly its payload.
        #[test]
        fn garbage_prefix_then_frame(
            prefix in proptest::collection::vec(any::<u8>().prop_filter(
                "must not be a header byte", |b| *b != FRAME_HEADER), 0..32),
            payload in proptest::array::uniform10(any::<u8>()),
        ) {
            let mut framer = CommandFramer::new();
            for &b in &prefix {
                prop_assert_eq!(framer.feed(b), None);
            }

            let frame = framer.feed_bytes(&CommandFrame::new(payload).encode());
            let frame = frame.unwrap();
            prop_assert_eq!(frame.intensities(), &payload);
        }

        /// Feeding a stream byte-by-byte or in one slice yields the same
        /// first frame.
        #[test]
        fn chunking_invariance(stream in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut bytewise = CommandFramer::new();
            let mut first_bytewise = None;
            for &b in &stream {
                if first_bytewise.is_none() {
                    first_bytewise = bytewise.feed(b);
                }
            }

            let mut sliced = CommandFramer::new();
            let first_sliced = sliced.feed_bytes(&stream);

            prop_assert_eq!(first_bytewise, first_sliced);
        }
    }
}
