//! Command dispatcher
//!
//! Glue between the transport notification callback and the motor array.
//! The transport hands over raw bytes one notification at a time (it must
//! serialize concurrent notifications itself); the dispatcher runs them
//! through the framer and applies each completed frame to the array in
//! index order, all within the calling context.

use tactus_protocol::{CommandFrame, CommandFramer};

use crate::traits::{ArrayError, HapticArray};

/// Drives a [`CommandFramer`] and applies completed frames to an array.
///
/// The rev-1 firmware dropped the per-frame result on the floor; here it
/// is returned to the caller, counted, and logged when `defmt` is enabled.
#[derive(Debug, Default)]
pub struct Dispatcher {
    framer: CommandFramer,
    frames_applied: u32,
    frames_failed: u32,
}

impl Dispatcher {
    /// Create a dispatcher waiting for the first frame header
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one byte from the transport
    ///
    /// Returns `None` while a frame is still being collected, and the
    /// result of applying the frame once this byte completes one.
    pub fn consume_byte<A: HapticArray>(
        &mut self,
        byte: u8,
        array: &mut A,
    ) -> Option<Result<(), ArrayError>> {
        let frame = self.framer.feed(byte)?;
        Some(self.on_frame(&frame, array))
    }

    /// Apply one completed frame to the array
    pub fn on_frame<A: HapticArray>(
        &mut self,
        frame: &CommandFrame,
        array: &mut A,
    ) -> Result<(), ArrayError> {
        match array.set_all(frame) {
            Ok(()) => {
                self.frames_applied += 1;
                Ok(())
            }
            Err(err) => {
                self.frames_failed += 1;
                #[cfg(feature = "defmt")]
                defmt::warn!("frame application failed: {}", err);
                Err(err)
            }
        }
    }

    /// Frames applied fully since construction
    pub fn frames_applied(&self) -> u32 {
        self.frames_applied
    }

    /// Frames that failed partway through application
    pub fn frames_failed(&self) -> u32 {
        self.frames_failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;
    use tactus_protocol::{FRAME_HEADER, MOTOR_COUNT};

    /// Records intensity writes; optionally fails a chosen index.
    struct FakeArray {
        motors: [u8; MOTOR_COUNT],
        writes: Vec<(u8, u8), 64>,
        fail_at: Option<u8>,
    }

    impl FakeArray {
        fn new() -> Self {
            Self {
                motors: [0; MOTOR_COUNT],
                writes: Vec::new(),
                fail_at: None,
            }
        }
    }

    impl HapticArray for FakeArray {
        fn set_intensity(&mut self, index: u8, value: u8) -> Result<(), ArrayError> {
            if index as usize >= MOTOR_COUNT {
                return Err(ArrayError::InvalidIndex(index));
            }
            if self.fail_at == Some(index) {
                return Err(ArrayError::BusWrite { index });
            }
            self.motors[index as usize] = value;
            let _ = self.writes.push((index, value));
            Ok(())
        }
    }

    #[test]
    fn test_end_to_end_frame_application() {
        let mut dispatcher = Dispatcher::new();
        let mut array = FakeArray::new();

        let payload = [0x00, 0x80, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00];
        let wire = CommandFrame::new(payload).encode();

        let mut results = 0;
        for &b in &wire {
            if let Some(res) = dispatcher.consume_byte(b, &mut array) {
                assert_eq!(res, Ok(()));
                results += 1;
            }
        }

        assert_eq!(results, 1);
        // Motors 1 and 5 at 0x80, all others at 0x00
        assert_eq!(array.motors, payload);
        assert_eq!(dispatcher.frames_applied(), 1);
        assert_eq!(dispatcher.frames_failed(), 0);
    }

    #[test]
    fn test_writes_happen_in_ascending_index_order() {
        let mut dispatcher = Dispatcher::new();
        let mut array = FakeArray::new();

        let frame = CommandFrame::new([9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        dispatcher.on_frame(&frame, &mut array).unwrap();

        let indices: Vec<u8, 64> = array.writes.iter().map(|&(i, _)| i).collect();
        assert_eq!(&indices[..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_failed_frame_is_observable_and_counted() {
        let mut dispatcher = Dispatcher::new();
        let mut array = FakeArray::new();
        array.fail_at = Some(6);

        let frame = CommandFrame::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let res = dispatcher.on_frame(&frame, &mut array);

        assert_eq!(res, Err(ArrayError::BusWrite { index: 6 }));
        assert_eq!(dispatcher.frames_failed(), 1);
        assert_eq!(dispatcher.frames_applied(), 0);

        // Indices before the failure keep their new values, the rest are
        // untouched - no rollback.
        assert_eq!(array.motors, [1, 2, 3, 4, 5, 6, 0, 0, 0, 0]);
    }

    #[test]
    fn test_garbage_between_frames_is_ignored() {
        let mut dispatcher = Dispatcher::new();
        let mut array = FakeArray::new();

        let mut stream: Vec<u8, 64> = Vec::new();
        stream
            .extend_from_slice(&CommandFrame::new([1; MOTOR_COUNT]).encode())
            .unwrap();
        stream.extend_from_slice(&[0x00, 0x42, 0x13]).unwrap();
        stream
            .extend_from_slice(&CommandFrame::new([2; MOTOR_COUNT]).encode())
            .unwrap();

        for &b in &stream {
            dispatcher.consume_byte(b, &mut array);
        }

        assert_eq!(dispatcher.frames_applied(), 2);
        assert_eq!(array.motors, [2; MOTOR_COUNT]);
    }

    #[test]
    fn test_header_valued_garbage_starts_a_frame() {
        // A stray 0xAA between frames opens a bogus frame that swallows
        // the next ten bytes - the documented desync behavior.
        let mut dispatcher = Dispatcher::new();
        let mut array = FakeArray::new();

        dispatcher.consume_byte(FRAME_HEADER, &mut array);
        let wire = CommandFrame::new([7; MOTOR_COUNT]).encode();
        let mut completed = 0;
        for &b in &wire {
            if dispatcher.consume_byte(b, &mut array).is_some() {
                completed += 1;
            }
        }

        // One garbled frame completes; its first byte is the real header.
        assert_eq!(completed, 1);
        assert_eq!(array.motors[0], FRAME_HEADER);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tactus_protocol::MOTOR_COUNT;

    struct MirrorArray {
        motors: [u8; MOTOR_COUNT],
    }

    impl HapticArray for MirrorArray {
        fn set_intensity(&mut self, index: u8, value: u8) -> Result<(), ArrayError> {
            self.motors
                .get_mut(index as usize)
                .map(|m| *m = value)
                .ok_or(ArrayError::InvalidIndex(index))
        }
    }

    proptest! {
        /// Any well-formed frame stream applies its last frame verbatim.
        #[test]
        fn frames_apply_verbatim(
            payloads in proptest::collection::vec(
                proptest::array::uniform10(any::<u8>()), 1..8),
        ) {
            let mut dispatcher = Dispatcher::new();
            let mut array = MirrorArray { motors: [0; MOTOR_COUNT] };

            for payload in &payloads {
                for &b in &CommandFrame::new(*payload).encode() {
                    if let Some(res) = dispatcher.consume_byte(b, &mut array) {
                        prop_assert!(res.is_ok());
                    }
                }
            }

            prop_assert_eq!(dispatcher.frames_applied() as usize, payloads.len());
            prop_assert_eq!(&array.motors, payloads.last().unwrap());
        }
    }
}
