//! Haptic array trait and error taxonomy

use tactus_protocol::{CommandFrame, MOTOR_COUNT};

/// Errors surfaced by array operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArrayError {
    /// Motor index outside the array
    InvalidIndex(u8),
    /// A driver chip failed its boot-time initialization
    DriverInit {
        /// Index of the failed motor
        index: u8,
    },
    /// The driver behind this index is not in the `Ready` state
    ///
    /// Only reachable when commands arrive before startup sequencing has
    /// finished; after a successful init every driver stays `Ready`.
    DriverNotReady {
        /// Index of the motor addressed
        index: u8,
    },
    /// A bus transaction failed while driving a motor
    BusWrite {
        /// Index of the motor being driven
        index: u8,
    },
}

/// Why a driver ended up faulted at init time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultReason {
    /// Chip did not acknowledge on the bus
    NoAck,
    /// Chip acknowledged but reported an unexpected device ID
    WrongDevice,
}

/// Per-motor driver lifecycle state
///
/// Transitions happen only during startup sequencing; there is no runtime
/// re-initialization path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Constructed, `begin` not yet run
    #[default]
    Uninitialized,
    /// Initialized and accepting intensity writes
    Ready,
    /// Boot-time initialization failed
    Faulted(FaultReason),
}

/// An index-addressed array of haptic motors
///
/// Implementations own whatever bus plumbing is needed; callers only see
/// logical motor indices and raw intensity bytes.
pub trait HapticArray {
    /// Number of motors in the array
    fn motor_count(&self) -> usize {
        MOTOR_COUNT
    }

    /// Set one motor's intensity
    ///
    /// `value` is the raw amplitude code written to the driver chip's
    /// real-time register; it is not validated or scaled. An out-of-range
    /// index fails with [`ArrayError::InvalidIndex`] before any bus
    /// operation is issued.
    fn set_intensity(&mut self, index: u8, value: u8) -> Result<(), ArrayError>;

    /// Apply a complete frame, one motor at a time in ascending index order
    ///
    /// Aborts on the first failure: motors already written keep their new
    /// values, the rest stay unmodified. No rollback, no retry.
    fn set_all(&mut self, frame: &CommandFrame) -> Result<(), ArrayError> {
        for (index, &value) in frame.intensities().iter().enumerate() {
            self.set_intensity(index as u8, value)?;
        }
        Ok(())
    }
}
