//! Logical motor index → physical mux/channel addressing table
//!
//! Ten motors hang off two 8-channel multiplexers that share the upstream
//! bus. Which motor sits behind which (multiplexer, channel) pair is a
//! physical wiring fact. Historical firmware revisions disagree on the
//! exact table, so the map is runtime-validated configuration rather than
//! a hard-coded constant: [`ChannelMap::rev1`] carries the rev-1 harness
//! assignment, and [`ChannelMap::validate`] must pass against whatever
//! table the build is given before any motor is driven.

use tactus_protocol::MOTOR_COUNT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::board::ConfigError;
use crate::traits::ArrayError;

/// Which of the two multiplexers routes a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MuxSelector {
    /// Multiplexer carrying eight of the ten motors (rev 1: 0x70)
    Upper,
    /// Multiplexer carrying the remaining two motors (rev 1: 0x74)
    Lower,
}

impl MuxSelector {
    /// The multiplexer sharing the downstream bus segment with this one
    ///
    /// Before addressing a channel on one multiplexer, the other must be
    /// disconnected or the two drive the shared segment simultaneously.
    pub fn other(self) -> Self {
        match self {
            Self::Upper => Self::Lower,
            Self::Lower => Self::Upper,
        }
    }
}

/// Physical path to one motor: a multiplexer and a channel bit on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelAddress {
    /// Multiplexer routing this channel
    pub mux: MuxSelector,
    /// Downstream channel bit on that multiplexer (0-7)
    pub channel: u8,
}

impl ChannelAddress {
    /// Create a channel address
    pub const fn new(mux: MuxSelector, channel: u8) -> Self {
        Self { mux, channel }
    }
}

/// Total mapping from logical motor index to physical channel address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMap {
    entries: [ChannelAddress; MOTOR_COUNT],
}

impl ChannelMap {
    /// Build a map from an explicit table
    pub const fn new(entries: [ChannelAddress; MOTOR_COUNT]) -> Self {
        Self { entries }
    }

    /// The rev-1 wiring harness assignment
    ///
    /// Motors 4 and 5 route through the Lower multiplexer; the other eight
    /// through the Upper one. Verify against the actual harness before
    /// trusting it on new hardware.
    pub const fn rev1() -> Self {
        use MuxSelector::{Lower, Upper};
        Self::new([
            ChannelAddress::new(Upper, 4),
            ChannelAddress::new(Upper, 5),
            ChannelAddress::new(Upper, 6),
            ChannelAddress::new(Upper, 7),
            ChannelAddress::new(Lower, 1),
            ChannelAddress::new(Lower, 0),
            ChannelAddress::new(Upper, 0),
            ChannelAddress::new(Upper, 1),
            ChannelAddress::new(Upper, 2),
            ChannelAddress::new(Upper, 3),
        ])
    }

    /// Resolve a logical motor index to its physical channel address
    ///
    /// Pure and deterministic; fails with [`ArrayError::InvalidIndex`] for
    /// indices outside the array.
    pub fn resolve(&self, index: u8) -> Result<ChannelAddress, ArrayError> {
        self.entries
            .get(index as usize)
            .copied()
            .ok_or(ArrayError::InvalidIndex(index))
    }

    /// The full table, index-aligned
    pub fn entries(&self) -> &[ChannelAddress; MOTOR_COUNT] {
        &self.entries
    }

    /// Check the table describes a drivable harness
    ///
    /// Every channel bit must be 0-7, and no two indices may share a
    /// (multiplexer, channel) pair. Totality over the motor indices is
    /// guaranteed by the array type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut upper_seen = 0u8;
        let mut lower_seen = 0u8;

        for (index, entry) in self.entries.iter().enumerate() {
            let index = index as u8;
            if entry.channel > 7 {
                return Err(ConfigError::ChannelOutOfRange {
                    index,
                    channel: entry.channel,
                });
            }

            let seen = match entry.mux {
                MuxSelector::Upper => &mut upper_seen,
                MuxSelector::Lower => &mut lower_seen,
            };
            let bit = 1u8 << entry.channel;
            if *seen & bit != 0 {
                return Err(ConfigError::DuplicateChannel { index });
            }
            *seen |= bit;
        }

        Ok(())
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::rev1()
    }
}
