//! Configuration types
//!
//! Hardware constants that were scattered literals in earlier firmware
//! revisions, lifted into validated structures so a mismatch between the
//! documented wiring and the actual harness is caught at startup instead
//! of silently miswiring a motor.

pub mod board;
pub mod channel_map;

pub use board::{BoardConfig, ConfigError};
pub use channel_map::{ChannelAddress, ChannelMap, MuxSelector};
