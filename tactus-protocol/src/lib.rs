//! Intensity Command Protocol
//!
//! This crate defines the wire format the wireless controller uses to drive
//! the haptic band. The transport delivers an unstructured byte stream; this
//! crate turns it into discrete, fixed-length command frames.
//!
//! # Wire format
//!
//! ```text
//! ┌────────┬──────────────────────────────┐
//! │ HEADER │ INTENSITIES                  │
//! │ 1B     │ 10B (one per motor, 0..=9)   │
//! └────────┴──────────────────────────────┘
//! ```
//!
//! The header byte is `0xAA`. Each intensity byte is written verbatim to the
//! target driver's real-time playback register. There is no length prefix,
//! no checksum, and no escape sequence for `0xAA` in payload position.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;

pub use frame::{CommandFrame, CommandFramer, FRAME_HEADER, MOTOR_COUNT, WIRE_FRAME_SIZE};
