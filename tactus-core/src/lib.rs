//! Board-agnostic core logic for the haptic band firmware
//!
//! This crate contains the application logic that does not touch hardware
//! directly:
//!
//! - Validated board configuration (mux addresses, reset pins, channel map)
//! - The logical-index → mux/channel addressing table
//! - The haptic array trait and error taxonomy
//! - The dispatcher wiring the command framer to the array

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod traits;
