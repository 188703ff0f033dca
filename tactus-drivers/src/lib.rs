//! Hardware driver implementations
//!
//! Concrete drivers for the haptic band's actuator tree, generic over the
//! `tactus-hal` traits:
//!
//! - TCA9548A multiplexer pair ([`mux`])
//! - DRV2605 haptic driver chip ([`haptic`])
//! - The index-addressed motor array tying them together ([`array`])

#![no_std]
#![deny(unsafe_code)]

pub mod array;
pub mod haptic;
pub mod mux;

pub use array::MotorArray;
pub use haptic::{Drv2605, Drv2605Error};
pub use mux::{MuxBus, MuxError};
