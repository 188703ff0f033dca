//! Hardware abstraction traits
//!
//! The interface between the dispatcher and whatever drives the physical
//! actuators - the real multiplexed array in `tactus-drivers`, or a fake
//! in tests.

pub mod haptic;

pub use haptic::{ArrayError, DriverState, FaultReason, HapticArray};
