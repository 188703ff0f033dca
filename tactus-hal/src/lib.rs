//! Tactus Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the motor addressing
//! layer is written against, so the same array logic runs on any chip whose
//! HAL implements them (and on host-side mocks in tests).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (dispatcher, motor array)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tactus-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Chip-specific HAL / test mocks         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (mux reset lines, driver enable)
//! - [`i2c::I2cBus`] - I2C master operations (shared actuator bus)
//! - [`delay::DelayMs`] - Blocking millisecond delays (reset settle times)

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::OutputPin;
pub use i2c::I2cBus;
