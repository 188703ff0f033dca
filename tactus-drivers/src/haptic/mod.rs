//! Haptic driver chip drivers

pub mod drv2605;

pub use drv2605::{Drv2605, Drv2605Error};
