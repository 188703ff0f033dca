//! I2C multiplexer drivers

pub mod tca9548a;

pub use tca9548a::{MuxBus, MuxError, CHANNEL_COUNT};
