//! Blocking delay abstraction
//!
//! Used for the multiplexer reset settle time during power-up. Command
//! processing itself never delays.

/// Blocking millisecond delay
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
