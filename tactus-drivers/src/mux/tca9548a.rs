//! TCA9548A I2C multiplexer pair
//!
//! The TCA9548A routes one upstream I2C bus to up to eight downstream
//! segments, selected by writing a channel bitmask to its single control
//! register. The band carries two of them ("Upper" and "Lower") whose
//! downstream segments join again in front of the driver chips, so exactly
//! one of the two may have a channel enabled at any time - the array layer
//! disconnects one before selecting on the other.
//!
//! Connection state is never cached here: every operation re-issues its
//! register write, because any other motor access may have changed the
//! routing since.

use tactus_core::config::{BoardConfig, MuxSelector};
use tactus_hal::{DelayMs, I2cBus, OutputPin};

/// Downstream channels per multiplexer
pub const CHANNEL_COUNT: u8 = 8;

/// Multiplexer operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MuxError<E> {
    /// Channel bit outside 0-7; nothing was written
    InvalidChannel(u8),
    /// The bus transaction failed
    Bus(E),
}

/// Driver for the band's two multiplexers on the shared bus
///
/// Owns the reset lines and the settle delay; bus access is borrowed per
/// operation so the array layer can keep a single owner for the shared
/// I2C peripheral.
pub struct MuxBus<P: OutputPin, D: DelayMs> {
    upper_addr: u8,
    lower_addr: u8,
    upper_reset: P,
    lower_reset: P,
    delay: D,
    settle_ms: u32,
}

impl<P: OutputPin, D: DelayMs> MuxBus<P, D> {
    /// Create the mux pair driver from board configuration
    pub fn new(config: &BoardConfig, upper_reset: P, lower_reset: P, delay: D) -> Self {
        Self {
            upper_addr: config.upper_mux_addr,
            lower_addr: config.lower_mux_addr,
            upper_reset,
            lower_reset,
            delay,
            settle_ms: config.mux_settle_ms,
        }
    }

    /// Bus address of the given multiplexer
    pub fn addr(&self, selector: MuxSelector) -> u8 {
        match selector {
            MuxSelector::Upper => self.upper_addr,
            MuxSelector::Lower => self.lower_addr,
        }
    }

    /// Enable exactly one downstream channel on the given multiplexer
    ///
    /// Writes `1 << channel` to the control register, which disables every
    /// other channel on that multiplexer as a side effect. Does not touch
    /// the other multiplexer.
    pub fn select_channel<I: I2cBus>(
        &mut self,
        i2c: &mut I,
        selector: MuxSelector,
        channel: u8,
    ) -> Result<(), MuxError<I::Error>> {
        if channel >= CHANNEL_COUNT {
            return Err(MuxError::InvalidChannel(channel));
        }
        i2c.write(self.addr(selector), &[1 << channel])
            .map_err(MuxError::Bus)
    }

    /// Disable all downstream channels on the given multiplexer
    ///
    /// Mandatory before selecting a channel on the other multiplexer, as
    /// the two share a downstream bus segment.
    pub fn disconnect<I: I2cBus>(
        &mut self,
        i2c: &mut I,
        selector: MuxSelector,
    ) -> Result<(), MuxError<I::Error>> {
        i2c.write(self.addr(selector), &[0x00]).map_err(MuxError::Bus)
    }

    /// Hardware-reset the given multiplexer to the all-disabled state
    ///
    /// Drives the reset line low, waits the configured settle time, then
    /// releases it. Used once at power-up to force a known state
    /// regardless of prior history.
    pub fn reset(&mut self, selector: MuxSelector) {
        let pin = match selector {
            MuxSelector::Upper => &mut self.upper_reset,
            MuxSelector::Lower => &mut self.lower_reset,
        };
        pin.set_low();
        self.delay.delay_ms(self.settle_ms);
        pin.set_high();
    }

    /// Hardware-reset both multiplexers
    pub fn reset_all(&mut self) {
        self.reset(MuxSelector::Upper);
        self.reset(MuxSelector::Lower);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Write {
        addr: u8,
        data: Vec<u8, 2>,
    }

    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<Write, 16>,
    }

    impl I2cBus for RecordingBus {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            let mut copy = Vec::new();
            copy.extend_from_slice(data).unwrap();
            self.writes
                .push(Write {
                    addr: address,
                    data: copy,
                })
                .unwrap();
            Ok(())
        }

        fn read(&mut self, _address: u8, _buf: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }

        fn write_read(&mut self, _address: u8, _w: &[u8], _r: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockPin {
        high: bool,
        transitions: Vec<bool, 8>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.transitions.push(true).unwrap();
        }

        fn set_low(&mut self) {
            self.high = false;
            self.transitions.push(false).unwrap();
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[derive(Default)]
    struct MockDelay {
        delays: Vec<u32, 8>,
    }

    impl DelayMs for MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.delays.push(ms).unwrap();
        }
    }

    fn mux() -> MuxBus<MockPin, MockDelay> {
        MuxBus::new(
            &tactus_core::config::BoardConfig::rev1(),
            MockPin::default(),
            MockPin::default(),
            MockDelay::default(),
        )
    }

    #[test]
    fn test_select_writes_single_bit_mask() {
        let mut mux = mux();
        let mut i2c = RecordingBus::default();

        mux.select_channel(&mut i2c, MuxSelector::Upper, 4).unwrap();
        mux.select_channel(&mut i2c, MuxSelector::Lower, 0).unwrap();

        assert_eq!(i2c.writes[0].addr, 0x70);
        assert_eq!(&i2c.writes[0].data[..], &[1 << 4]);
        assert_eq!(i2c.writes[1].addr, 0x74);
        assert_eq!(&i2c.writes[1].data[..], &[0x01]);
    }

    #[test]
    fn test_select_rejects_channel_out_of_range() {
        let mut mux = mux();
        let mut i2c = RecordingBus::default();

        let result = mux.select_channel(&mut i2c, MuxSelector::Upper, 8);
        assert_eq!(result, Err(MuxError::InvalidChannel(8)));
        // Nothing reached the bus
        assert!(i2c.writes.is_empty());
    }

    #[test]
    fn test_disconnect_writes_zero_mask() {
        let mut mux = mux();
        let mut i2c = RecordingBus::default();

        mux.disconnect(&mut i2c, MuxSelector::Lower).unwrap();

        assert_eq!(i2c.writes[0].addr, 0x74);
        assert_eq!(&i2c.writes[0].data[..], &[0x00]);
    }

    #[test]
    fn test_reset_pulses_line_low_with_settle() {
        let mut mux = mux();

        mux.reset(MuxSelector::Upper);

        assert_eq!(&mux.upper_reset.transitions[..], &[false, true]);
        assert!(mux.upper_reset.is_set_high());
        assert_eq!(&mux.delay.delays[..], &[10]);
        // The other mux's line is untouched
        assert!(mux.lower_reset.transitions.is_empty());
    }

    #[test]
    fn test_reset_all_hits_both_lines() {
        let mut mux = mux();

        mux.reset_all();

        assert_eq!(&mux.upper_reset.transitions[..], &[false, true]);
        assert_eq!(&mux.lower_reset.transitions[..], &[false, true]);
        assert_eq!(&mux.delay.delays[..], &[10, 10]);
    }
}
