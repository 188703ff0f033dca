//! Index-addressed motor array
//!
//! Owns the shared I2C bus, the multiplexer pair, the driver enable rail
//! and all ten driver instances by value - no heap, no globals. The
//! embedding firmware constructs one of these at startup and hands it (by
//! reference) to the dispatcher.
//!
//! Startup sequencing is strict: `power_up`, then `init_all`, and only
//! then command processing. A driver that fails `init_all` halts the boot
//! (the caller is expected to park in its indicator loop); there is no
//! partial-capability mode for a fixed actuator count.

use tactus_core::config::{BoardConfig, ChannelMap, ConfigError};
use tactus_core::traits::{ArrayError, DriverState, HapticArray};
use tactus_hal::{DelayMs, I2cBus, OutputPin};
use tactus_protocol::MOTOR_COUNT;

use crate::haptic::{Drv2605, Drv2605Error};
use crate::mux::MuxBus;

/// All ten haptic motors behind the two-level mux tree
pub struct MotorArray<I2C, P, D>
where
    I2C: I2cBus,
    P: OutputPin,
    D: DelayMs,
{
    i2c: I2C,
    mux: MuxBus<P, D>,
    enable: P,
    map: ChannelMap,
    drivers: [Drv2605; MOTOR_COUNT],
}

impl<I2C, P, D> MotorArray<I2C, P, D>
where
    I2C: I2cBus,
    P: OutputPin,
    D: DelayMs,
{
    /// Build the array from validated configuration
    ///
    /// Both the board config and the channel map are validated here, so a
    /// table that disagrees with itself is caught before any motor is
    /// wired up wrong.
    pub fn new(
        config: &BoardConfig,
        map: ChannelMap,
        i2c: I2C,
        upper_reset: P,
        lower_reset: P,
        enable: P,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        map.validate()?;

        let entries = *map.entries();
        let drivers = core::array::from_fn(|i| Drv2605::new(config.driver_addr, entries[i]));

        Ok(Self {
            i2c,
            mux: MuxBus::new(config, upper_reset, lower_reset, delay),
            enable,
            map,
            drivers,
        })
    }

    /// Power the driver rail and force both multiplexers to a known state
    ///
    /// Mirrors the board's bring-up order: enable rail high, then a
    /// hardware reset of each multiplexer so every channel starts
    /// disconnected regardless of prior history.
    pub fn power_up(&mut self) {
        self.enable.set_high();
        self.mux.reset_all();
    }

    /// Initialize every driver in index order 0-9
    ///
    /// Fail-fast boot policy: the first faulted driver aborts with
    /// [`ArrayError::DriverInit`] and later drivers are left untouched.
    /// Not a recoverable retry - the caller halts.
    pub fn init_all(&mut self) -> Result<(), ArrayError> {
        for index in 0..MOTOR_COUNT {
            let driver = &mut self.drivers[index];
            // Same isolation rule as runtime addressing: the other mux may
            // still be routing the previous driver's channel.
            let other = driver.channel().mux.other();
            self.mux
                .disconnect(&mut self.i2c, other)
                .map_err(|_| ArrayError::DriverInit {
                    index: index as u8,
                })?;
            driver
                .begin(&mut self.i2c, &mut self.mux)
                .map_err(|_| ArrayError::DriverInit {
                    index: index as u8,
                })?;
        }
        Ok(())
    }

    /// Lifecycle state of one driver, if the index is in range
    pub fn driver_state(&self, index: u8) -> Option<DriverState> {
        self.drivers.get(index as usize).map(Drv2605::state)
    }

    /// The addressing table in use
    pub fn channel_map(&self) -> &ChannelMap {
        &self.map
    }
}

impl<I2C, P, D> HapticArray for MotorArray<I2C, P, D>
where
    I2C: I2cBus,
    P: OutputPin,
    D: DelayMs,
{
    fn set_intensity(&mut self, index: u8, value: u8) -> Result<(), ArrayError> {
        // Resolve first: an out-of-range index must not touch the bus
        let address = self.map.resolve(index)?;

        // The other multiplexer shares the downstream segment; drop its
        // routing before selecting ours. Issued unconditionally - nothing
        // caches which mux the previous operation used.
        self.mux
            .disconnect(&mut self.i2c, address.mux.other())
            .map_err(|_| ArrayError::BusWrite { index })?;

        self.drivers[index as usize]
            .set_intensity(&mut self.i2c, &mut self.mux, value)
            .map_err(|err| match err {
                Drv2605Error::NotReady => ArrayError::DriverNotReady { index },
                _ => ArrayError::BusWrite { index },
            })
    }
}
