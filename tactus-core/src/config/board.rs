//! Board-level hardware configuration
//!
//! Bus addresses, control pins and timing that the rev-1 firmware kept as
//! scattered `#define`s. The bring-up layer constructs pins and the I2C
//! peripheral from these numbers; the addressing layer consumes the bus
//! addresses and settle delay.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tactus_hal::i2c::I2cConfig;

use super::channel_map::MuxSelector;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// An I2C address does not fit in 7 bits
    BadAddress(u8),
    /// Two configured devices share an I2C address
    AddressClash(u8),
    /// Two configured functions share a GPIO number
    PinClash(u8),
    /// Bus frequency is zero or beyond fast mode
    BadBusFrequency(u32),
    /// A channel map entry uses a channel bit outside 0-7
    ChannelOutOfRange {
        /// Offending motor index
        index: u8,
        /// The out-of-range channel bit
        channel: u8,
    },
    /// Two motor indices resolve to the same (multiplexer, channel) pair
    DuplicateChannel {
        /// The second index mapped onto an already-taken pair
        index: u8,
    },
}

/// Static board wiring: addresses, pins and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Upper multiplexer I2C address
    pub upper_mux_addr: u8,
    /// Lower multiplexer I2C address
    pub lower_mux_addr: u8,
    /// Upper multiplexer reset line (GPIO number, for bring-up)
    pub upper_reset_pin: u8,
    /// Lower multiplexer reset line (GPIO number, for bring-up)
    pub lower_reset_pin: u8,
    /// Haptic driver chip address (same on every channel; the mux isolates them)
    pub driver_addr: u8,
    /// Driver enable rail (GPIO number, for bring-up)
    pub driver_enable_pin: u8,
    /// I2C SDA pin (for bring-up)
    pub sda_pin: u8,
    /// I2C SCL pin (for bring-up)
    pub scl_pin: u8,
    /// Shared bus clock frequency in Hz (for bring-up)
    pub bus_frequency: u32,
    /// Settle time after releasing a multiplexer reset line, in ms
    pub mux_settle_ms: u32,
}

impl BoardConfig {
    /// The rev-1 board wiring
    pub const fn rev1() -> Self {
        Self {
            upper_mux_addr: 0x70,
            lower_mux_addr: 0x74,
            upper_reset_pin: 47,
            lower_reset_pin: 48,
            driver_addr: 0x5A,
            driver_enable_pin: 10,
            sda_pin: 8,
            scl_pin: 9,
            bus_frequency: 100_000,
            mux_settle_ms: 10,
        }
    }

    /// Bus address of the given multiplexer
    pub fn mux_addr(&self, selector: MuxSelector) -> u8 {
        match selector {
            MuxSelector::Upper => self.upper_mux_addr,
            MuxSelector::Lower => self.lower_mux_addr,
        }
    }

    /// Peripheral configuration for the shared bus
    pub fn i2c_config(&self) -> I2cConfig {
        I2cConfig {
            frequency: self.bus_frequency,
        }
    }

    /// Check addresses, pins and timing describe a usable bus
    pub fn validate(&self) -> Result<(), ConfigError> {
        for addr in [self.upper_mux_addr, self.lower_mux_addr, self.driver_addr] {
            if addr > 0x7F {
                return Err(ConfigError::BadAddress(addr));
            }
        }
        if self.upper_mux_addr == self.lower_mux_addr {
            return Err(ConfigError::AddressClash(self.upper_mux_addr));
        }
        if self.driver_addr == self.upper_mux_addr || self.driver_addr == self.lower_mux_addr {
            return Err(ConfigError::AddressClash(self.driver_addr));
        }

        // Every GPIO function needs its own pin: both resets, the enable
        // rail and the two bus lines.
        let pins = [
            self.upper_reset_pin,
            self.lower_reset_pin,
            self.driver_enable_pin,
            self.sda_pin,
            self.scl_pin,
        ];
        for (i, &pin) in pins.iter().enumerate() {
            if pins[..i].contains(&pin) {
                return Err(ConfigError::PinClash(pin));
            }
        }

        // The TCA9548A tops out at fast mode
        if self.bus_frequency == 0 || self.bus_frequency > I2cConfig::FAST.frequency {
            return Err(ConfigError::BadBusFrequency(self.bus_frequency));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::rev1()
    }
}
