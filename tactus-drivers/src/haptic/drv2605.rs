//! DRV2605 haptic driver chip
//!
//! One DRV2605 sits on each downstream mux segment, all at the same bus
//! address - the multiplexers provide the isolation. Each driver instance
//! therefore re-selects its channel before every register access instead
//! of assuming the routing survived since the last call.
//!
//! The chips run in real-time playback (RTP) mode: a byte written to the
//! RTP input register is rendered immediately as vibration amplitude, with
//! no waveform sequencing.

use tactus_core::config::ChannelAddress;
use tactus_core::traits::{DriverState, FaultReason};
use tactus_hal::{DelayMs, I2cBus, OutputPin};

use crate::mux::{MuxBus, MuxError};

/// DRV2605 register addresses
pub mod reg {
    /// Device ID and status flags
    pub const STATUS: u8 = 0x00;
    /// Operating mode (also standby control)
    pub const MODE: u8 = 0x01;
    /// Real-time playback input
    pub const RTP_INPUT: u8 = 0x02;
    /// Waveform library selection
    pub const LIBRARY: u8 = 0x03;
}

/// MODE register value: internal trigger, out of standby
pub const MODE_INTERNAL_TRIGGER: u8 = 0x00;
/// MODE register value: real-time playback
pub const MODE_REALTIME: u8 = 0x05;

/// Device ID field (STATUS bits 7:5) for the DRV2605
const DEVICE_ID_DRV2605: u8 = 3;
/// Device ID field for the low-voltage DRV2605L variant
const DEVICE_ID_DRV2605L: u8 = 7;

/// DRV2605 communication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drv2605Error<E> {
    /// Driver is not in the `Ready` state
    NotReady,
    /// Chip acknowledged but identified as something else
    WrongDevice {
        /// Device ID field read from STATUS
        device_id: u8,
    },
    /// Channel selection failed
    Mux(MuxError<E>),
    /// Register access on the chip itself failed
    Bus(E),
}

impl<E> From<MuxError<E>> for Drv2605Error<E> {
    fn from(err: MuxError<E>) -> Self {
        Self::Mux(err)
    }
}

/// One haptic driver chip behind exactly one mux channel
pub struct Drv2605 {
    addr: u8,
    channel: ChannelAddress,
    state: DriverState,
}

impl Drv2605 {
    /// Create a driver instance for the chip behind `channel`
    pub const fn new(addr: u8, channel: ChannelAddress) -> Self {
        Self {
            addr,
            channel,
            state: DriverState::Uninitialized,
        }
    }

    /// Lifecycle state of this driver
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The physical path to this chip
    pub fn channel(&self) -> ChannelAddress {
        self.channel
    }

    /// Boot-time initialization
    ///
    /// Selects the channel, verifies the chip acknowledges and identifies
    /// as a DRV2605(L), then configures library 1 and real-time playback
    /// mode with the output silenced. Any failure leaves the driver
    /// `Faulted`; there is no runtime re-init path.
    pub fn begin<I, P, D>(
        &mut self,
        i2c: &mut I,
        mux: &mut MuxBus<P, D>,
    ) -> Result<(), Drv2605Error<I::Error>>
    where
        I: I2cBus,
        P: OutputPin,
        D: DelayMs,
    {
        let result = self.try_begin(i2c, mux);
        self.state = match &result {
            Ok(()) => DriverState::Ready,
            Err(Drv2605Error::WrongDevice { .. }) => DriverState::Faulted(FaultReason::WrongDevice),
            Err(_) => DriverState::Faulted(FaultReason::NoAck),
        };
        result
    }

    fn try_begin<I, P, D>(
        &mut self,
        i2c: &mut I,
        mux: &mut MuxBus<P, D>,
    ) -> Result<(), Drv2605Error<I::Error>>
    where
        I: I2cBus,
        P: OutputPin,
        D: DelayMs,
    {
        mux.select_channel(i2c, self.channel.mux, self.channel.channel)?;

        let mut status = [0u8; 1];
        i2c.write_read(self.addr, &[reg::STATUS], &mut status)
            .map_err(Drv2605Error::Bus)?;

        let device_id = status[0] >> 5;
        if device_id != DEVICE_ID_DRV2605 && device_id != DEVICE_ID_DRV2605L {
            return Err(Drv2605Error::WrongDevice { device_id });
        }

        // Out of standby, output silenced, effect library 1, then RTP mode
        self.write_reg(i2c, reg::MODE, MODE_INTERNAL_TRIGGER)?;
        self.write_reg(i2c, reg::RTP_INPUT, 0x00)?;
        self.write_reg(i2c, reg::LIBRARY, 0x01)?;
        self.write_reg(i2c, reg::MODE, MODE_REALTIME)?;

        Ok(())
    }

    /// Write a raw amplitude byte to the RTP input register
    ///
    /// Re-selects the channel first - the shared segment's routing may
    /// have changed since this driver last ran.
    pub fn set_intensity<I, P, D>(
        &mut self,
        i2c: &mut I,
        mux: &mut MuxBus<P, D>,
        value: u8,
    ) -> Result<(), Drv2605Error<I::Error>>
    where
        I: I2cBus,
        P: OutputPin,
        D: DelayMs,
    {
        if self.state != DriverState::Ready {
            return Err(Drv2605Error::NotReady);
        }
        mux.select_channel(i2c, self.channel.mux, self.channel.channel)?;
        i2c.write(self.addr, &[reg::RTP_INPUT, value])
            .map_err(Drv2605Error::Bus)
    }

    fn write_reg<I: I2cBus>(
        &mut self,
        i2c: &mut I,
        register: u8,
        value: u8,
    ) -> Result<(), Drv2605Error<I::Error>> {
        i2c.write(self.addr, &[register, value])
            .map_err(Drv2605Error::Bus)
    }
}
