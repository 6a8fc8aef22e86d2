//! QMC5883P 3-axis magnetometer driver.
//!
//! The device free-runs in normal mode at the configured output rate and
//! raises the data-ready flag in STATUS whenever a new sample is latched.
//! Reading the output block clears the flag.

use crate::{
    address::Address,
    config::{MagDownsampling, MagMode, MagOutputRate, MagOversampling, SetResetMode},
    error::Error,
    magnetometer::{Mag, MagRange},
    registers::Qmc5883pRegister as Register,
    units::MagSample,
};
use embedded_hal::i2c::I2c;

/// Expected content of the chip identifier register.
pub const CHIP_ID: u8 = 0x80;

const STATUS_DRDY: u8 = 1 << 0;
const STATUS_OVFL: u8 = 1 << 1;

const CTRL1_MODE: u8 = 0b0000_0011;
const CTRL1_ODR: u8 = 0b0000_1100;
const CTRL1_OSR: u8 = 0b0011_0000;
const CTRL1_DSR: u8 = 0b1100_0000;
const CTRL2_SET_RESET: u8 = 0b0000_0011;
const CTRL2_RANGE: u8 = 0b0000_1100;

/// Startup configuration applied by [`Qmc5883p::begin`].
///
/// The default is normal mode at 50 Hz, OSR 4, DSR 2, ±8 G, set/reset on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Qmc5883pConfig {
    pub mode: MagMode,
    pub rate: MagOutputRate,
    pub oversampling: MagOversampling,
    pub downsampling: MagDownsampling,
    pub range: MagRange,
    pub set_reset: SetResetMode,
}

impl Qmc5883pConfig {
    fn control1(&self) -> u8 {
        (self.mode as u8)
            | (self.rate as u8) << 2
            | (self.oversampling as u8) << 4
            | (self.downsampling as u8) << 6
    }

    fn control2(&self) -> u8 {
        (self.set_reset as u8) | (self.range as u8) << 2
    }
}

pub struct Qmc5883p<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    config: Qmc5883pConfig,
}

impl<I> Qmc5883p<I>
where
    I: I2c,
{
    pub fn new(i2c: I) -> Self {
        Self::with_config(i2c, Qmc5883pConfig::default())
    }

    pub fn with_config(i2c: I, config: Qmc5883pConfig) -> Self {
        Self {
            i2c,
            address: Address::QMC5883P.into(),
            config,
        }
    }

    pub fn release(self) -> I {
        self.i2c
    }

    pub fn config(&self) -> &Qmc5883pConfig {
        &self.config
    }

    /// Range the output counts are currently scaled to.
    pub fn range(&self) -> MagRange {
        self.config.range
    }

    /// Check the chip identifier and write both control registers.
    pub fn begin(&mut self) -> Result<(), Error<I>> {
        let id = self.read_register(Register::ChipId)?;
        if id != CHIP_ID {
            return Err(Error::WrongDevice(id));
        }
        // range and set/reset must be in place before leaving suspend mode
        self.write_register(Register::Control2, self.config.control2())?;
        self.write_register(Register::Control1, self.config.control1())
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.i2c
            .write_read(self.address, &[reg as u8], &mut buf)
            .map_err(Error::WriteReadError)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, &[reg as u8, value])
            .map_err(Error::WriteError)
    }

    fn update_register(&mut self, reg: Register, mask: u8, bits: u8) -> Result<(), Error<I>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, (value & !mask) | (bits & mask))
    }

    pub fn set_mode(&mut self, mode: MagMode) -> Result<(), Error<I>> {
        self.update_register(Register::Control1, CTRL1_MODE, mode as u8)?;
        self.config.mode = mode;
        Ok(())
    }

    pub fn set_output_rate(&mut self, rate: MagOutputRate) -> Result<(), Error<I>> {
        self.update_register(Register::Control1, CTRL1_ODR, (rate as u8) << 2)?;
        self.config.rate = rate;
        Ok(())
    }

    pub fn set_oversampling(&mut self, oversampling: MagOversampling) -> Result<(), Error<I>> {
        self.update_register(Register::Control1, CTRL1_OSR, (oversampling as u8) << 4)?;
        self.config.oversampling = oversampling;
        Ok(())
    }

    pub fn set_downsampling(&mut self, downsampling: MagDownsampling) -> Result<(), Error<I>> {
        self.update_register(Register::Control1, CTRL1_DSR, (downsampling as u8) << 6)?;
        self.config.downsampling = downsampling;
        Ok(())
    }

    pub fn set_range(&mut self, range: MagRange) -> Result<(), Error<I>> {
        self.update_register(Register::Control2, CTRL2_RANGE, (range as u8) << 2)?;
        self.config.range = range;
        Ok(())
    }

    pub fn set_reset_mode(&mut self, mode: SetResetMode) -> Result<(), Error<I>> {
        self.update_register(Register::Control2, CTRL2_SET_RESET, mode as u8)?;
        self.config.set_reset = mode;
        Ok(())
    }

    /// Read back the range bits from the device.
    pub fn read_range(&mut self) -> Result<MagRange, Error<I>> {
        let value = self.read_register(Register::Control2)?;
        Ok(MagRange::from_bits((value & CTRL2_RANGE) >> 2))
    }

    pub fn is_data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_DRDY != 0)
    }

    /// Whether any axis exceeded the configured range in the last sample.
    pub fn is_overflow(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::Status)? & STATUS_OVFL != 0)
    }

    pub fn raw_magnetic(&mut self) -> Result<Mag, Error<I>> {
        let mut data = [0; 6];
        self.i2c
            .write_read(self.address, &[Register::XoutL as u8], &mut data)
            .map_err(Error::WriteReadError)?;
        Ok(Mag::from_bytes(data))
    }

    /// Output block tagged with the configured range.
    pub fn magnetic_sample(&mut self) -> Result<MagSample, Error<I>> {
        Ok(MagSample {
            mag: self.raw_magnetic()?,
            range: self.config.range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockI2c;

    fn device() -> MockI2c {
        let mut i2c = MockI2c::new(0x2C);
        i2c.set_register(Register::ChipId as u8, CHIP_ID);
        i2c
    }

    #[test]
    fn begin_applies_startup_configuration() {
        let mut qmc = Qmc5883p::new(device());
        qmc.begin().unwrap();
        let i2c = qmc.release();

        // normal mode, 50 Hz, OSR 4, DSR 2
        assert_eq!(i2c.register(Register::Control1 as u8), 0b0101_0101);
        // set/reset on, ±8 G
        assert_eq!(i2c.register(Register::Control2 as u8), 0b0000_1000);
        assert_eq!(i2c.writes_to(Register::Control2 as u8), [0b0000_1000]);
    }

    #[test]
    fn foreign_chip_is_rejected() {
        let mut i2c = device();
        i2c.set_register(Register::ChipId as u8, 0xFF);
        let mut qmc = Qmc5883p::new(i2c);

        assert!(matches!(qmc.begin(), Err(Error::WrongDevice(0xFF))));
    }

    #[test]
    fn data_ready_and_overflow_flags() {
        let mut i2c = device();
        i2c.set_register(Register::Status as u8, STATUS_OVFL);
        let mut qmc = Qmc5883p::new(i2c);

        assert!(!qmc.is_data_ready().unwrap());
        assert!(qmc.is_overflow().unwrap());
    }

    #[test]
    fn range_change_keeps_set_reset_bits() {
        let mut i2c = device();
        i2c.set_register(Register::Control2 as u8, 0b0000_1001);
        let mut qmc = Qmc5883p::new(i2c);
        qmc.set_range(MagRange::G2).unwrap();

        assert_eq!(qmc.read_range().unwrap(), MagRange::G2);
        assert_eq!(qmc.range(), MagRange::G2);
        assert_eq!(qmc.release().register(Register::Control2 as u8), 0b0000_1101);
    }

    #[test]
    fn sample_carries_configured_range() {
        let mut i2c = device();
        i2c.set_registers(Register::XoutL as u8, &[0xE8, 0x03, 0x18, 0xFC, 0x00, 0x00]);
        let mut qmc = Qmc5883p::with_config(
            i2c,
            Qmc5883pConfig {
                range: MagRange::G30,
                ..Default::default()
            },
        );
        let sample = qmc.magnetic_sample().unwrap();

        assert_eq!(sample.mag, Mag::new(1000, -1000, 0));
        assert_eq!(sample.range, MagRange::G30);
    }
}
