use crate::{
    accel::{Accel, AccelFullScale},
    address::Address,
    config::{ClockSource, DigitalLowPassFilter},
    error::Error,
    gyro::{Gyro, GyroFullScale},
    registers::Mpu6050Register as Register,
    units::MotionSample,
};
use embedded_hal::i2c::I2c;

/// Expected content of the WHO_AM_I register.
pub const WHO_AM_I: u8 = 0x68;

/// Startup configuration applied by [`Mpu6050::begin`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Mpu6050Config {
    pub clock_source: ClockSource,
    pub accel_scale: AccelFullScale,
    pub gyro_scale: GyroFullScale,
    pub filter: DigitalLowPassFilter,
    pub sample_rate_divider: u8,
}

/// InvenSense MPU-6050 Driver
pub struct Mpu6050<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    config: Mpu6050Config,
}

impl<I> Mpu6050<I>
where
    I: I2c,
{
    /// Construct a new i2c driver for the MPU-6050. No bus traffic until
    /// [`begin`](Self::begin).
    pub fn new(i2c: I, address: Address) -> Self {
        Self::with_config(i2c, address, Mpu6050Config::default())
    }

    pub fn with_config(i2c: I, address: Address, config: Mpu6050Config) -> Self {
        Self {
            i2c,
            address: address.into(),
            config,
        }
    }

    /// Returns the underlying I2C peripheral, consuming this driver.
    pub fn release(self) -> I {
        self.i2c
    }

    pub fn config(&self) -> &Mpu6050Config {
        &self.config
    }

    /// Check the device identity, wake it up and program the configured
    /// clock source, ranges and filter.
    pub fn begin(&mut self) -> Result<(), Error<I>> {
        let id = self.who_am_i()?;
        if id != WHO_AM_I {
            return Err(Error::WrongDevice(id));
        }
        let config = self.config;
        self.set_clock_source(config.clock_source)?;
        self.set_gyro_full_scale(config.gyro_scale)?;
        self.set_accel_full_scale(config.accel_scale)?;
        self.set_digital_lowpass_filter(config.filter)?;
        self.set_sample_rate_divider(config.sample_rate_divider)?;
        self.disable_sleep()
    }

    pub(crate) fn read(&mut self, bytes: &[u8], response: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, bytes, response)
            .map_err(Error::WriteReadError)
    }

    pub(crate) fn write(&mut self, bytes: &[u8]) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, bytes)
            .map_err(Error::WriteError)
    }

    pub(crate) fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read(&[reg as u8], &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_registers<'a>(
        &mut self,
        reg: Register,
        buf: &'a mut [u8],
    ) -> Result<&'a [u8], Error<I>> {
        self.read(&[reg as u8], buf)?;
        Ok(buf)
    }

    pub(crate) fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        self.write(&[reg as u8, value])
    }

    fn update_register(&mut self, reg: Register, mask: u8, bits: u8) -> Result<(), Error<I>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, (value & !mask) | (bits & mask))
    }

    pub fn who_am_i(&mut self) -> Result<u8, Error<I>> {
        self.read_register(Register::WhoAmI)
    }

    /// Pick the clock-source
    pub fn set_clock_source(&mut self, clock_source: ClockSource) -> Result<(), Error<I>> {
        self.update_register(Register::PwrMgmt1, 0b0000_0111, clock_source as u8)?;
        self.config.clock_source = clock_source;
        Ok(())
    }

    pub fn set_accel_full_scale(&mut self, scale: AccelFullScale) -> Result<(), Error<I>> {
        self.update_register(Register::AccelConfig, 0b0001_1000, (scale as u8) << 3)?;
        self.config.accel_scale = scale;
        Ok(())
    }

    pub fn set_gyro_full_scale(&mut self, scale: GyroFullScale) -> Result<(), Error<I>> {
        self.update_register(Register::GyroConfig, 0b0001_1000, (scale as u8) << 3)?;
        self.config.gyro_scale = scale;
        Ok(())
    }

    pub fn set_sample_rate_divider(&mut self, div: u8) -> Result<(), Error<I>> {
        self.write_register(Register::SmpRtDiv, div)?;
        self.config.sample_rate_divider = div;
        Ok(())
    }

    pub fn set_digital_lowpass_filter(
        &mut self,
        filter: DigitalLowPassFilter,
    ) -> Result<(), Error<I>> {
        self.update_register(Register::Config, 0b0000_0111, filter as u8)?;
        self.config.filter = filter;
        Ok(())
    }

    pub fn disable_sleep(&mut self) -> Result<(), Error<I>> {
        self.update_register(Register::PwrMgmt1, 1 << 6, 0)
    }

    /// Whether a new set of output registers is available.
    /// Reading INT_STATUS clears the flag.
    pub fn is_data_ready(&mut self) -> Result<bool, Error<I>> {
        Ok(self.read_register(Register::IntStatus)? & 0x01 != 0)
    }

    pub fn accel(&mut self) -> Result<Accel, Error<I>> {
        let mut data = [0; 6];
        self.read_registers(Register::AccelX_H, &mut data)?;
        Ok(Accel::from_bytes(data))
    }

    pub fn gyro(&mut self) -> Result<Gyro, Error<I>> {
        let mut data = [0; 6];
        self.read_registers(Register::GyroX_H, &mut data)?;
        Ok(Gyro::from_bytes(data))
    }

    /// Gets the 6 degrees of freedom at once - Acceleration and Gyroscope.
    pub fn motion6(&mut self) -> Result<(Accel, Gyro), Error<I>> {
        let mut data = [0; 14];
        self.read_registers(Register::AccelX_H, &mut data)?;

        let accel = Accel::from_bytes([data[0], data[1], data[2], data[3], data[4], data[5]]);
        let gyro = Gyro::from_bytes([data[8], data[9], data[10], data[11], data[12], data[13]]);
        Ok((accel, gyro))
    }

    /// Reads accel and gyro in one transaction, tagged with the active ranges.
    pub fn motion_sample(&mut self) -> Result<MotionSample, Error<I>> {
        let (accel, gyro) = self.motion6()?;
        Ok(MotionSample {
            accel,
            gyro,
            accel_scale: self.config.accel_scale,
            gyro_scale: self.config.gyro_scale,
        })
    }
}
