//! Device-independent driver interface.
//!
//! [`SensorReadout`](crate::readout::SensorReadout) only needs to bring a
//! device up once and pull one sample per cycle from it. Each driver exposes
//! that through [`SensorDriver`], with its bus-native sample type; unit
//! conversion happens afterwards in [`units`](crate::units).

use crate::{
    bme688::Bme688,
    bmp280::Bmp280,
    error::Error,
    mpu6050::Mpu6050,
    qmc5883p::Qmc5883p,
    units::{BaroSample, EnvSample, MagSample, MotionSample},
};
use core::fmt::Debug;
use embedded_hal::{delay::DelayNs, i2c::I2c};

pub trait SensorDriver {
    /// Bus-native sample produced by one read.
    type Sample;
    type Error: Debug;

    /// Identify and configure the device. Called once at startup.
    fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error>;

    /// Fetch one sample.
    ///
    /// Returns an error when the device has no fresh data as well as on bus
    /// failure; the caller does not distinguish the two.
    fn read<D: DelayNs>(&mut self, delay: &mut D) -> Result<Self::Sample, Self::Error>;
}

impl<I: I2c> SensorDriver for Bmp280<I> {
    type Sample = BaroSample;
    type Error = Error<I>;

    fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        Bmp280::begin(self, delay)
    }

    fn read<D: DelayNs>(&mut self, _delay: &mut D) -> Result<BaroSample, Self::Error> {
        Bmp280::read(self)
    }
}

impl<I: I2c> SensorDriver for Bme688<I> {
    type Sample = EnvSample;
    type Error = Error<I>;

    fn begin<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Self::Error> {
        Bme688::begin(self, delay)
    }

    fn read<D: DelayNs>(&mut self, delay: &mut D) -> Result<EnvSample, Self::Error> {
        self.perform_reading(delay)
    }
}

impl<I: I2c> SensorDriver for Mpu6050<I> {
    type Sample = MotionSample;
    type Error = Error<I>;

    fn begin<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        Mpu6050::begin(self)
    }

    fn read<D: DelayNs>(&mut self, _delay: &mut D) -> Result<MotionSample, Self::Error> {
        self.motion_sample()
    }
}

/// Reads only when the data-ready flag is set, [`Error::NotReady`] otherwise.
impl<I: I2c> SensorDriver for Qmc5883p<I> {
    type Sample = MagSample;
    type Error = Error<I>;

    fn begin<D: DelayNs>(&mut self, _delay: &mut D) -> Result<(), Self::Error> {
        Qmc5883p::begin(self)
    }

    fn read<D: DelayNs>(&mut self, _delay: &mut D) -> Result<MagSample, Self::Error> {
        if !self.is_data_ready()? {
            return Err(Error::NotReady);
        }
        self.magnetic_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::magnetometer::{Mag, MagRange};
    use crate::mock::{MockI2c, NoopDelay};
    use crate::registers::Qmc5883pRegister;

    #[test]
    fn magnetometer_without_fresh_data_is_not_ready() {
        let mut qmc = Qmc5883p::new(MockI2c::new(Address::QMC5883P.into()));

        assert!(matches!(
            SensorDriver::read(&mut qmc, &mut NoopDelay),
            Err(Error::NotReady)
        ));
    }

    #[test]
    fn magnetometer_reads_when_ready() {
        let mut i2c = MockI2c::new(Address::QMC5883P.into());
        i2c.set_register(Qmc5883pRegister::Status as u8, 0x01);
        i2c.set_registers(Qmc5883pRegister::XoutL as u8, &[0x00, 0x01, 0, 0, 0, 0]);
        let mut qmc = Qmc5883p::new(i2c);
        let sample = SensorDriver::read(&mut qmc, &mut NoopDelay).unwrap();

        assert_eq!(sample.mag, Mag::new(256, 0, 0));
        assert_eq!(sample.range, MagRange::G8);
    }

    #[test]
    fn motion_read_goes_through_one_burst() {
        let mut mpu = Mpu6050::new(MockI2c::new(0x68), Address::MPU6050);
        SensorDriver::read(&mut mpu, &mut NoopDelay).unwrap();

        assert_eq!(mpu.release().transactions().len(), 2);
    }
}
