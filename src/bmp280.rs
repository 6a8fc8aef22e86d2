//! BMP280 barometric pressure and temperature sensor driver.
//!
//! The sensor runs in normal mode; every read fetches the latest conversion
//! and compensates it with the factory trimming parameters using the
//! floating-point formulas from the Bosch datasheet (section 8.1).

use crate::{
    address::Address,
    config::{IirFilter, Oversampling, Standby},
    error::Error,
    registers::Bmp280Register as Register,
    units::BaroSample,
};
use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Expected content of the chip identifier register.
pub const CHIP_ID: u8 = 0x58;

const RESET_COMMAND: u8 = 0xB6;
const MODE_NORMAL: u8 = 0b11;
const STATUS_IM_UPDATE: u8 = 1 << 0;
/// ADC value reported for a channel whose oversampling is set to skip.
pub const ADC_SKIPPED: u32 = 0x80000;

/// Startup configuration applied by [`Bmp280::begin`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Bmp280Config {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub filter: IirFilter,
    pub standby: Standby,
}

impl Default for Bmp280Config {
    fn default() -> Self {
        Self {
            temperature: Oversampling::X16,
            pressure: Oversampling::X16,
            filter: IirFilter::Off,
            standby: Standby::Ms0_5,
        }
    }
}

/// Factory trimming parameters (dig_T1..dig_P9).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl Calibration {
    /// Parses the 24 byte little-endian table starting at 0x88.
    pub fn from_bytes(data: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([data[i], data[i + 1]]);
        Self {
            t1: u(0),
            t2: s(2),
            t3: s(4),
            p1: u(6),
            p2: s(8),
            p3: s(10),
            p4: s(12),
            p5: s(14),
            p6: s(16),
            p7: s(18),
            p8: s(20),
            p9: s(22),
        }
    }

    /// Returns (temperature in °C, t_fine).
    pub fn compensate_temperature(&self, adc_t: u32) -> (f64, f64) {
        let adc_t = adc_t as f64;
        let t1 = self.t1 as f64;
        let var1 = (adc_t / 16384.0 - t1 / 1024.0) * self.t2 as f64;
        let delta = adc_t / 131072.0 - t1 / 8192.0;
        let var2 = delta * delta * self.t3 as f64;
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Pressure in Pa. `t_fine` comes from [`compensate_temperature`](Self::compensate_temperature).
    ///
    /// NaN when the trimming table is blank.
    pub fn compensate_pressure(&self, adc_p: u32, t_fine: f64) -> f64 {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.p6 as f64 / 32768.0;
        var2 += var1 * self.p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.p4 as f64 * 65536.0;
        var1 = (self.p3 as f64 * var1 * var1 / 524288.0 + self.p2 as f64 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.p1 as f64;
        if var1 == 0.0 {
            return f64::NAN;
        }
        let mut p = 1048576.0 - adc_p as f64;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        var1 = self.p9 as f64 * p * p / 2147483648.0;
        var2 = p * self.p8 as f64 / 32768.0;
        p + (var1 + var2 + self.p7 as f64) / 16.0
    }
}

pub struct Bmp280<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    config: Bmp280Config,
    calibration: Calibration,
}

impl<I> Bmp280<I>
where
    I: I2c,
{
    pub fn new(i2c: I, address: Address) -> Self {
        Self::with_config(i2c, address, Bmp280Config::default())
    }

    pub fn with_config(i2c: I, address: Address, config: Bmp280Config) -> Self {
        Self {
            i2c,
            address: address.into(),
            config,
            calibration: Calibration::default(),
        }
    }

    pub fn release(self) -> I {
        self.i2c
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Check the chip identifier, reset, load the trimming table and start
    /// normal-mode conversions.
    pub fn begin(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I>> {
        let id = self.read_register(Register::ChipId)?;
        if id != CHIP_ID {
            return Err(Error::WrongDevice(id));
        }
        self.write_register(Register::Reset, RESET_COMMAND)?;
        delay.delay_ms(10);
        self.wait_for_nvm(delay)?;

        let mut data = [0; 24];
        self.read_registers(Register::Calib00, &mut data)?;
        self.calibration = Calibration::from_bytes(&data);

        // config is only writable in sleep mode, i.e. before ctrl_meas
        let config = self.config;
        self.write_register(
            Register::Config,
            (config.standby as u8) << 5 | (config.filter as u8) << 2,
        )?;
        self.write_register(
            Register::CtrlMeas,
            (config.temperature as u8) << 5 | (config.pressure as u8) << 2 | MODE_NORMAL,
        )
    }

    fn wait_for_nvm(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I>> {
        for _ in 0..10 {
            if self.read_register(Register::Status)? & STATUS_IM_UPDATE == 0 {
                return Ok(());
            }
            delay.delay_ms(2);
        }
        Err(Error::NotReady)
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, Error<I>> {
        let mut buf = [0; 1];
        self.read_registers(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn read_registers(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Error<I>> {
        self.i2c
            .write_read(self.address, &[reg as u8], buf)
            .map_err(Error::WriteReadError)
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Error<I>> {
        self.i2c
            .write(self.address, &[reg as u8, value])
            .map_err(Error::WriteError)
    }

    /// Raw 20-bit (pressure, temperature) ADC values.
    pub fn read_raw(&mut self) -> Result<(u32, u32), Error<I>> {
        let mut data = [0; 6];
        self.read_registers(Register::PressMsb, &mut data)?;
        let adc_p = (data[0] as u32) << 12 | (data[1] as u32) << 4 | (data[2] as u32) >> 4;
        let adc_t = (data[3] as u32) << 12 | (data[4] as u32) << 4 | (data[5] as u32) >> 4;
        Ok((adc_p, adc_t))
    }

    /// Latest conversion, compensated to °C and Pa.
    ///
    /// Fails with [`Error::NotReady`] when either channel is skipped or the
    /// pressure cannot be compensated, so a sample is always complete.
    pub fn read(&mut self) -> Result<BaroSample, Error<I>> {
        let (adc_p, adc_t) = self.read_raw()?;
        if adc_t == ADC_SKIPPED || adc_p == ADC_SKIPPED {
            return Err(Error::NotReady);
        }
        let (temperature, t_fine) = self.calibration.compensate_temperature(adc_t);
        let pressure = self.calibration.compensate_pressure(adc_p, t_fine);
        if pressure.is_nan() {
            return Err(Error::NotReady);
        }
        Ok(BaroSample {
            temperature_c: temperature as f32,
            pressure_pa: pressure as f32,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mock::{MockI2c, NoopDelay};
    use approx::assert_relative_eq;

    /// Trimming values of the datasheet's worked example.
    const DATASHEET: Calibration = Calibration {
        t1: 27504,
        t2: 26435,
        t3: -1000,
        p1: 36477,
        p2: -10685,
        p3: 3024,
        p4: 2855,
        p5: 140,
        p6: -7,
        p7: 15500,
        p8: -14600,
        p9: 6000,
    };

    fn calibration_bytes(c: &Calibration) -> [u8; 24] {
        let words: [u16; 12] = [
            c.t1, c.t2 as u16, c.t3 as u16, c.p1, c.p2 as u16, c.p3 as u16, c.p4 as u16,
            c.p5 as u16, c.p6 as u16, c.p7 as u16, c.p8 as u16, c.p9 as u16,
        ];
        let mut out = [0; 24];
        for (i, word) in words.iter().enumerate() {
            out[2 * i..2 * i + 2].copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    pub(crate) fn device(adc_p: u32, adc_t: u32) -> MockI2c {
        let mut i2c = MockI2c::new(0x77);
        i2c.set_register(Register::ChipId as u8, CHIP_ID);
        i2c.set_registers(Register::Calib00 as u8, &calibration_bytes(&DATASHEET));
        i2c.set_registers(
            Register::PressMsb as u8,
            &[
                (adc_p >> 12) as u8,
                (adc_p >> 4) as u8,
                ((adc_p & 0x0F) << 4) as u8,
                (adc_t >> 12) as u8,
                (adc_t >> 4) as u8,
                ((adc_t & 0x0F) << 4) as u8,
            ],
        );
        i2c
    }

    #[test]
    fn datasheet_worked_example() {
        let (temperature, t_fine) = DATASHEET.compensate_temperature(519888);
        assert_relative_eq!(temperature, 25.08, epsilon = 0.01);
        let pressure = DATASHEET.compensate_pressure(415148, t_fine);
        assert_relative_eq!(pressure, 100653.27, epsilon = 0.5);
    }

    #[test]
    fn begin_loads_trimming_table_and_starts_normal_mode() {
        let mut bmp = Bmp280::new(device(415148, 519888), Address::BMP280);
        bmp.begin(&mut NoopDelay).unwrap();
        assert_eq!(*bmp.calibration(), DATASHEET);

        let i2c = bmp.release();
        assert_eq!(i2c.writes_to(Register::Reset as u8), [RESET_COMMAND]);
        // x16 temperature, x16 pressure, normal mode
        assert_eq!(i2c.register(Register::CtrlMeas as u8), 0b1011_0111);
        assert_eq!(i2c.register(Register::Config as u8), 0x00);
    }

    #[test]
    fn read_returns_compensated_sample() {
        let mut bmp = Bmp280::new(device(415148, 519888), Address::BMP280);
        bmp.begin(&mut NoopDelay).unwrap();
        let sample = bmp.read().unwrap();

        assert_relative_eq!(sample.temperature_c, 25.08, epsilon = 0.01);
        assert_relative_eq!(sample.pressure_pa, 100653.27, epsilon = 1.0);
    }

    #[test]
    fn skipped_temperature_is_not_ready() {
        let mut bmp = Bmp280::new(device(415148, ADC_SKIPPED), Address::BMP280);
        bmp.begin(&mut NoopDelay).unwrap();

        assert!(matches!(bmp.read(), Err(Error::NotReady)));
    }

    #[test]
    fn skipped_pressure_is_not_ready() {
        let mut bmp = Bmp280::new(device(ADC_SKIPPED, 519888), Address::BMP280);
        bmp.begin(&mut NoopDelay).unwrap();

        assert!(matches!(bmp.read(), Err(Error::NotReady)));
    }

    #[test]
    fn blank_trimming_table_is_not_ready() {
        assert!(Calibration::default().compensate_pressure(415148, 0.0).is_nan());

        let mut i2c = device(415148, 519888);
        i2c.set_registers(Register::Calib00 as u8, &[0; 24]);
        let mut bmp = Bmp280::new(i2c, Address::BMP280);
        bmp.begin(&mut NoopDelay).unwrap();

        assert!(matches!(bmp.read(), Err(Error::NotReady)));
    }

    #[test]
    fn wrong_chip_id() {
        let mut i2c = device(0, 0);
        i2c.set_register(Register::ChipId as u8, 0x60);
        let mut bmp = Bmp280::new(i2c, Address::BMP280);

        assert!(matches!(bmp.begin(&mut NoopDelay), Err(Error::WrongDevice(0x60))));
    }
}
