//! BME688 gas, humidity, pressure and temperature sensor driver.
//!
//! The sensor is run in forced mode: every [`Bme688::perform_reading`]
//! triggers one TPHG cycle with heater profile 0, waits for it to finish and
//! compensates the result using the Bosch floating-point formulas.

use crate::{
    address::Address,
    config::{IirFilter, Oversampling},
    error::Error,
    registers::Bme688Register as Register,
    units::EnvSample,
};
use embedded_hal::{delay::DelayNs, i2c::I2c};

/// Expected content of the chip identifier register.
pub const CHIP_ID: u8 = 0x61;

const SOFT_RESET_COMMAND: u8 = 0xB6;
const MODE_FORCED: u8 = 0b01;
const RUN_GAS: u8 = 1 << 5;

const NEW_DATA: u8 = 1 << 7;
const GAS_VALID: u8 = 1 << 5;
const HEAT_STABLE: u8 = 1 << 4;
const GAS_RANGE: u8 = 0x0F;

const COEFF1_LEN: usize = 23;
const COEFF2_LEN: usize = 14;
const COEFF3_LEN: usize = 5;
const COEFF_LEN: usize = COEFF1_LEN + COEFF2_LEN + COEFF3_LEN;
const FIELD_LEN: usize = 17;

const MAX_HEATER_TEMP: u16 = 400;
const POLL_ATTEMPTS: u8 = 10;
const POLL_INTERVAL_MS: u32 = 5;

/// Startup configuration applied by [`Bme688::begin`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Bme688Config {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    pub humidity: Oversampling,
    pub filter: IirFilter,
    /// Heater target in °C, capped at 400.
    pub heater_temp: u16,
    /// Heater-on time in ms.
    pub heater_duration: u16,
    /// Ambient temperature assumed when computing the heater set point.
    pub ambient_temp: i8,
}

impl Default for Bme688Config {
    fn default() -> Self {
        Self {
            temperature: Oversampling::X8,
            pressure: Oversampling::X4,
            humidity: Oversampling::X2,
            filter: IirFilter::Level2,
            heater_temp: 320,
            heater_duration: 150,
            ambient_temp: 25,
        }
    }
}

/// Factory trimming parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i8,
    pub p1: u16,
    pub p2: i16,
    pub p3: i8,
    pub p4: i16,
    pub p5: i16,
    pub p6: i8,
    pub p7: i8,
    pub p8: i16,
    pub p9: i16,
    pub p10: u8,
    pub h1: u16,
    pub h2: u16,
    pub h3: i8,
    pub h4: i8,
    pub h5: i8,
    pub h6: u8,
    pub h7: i8,
    pub gh1: i8,
    pub gh2: i16,
    pub gh3: i8,
    pub res_heat_val: i8,
    pub res_heat_range: u8,
}

impl Calibration {
    /// Parses the three trimming blocks (0x8A, 0xE1, 0x00) concatenated in
    /// that order.
    pub fn from_bytes(c: &[u8; COEFF_LEN]) -> Self {
        let u16le = |i: usize| u16::from_le_bytes([c[i], c[i + 1]]);
        let i16le = |i: usize| i16::from_le_bytes([c[i], c[i + 1]]);
        Self {
            t2: i16le(0),
            t3: c[2] as i8,
            p1: u16le(4),
            p2: i16le(6),
            p3: c[8] as i8,
            p4: i16le(10),
            p5: i16le(12),
            p7: c[14] as i8,
            p6: c[15] as i8,
            p8: i16le(18),
            p9: i16le(20),
            p10: c[22],
            h2: (c[23] as u16) << 4 | (c[24] as u16) >> 4,
            h1: (c[25] as u16) << 4 | (c[24] as u16) & 0x0F,
            h3: c[26] as i8,
            h4: c[27] as i8,
            h5: c[28] as i8,
            h6: c[29],
            h7: c[30] as i8,
            t1: u16le(31),
            gh2: i16le(33),
            gh1: c[35] as i8,
            gh3: c[36] as i8,
            res_heat_val: c[37] as i8,
            res_heat_range: (c[39] & 0x30) >> 4,
        }
    }

    /// Returns (temperature in °C, t_fine).
    pub fn compensate_temperature(&self, adc: u32) -> (f32, f32) {
        let adc = adc as f32;
        let t1 = self.t1 as f32;
        let var1 = (adc / 16384.0 - t1 / 1024.0) * self.t2 as f32;
        let delta = adc / 131072.0 - t1 / 8192.0;
        let var2 = delta * delta * (self.t3 as f32 * 16.0);
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Pressure in Pa, NaN when the trimming table is blank.
    pub fn compensate_pressure(&self, adc: u32, t_fine: f32) -> f32 {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * (self.p6 as f32 / 131072.0);
        var2 += var1 * self.p5 as f32 * 2.0;
        var2 = var2 / 4.0 + self.p4 as f32 * 65536.0;
        var1 = (self.p3 as f32 * var1 * var1 / 16384.0 + self.p2 as f32 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.p1 as f32;
        if var1 == 0.0 {
            return f32::NAN;
        }
        let mut p = 1048576.0 - adc as f32;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        let var1 = self.p9 as f32 * p * p / 2147483648.0;
        let var2 = p * (self.p8 as f32 / 32768.0);
        let scaled = p / 256.0;
        let var3 = scaled * scaled * scaled * (self.p10 as f32 / 131072.0);
        p + (var1 + var2 + var3 + self.p7 as f32 * 128.0) / 16.0
    }

    /// Relative humidity in %, clamped to 0..=100.
    pub fn compensate_humidity(&self, adc: u16, t_fine: f32) -> f32 {
        let temp = t_fine / 5120.0;
        let var1 = adc as f32 - (self.h1 as f32 * 16.0 + self.h3 as f32 / 2.0 * temp);
        let var2 = var1
            * (self.h2 as f32 / 262144.0
                * (1.0
                    + self.h4 as f32 / 16384.0 * temp
                    + self.h5 as f32 / 1048576.0 * temp * temp));
        let var3 = self.h6 as f32 / 16384.0;
        let var4 = self.h7 as f32 / 2097152.0;
        let humidity = var2 + (var3 + var4 * temp) * var2 * var2;
        humidity.clamp(0.0, 100.0)
    }

    /// Heater resistance set point for `target` °C at `ambient` °C.
    pub fn heater_resistance(&self, target: u16, ambient: i8) -> u8 {
        let target = target.min(MAX_HEATER_TEMP) as f32;
        let var1 = self.gh1 as f32 / 16.0 + 49.0;
        let var2 = self.gh2 as f32 / 32768.0 * 0.0005 + 0.00235;
        let var3 = self.gh3 as f32 / 1024.0;
        let var4 = var1 * (1.0 + var2 * target);
        let var5 = var4 + var3 * ambient as f32;
        let res = 3.4
            * (var5
                * (4.0 / (4.0 + self.res_heat_range as f32))
                * (1.0 / (1.0 + self.res_heat_val as f32 * 0.002))
                - 25.0);
        res as u8
    }
}

/// Gas resistance in Ω from the 10-bit ADC value and its range.
pub fn gas_resistance(adc: u16, range: u8) -> f32 {
    let var1 = (262144u32 >> range) as f32;
    let var2 = 4096.0 + 3.0 * (adc as f32 - 512.0);
    1_000_000.0 * var1 / var2
}

/// Encodes a heater duration in ms into the gas_wait register format
/// (6-bit value, 2-bit multiplier of 1, 4, 16 or 64).
pub fn gas_wait(duration_ms: u16) -> u8 {
    if duration_ms >= 0xFC0 {
        return 0xFF;
    }
    let mut duration = duration_ms;
    let mut factor = 0u8;
    while duration > 0x3F {
        duration /= 4;
        factor += 1;
    }
    duration as u8 + factor * 64
}

const fn measurement_cycles(os: Oversampling) -> u32 {
    match os {
        Oversampling::Skip => 0,
        Oversampling::X1 => 1,
        Oversampling::X2 => 2,
        Oversampling::X4 => 4,
        Oversampling::X8 => 8,
        Oversampling::X16 => 16,
    }
}

pub struct Bme688<I>
where
    I: I2c,
{
    i2c: I,
    address: u8,
    config: Bme688Config,
    calibration: Calibration,
}

impl<I> Bme688<I>
where
    I: I2c,
{
    pub fn new(i2c: I, address: Address) -> Self {
        Self::with_config(i2c, address, Bme688Config::default())
    }

    pub fn with_config(i2c: I, address: Address, config: Bme688Config) -> Self {
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

    pub fn config(&self) -> &Bme688Config {
        &self.config
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Check the chip identifier, reset, load the trimming blocks and program
    /// oversampling, filter and heater profile 0.
    pub fn begin(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<I>> {
        let id = self.read_register(Register::ChipId)?;
        if id != CHIP_ID {
            return Err(Error::WrongDevice(id));
        }
        self.write_register(Register::SoftReset, SOFT_RESET_COMMAND)?;
        delay.delay_ms(10);

        let mut coeff = [0; COEFF_LEN];
        let (coeff1, rest) = coeff.split_at_mut(COEFF1_LEN);
        let (coeff2, coeff3) = rest.split_at_mut(COEFF2_LEN);
        self.read_registers(Register::Coeff1, coeff1)?;
        self.read_registers(Register::Coeff2, coeff2)?;
        self.read_registers(Register::Coeff3, coeff3)?;
        self.calibration = Calibration::from_bytes(&coeff);

        let config = self.config;
        self.write_register(Register::CtrlHum, config.humidity as u8)?;
        self.write_register(Register::Config, (config.filter as u8) << 2)?;
        self.set_heater_profile(config.heater_temp, config.heater_duration)
    }

    /// Program heater set point 0 and enable gas conversions.
    pub fn set_heater_profile(&mut self, temp: u16, duration_ms: u16) -> Result<(), Error<I>> {
        let resistance = self
            .calibration
            .heater_resistance(temp, self.config.ambient_temp);
        self.write_register(Register::ResHeat0, resistance)?;
        self.write_register(Register::GasWait0, gas_wait(duration_ms))?;
        self.write_register(Register::CtrlGas1, RUN_GAS)?;
        self.config.heater_temp = temp;
        self.config.heater_duration = duration_ms;
        Ok(())
    }

    /// Expected duration of one forced-mode TPHG cycle in µs, heater included.
    pub fn measurement_duration_us(&self) -> u32 {
        let cycles = measurement_cycles(self.config.temperature)
            + measurement_cycles(self.config.pressure)
            + measurement_cycles(self.config.humidity);
        // conversion time, TPH switching, gas measurement, wake up
        let tph = cycles * 1963 + 477 * 4 + 477 * 5 + 1000;
        tph + self.config.heater_duration as u32 * 1000
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

    /// Run one forced-mode measurement.
    ///
    /// Fails with [`Error::NotReady`] if the new-data flag never appears or
    /// the pressure cannot be compensated.
    ///
    /// Gas resistance is 0 Ω when the heater did not stabilise or the gas
    /// conversion is flagged invalid.
    pub fn perform_reading(&mut self, delay: &mut impl DelayNs) -> Result<EnvSample, Error<I>> {
        let config = self.config;
        self.write_register(
            Register::CtrlMeas,
            (config.temperature as u8) << 5 | (config.pressure as u8) << 2 | MODE_FORCED,
        )?;
        delay.delay_us(self.measurement_duration_us());

        let mut field = [0; FIELD_LEN];
        for _ in 0..POLL_ATTEMPTS {
            self.read_registers(Register::Field0, &mut field)?;
            if field[0] & NEW_DATA != 0 {
                let sample = self.compensate(&field);
                if sample.pressure_pa.is_nan() {
                    return Err(Error::NotReady);
                }
                return Ok(sample);
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }
        Err(Error::NotReady)
    }

    fn compensate(&self, field: &[u8; FIELD_LEN]) -> EnvSample {
        let adc_pres = (field[2] as u32) << 12 | (field[3] as u32) << 4 | (field[4] as u32) >> 4;
        let adc_temp = (field[5] as u32) << 12 | (field[6] as u32) << 4 | (field[7] as u32) >> 4;
        let adc_hum = (field[8] as u16) << 8 | field[9] as u16;
        let adc_gas = (field[15] as u16) << 2 | (field[16] as u16) >> 6;
        let gas_range = field[16] & GAS_RANGE;

        let cal = &self.calibration;
        let (temperature, t_fine) = cal.compensate_temperature(adc_temp);
        let gas_flags = GAS_VALID | HEAT_STABLE;
        let gas_ohm = if field[16] & gas_flags == gas_flags {
            gas_resistance(adc_gas, gas_range)
        } else {
            debug!("bme688: gas conversion invalid or heater unstable");
            0.0
        };
        EnvSample {
            temperature_c: temperature,
            humidity_pct: cal.compensate_humidity(adc_hum, t_fine),
            pressure_pa: cal.compensate_pressure(adc_pres, t_fine),
            gas_ohm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockI2c, NoopDelay};
    use approx::assert_relative_eq;

    const TRIM: Calibration = Calibration {
        t1: 26191,
        t2: 26286,
        t3: 3,
        p1: 36477,
        p2: -10429,
        p3: 88,
        p4: 7364,
        p5: -99,
        p6: 30,
        p7: 18,
        p8: -3230,
        p9: -4047,
        p10: 30,
        h1: 727,
        h2: 1040,
        h3: 0,
        h4: 45,
        h5: 20,
        h6: 120,
        h7: -100,
        gh1: -41,
        gh2: -12563,
        gh3: 18,
        res_heat_val: 42,
        res_heat_range: 1,
    };

    fn trim_bytes(c: &Calibration) -> [u8; COEFF_LEN] {
        let mut b = [0; COEFF_LEN];
        b[0..2].copy_from_slice(&c.t2.to_le_bytes());
        b[2] = c.t3 as u8;
        b[4..6].copy_from_slice(&c.p1.to_le_bytes());
        b[6..8].copy_from_slice(&c.p2.to_le_bytes());
        b[8] = c.p3 as u8;
        b[10..12].copy_from_slice(&c.p4.to_le_bytes());
        b[12..14].copy_from_slice(&c.p5.to_le_bytes());
        b[14] = c.p7 as u8;
        b[15] = c.p6 as u8;
        b[18..20].copy_from_slice(&c.p8.to_le_bytes());
        b[20..22].copy_from_slice(&c.p9.to_le_bytes());
        b[22] = c.p10;
        b[23] = (c.h2 >> 4) as u8;
        b[24] = ((c.h2 & 0x0F) << 4) as u8 | (c.h1 & 0x0F) as u8;
        b[25] = (c.h1 >> 4) as u8;
        b[26] = c.h3 as u8;
        b[27] = c.h4 as u8;
        b[28] = c.h5 as u8;
        b[29] = c.h6;
        b[30] = c.h7 as u8;
        b[31..33].copy_from_slice(&c.t1.to_le_bytes());
        b[33..35].copy_from_slice(&c.gh2.to_le_bytes());
        b[35] = c.gh1 as u8;
        b[36] = c.gh3 as u8;
        b[37] = c.res_heat_val as u8;
        b[39] = c.res_heat_range << 4;
        b
    }

    fn field(adc_pres: u32, adc_temp: u32, adc_hum: u16, adc_gas: u16, gas_flags: u8) -> [u8; FIELD_LEN] {
        let mut f = [0; FIELD_LEN];
        f[0] = NEW_DATA;
        f[2] = (adc_pres >> 12) as u8;
        f[3] = (adc_pres >> 4) as u8;
        f[4] = ((adc_pres & 0x0F) << 4) as u8;
        f[5] = (adc_temp >> 12) as u8;
        f[6] = (adc_temp >> 4) as u8;
        f[7] = ((adc_temp & 0x0F) << 4) as u8;
        f[8..10].copy_from_slice(&adc_hum.to_be_bytes());
        f[15] = (adc_gas >> 2) as u8;
        f[16] = ((adc_gas & 0x03) << 6) as u8 | gas_flags;
        f
    }

    fn device(field: [u8; FIELD_LEN]) -> MockI2c {
        device_with(&TRIM, field)
    }

    fn device_with(calibration: &Calibration, field: [u8; FIELD_LEN]) -> MockI2c {
        let trim = trim_bytes(calibration);
        let mut i2c = MockI2c::new(0x76);
        i2c.set_register(Register::ChipId as u8, CHIP_ID);
        i2c.set_registers(Register::Coeff1 as u8, &trim[..COEFF1_LEN]);
        i2c.set_registers(
            Register::Coeff2 as u8,
            &trim[COEFF1_LEN..COEFF1_LEN + COEFF2_LEN],
        );
        i2c.set_registers(Register::Coeff3 as u8, &trim[COEFF1_LEN + COEFF2_LEN..]);
        i2c.set_registers(Register::Field0 as u8, &field);
        i2c
    }

    #[test]
    fn trimming_blocks_are_reassembled() {
        assert_eq!(Calibration::from_bytes(&trim_bytes(&TRIM)), TRIM);
    }

    #[test]
    fn compensation_formulas() {
        let (temperature, t_fine) = TRIM.compensate_temperature(495000);
        assert_relative_eq!(temperature, 23.8005, epsilon = 0.01);
        assert_relative_eq!(TRIM.compensate_pressure(380000, t_fine), 93415.4, epsilon = 2.0);
        assert_relative_eq!(TRIM.compensate_humidity(22000, t_fine), 56.394, epsilon = 0.01);
        assert_eq!(TRIM.compensate_humidity(u16::MAX, t_fine), 100.0);
        assert_eq!(TRIM.compensate_humidity(0, t_fine), 0.0);
    }

    #[test]
    fn heater_set_point_and_wait_encoding() {
        assert_eq!(TRIM.heater_resistance(320, 25), 113);
        assert_eq!(TRIM.heater_resistance(1000, 25), TRIM.heater_resistance(400, 25));
        assert_eq!(gas_wait(150), 0x65);
        assert_eq!(gas_wait(63), 63);
        assert_eq!(gas_wait(5000), 0xFF);
    }

    #[test]
    fn gas_resistance_ranges() {
        assert_eq!(gas_resistance(512, 0), 64_000_000.0);
        assert_eq!(gas_resistance(512, 5), 2_000_000.0);
    }

    #[test]
    fn begin_programs_heater_profile() {
        let mut bme = Bme688::new(device([0; FIELD_LEN]), Address::BME688);
        bme.begin(&mut NoopDelay).unwrap();
        assert_eq!(*bme.calibration(), TRIM);

        let i2c = bme.release();
        assert_eq!(i2c.writes_to(Register::SoftReset as u8), [SOFT_RESET_COMMAND]);
        assert_eq!(i2c.register(Register::CtrlHum as u8), Oversampling::X2 as u8);
        assert_eq!(i2c.register(Register::Config as u8), 2 << 2);
        assert_eq!(i2c.register(Register::ResHeat0 as u8), 113);
        assert_eq!(i2c.register(Register::GasWait0 as u8), 0x65);
        assert_eq!(i2c.register(Register::CtrlGas1 as u8), RUN_GAS);
    }

    #[test]
    fn forced_reading_is_compensated() {
        let data = field(380000, 495000, 22000, 512, GAS_VALID | HEAT_STABLE | 5);
        let mut bme = Bme688::new(device(data), Address::BME688);
        bme.begin(&mut NoopDelay).unwrap();
        let sample = bme.perform_reading(&mut NoopDelay).unwrap();

        assert_relative_eq!(sample.temperature_c, 23.8005, epsilon = 0.01);
        assert_relative_eq!(sample.pressure_pa, 93415.4, epsilon = 2.0);
        assert_relative_eq!(sample.humidity_pct, 56.394, epsilon = 0.01);
        assert_eq!(sample.gas_ohm, 2_000_000.0);
        // x8 temperature, x4 pressure, forced mode
        assert_eq!(
            bme.release().writes_to(Register::CtrlMeas as u8),
            [0b1000_1101]
        );
    }

    #[test]
    fn unstable_heater_reports_zero_gas() {
        let data = field(380000, 495000, 22000, 512, GAS_VALID | 5);
        let mut bme = Bme688::new(device(data), Address::BME688);
        bme.begin(&mut NoopDelay).unwrap();
        let sample = bme.perform_reading(&mut NoopDelay).unwrap();

        assert_eq!(sample.gas_ohm, 0.0);
        assert!(!sample.temperature_c.is_nan());
    }

    #[test]
    fn missing_new_data_flag_is_not_ready() {
        let mut data = field(380000, 495000, 22000, 512, GAS_VALID | HEAT_STABLE);
        data[0] = 0;
        let mut bme = Bme688::new(device(data), Address::BME688);
        bme.begin(&mut NoopDelay).unwrap();

        assert!(matches!(
            bme.perform_reading(&mut NoopDelay),
            Err(Error::NotReady)
        ));
    }

    #[test]
    fn blank_trimming_table_is_not_ready() {
        assert!(Calibration::default().compensate_pressure(380000, 0.0).is_nan());

        let data = field(380000, 495000, 22000, 512, GAS_VALID | HEAT_STABLE | 5);
        let mut bme = Bme688::new(device_with(&Calibration::default(), data), Address::BME688);
        bme.begin(&mut NoopDelay).unwrap();

        assert!(matches!(
            bme.perform_reading(&mut NoopDelay),
            Err(Error::NotReady)
        ));
    }

    #[test]
    fn measurement_duration_includes_heater() {
        let bme = Bme688::new(MockI2c::new(0x76), Address::BME688);
        // 14 conversion cycles, fixed overhead and 150 ms heater
        assert_eq!(bme.measurement_duration_us(), 14 * 1963 + 5293 + 150_000);
    }
}
