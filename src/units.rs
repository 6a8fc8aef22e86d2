//! Conversion of bus-native samples into physical units.
//!
//! | family        | raw                       | calibrated        |
//! |---------------|---------------------------|-------------------|
//! | barometric    | °C, Pa                    | °C, hPa           |
//! | environmental | °C, %RH, Pa, Ω            | °C, %RH, hPa, kΩ  |
//! | motion        | counts (±2 g / ±250 °/s)  | g, °/s            |
//! | magnetic      | counts (range dependent)  | µT                |
//!
//! Conversion is pure arithmetic. Out-of-range raw values are passed through
//! unclamped; validating them is the driver's business.

use crate::accel::{Accel, AccelF32, AccelFullScale};
use crate::gyro::{Gyro, GyroF32, GyroFullScale};
use crate::magnetometer::{Mag, MagF32, MagRange};

/// Pascal per hectopascal.
pub const PA_PER_HPA: f32 = 100.0;
/// Ohm per kiloohm.
pub const OHM_PER_KOHM: f32 = 1000.0;

/// Compensated BMP280 output.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct BaroSample {
    pub temperature_c: f32,
    pub pressure_pa: f32,
}

/// Compensated BME688 output.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct EnvSample {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_pa: f32,
    pub gas_ohm: f32,
}

/// One MPU6050 read, with the full-scale ranges the device was running at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MotionSample {
    pub accel: Accel,
    pub gyro: Gyro,
    pub accel_scale: AccelFullScale,
    pub gyro_scale: GyroFullScale,
}

impl MotionSample {
    /// Sample taken at the default ±2 g / ±250 °/s ranges.
    pub const fn new(accel: Accel, gyro: Gyro) -> Self {
        Self {
            accel,
            gyro,
            accel_scale: AccelFullScale::G2,
            gyro_scale: GyroFullScale::Deg250,
        }
    }
}

/// One QMC5883P read and the range it was taken at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MagSample {
    pub mag: Mag,
    pub range: MagRange,
}

/// Bus-native values for one sensor at one instant, tagged by sensor family.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum RawSample {
    Barometric(BaroSample),
    Environmental(EnvSample),
    Motion(MotionSample),
    Magnetic(MagSample),
}

/// BMP280 reading.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct BarometricReading {
    pub temperature_c: f32,
    pub pressure_hpa: f32,
}

impl BarometricReading {
    pub const fn unavailable() -> Self {
        Self {
            temperature_c: f32::NAN,
            pressure_hpa: f32::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        !(self.temperature_c.is_nan() || self.pressure_hpa.is_nan())
    }
}

/// BME688 reading.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct EnvironmentalReading {
    pub temperature_c: f32,
    #[serde(rename = "humidity_%")]
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
    pub gas_kohm: f32,
}

impl EnvironmentalReading {
    pub const fn unavailable() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            pressure_hpa: f32::NAN,
            gas_kohm: f32::NAN,
        }
    }

    pub fn is_valid(&self) -> bool {
        !(self.temperature_c.is_nan()
            || self.humidity_pct.is_nan()
            || self.pressure_hpa.is_nan()
            || self.gas_kohm.is_nan())
    }
}

/// MPU6050 reading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct InertialReading {
    pub accel: AccelF32,
    pub gyro: GyroF32,
}

impl InertialReading {
    pub const fn unavailable() -> Self {
        Self {
            accel: AccelF32::unavailable(),
            gyro: GyroF32::unavailable(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.accel.is_valid() && self.gyro.is_valid()
    }
}

/// QMC5883P reading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MagneticReading {
    pub field: MagF32,
}

impl MagneticReading {
    pub const fn unavailable() -> Self {
        Self {
            field: MagF32::unavailable(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.field.is_valid()
    }
}

/// Physical-unit record for one sensor family.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum CalibratedReading {
    Barometric(BarometricReading),
    Environmental(EnvironmentalReading),
    Inertial(InertialReading),
    Magnetic(MagneticReading),
}

/// Converts any raw sample into its calibrated reading.
pub fn convert(raw: RawSample) -> CalibratedReading {
    match raw {
        RawSample::Barometric(sample) => CalibratedReading::Barometric(barometric(sample)),
        RawSample::Environmental(sample) => {
            CalibratedReading::Environmental(environmental(sample))
        }
        RawSample::Motion(sample) => CalibratedReading::Inertial(inertial(sample)),
        RawSample::Magnetic(sample) => CalibratedReading::Magnetic(magnetic(sample)),
    }
}

pub fn barometric(sample: BaroSample) -> BarometricReading {
    BarometricReading {
        temperature_c: sample.temperature_c,
        pressure_hpa: pascal_to_hectopascal(sample.pressure_pa),
    }
}

pub fn environmental(sample: EnvSample) -> EnvironmentalReading {
    EnvironmentalReading {
        temperature_c: sample.temperature_c,
        humidity_pct: sample.humidity_pct,
        pressure_hpa: pascal_to_hectopascal(sample.pressure_pa),
        gas_kohm: ohm_to_kiloohm(sample.gas_ohm),
    }
}

pub fn inertial(sample: MotionSample) -> InertialReading {
    InertialReading {
        accel: sample.accel.scaled(sample.accel_scale),
        gyro: sample.gyro.scaled(sample.gyro_scale),
    }
}

pub fn magnetic(sample: MagSample) -> MagneticReading {
    MagneticReading {
        field: sample.mag.scaled(sample.range),
    }
}

pub fn pascal_to_hectopascal(pa: f32) -> f32 {
    pa / PA_PER_HPA
}

pub fn ohm_to_kiloohm(ohm: f32) -> f32 {
    ohm / OHM_PER_KOHM
}
