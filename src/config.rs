//! Device configuration values and their register encodings.
//!
//! The enum discriminants are the raw bit patterns; the drivers shift them
//! into place.

/// MPU6050 digital low-pass filter configurations.
///
/// Higher settings trade response time for noise reduction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum DigitalLowPassFilter {
    /// 260 Hz accel / 256 Hz gyro bandwidth, no filtering delay
    #[default]
    Filter0 = 0,
    /// 184 Hz / 188 Hz
    Filter1 = 1,
    /// 94 Hz / 98 Hz
    Filter2 = 2,
    /// 44 Hz / 42 Hz
    Filter3 = 3,
    /// 21 Hz / 20 Hz
    Filter4 = 4,
    /// 10 Hz / 10 Hz
    Filter5 = 5,
    /// 5 Hz / 5 Hz, use only for nearly static measurements
    Filter6 = 6,
}

/// MPU6050 clock sources.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum ClockSource {
    /// Internal 8MHz oscillator
    Internal = 0,
    /// X-axis gyroscope reference, recommended for general use
    #[default]
    Xgyro = 1,
    /// Y-axis gyroscope reference
    Ygyro = 2,
    /// Z-axis gyroscope reference
    Zgyro = 3,
}

/// Bosch oversampling setting, shared by the BMP280 and BME688.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Oversampling {
    /// Measurement skipped, output reads as 0x80000
    Skip = 0,
    X1 = 1,
    X2 = 2,
    X4 = 3,
    X8 = 4,
    X16 = 5,
}

/// Bosch IIR filter setting.
///
/// Codes are shared by both chips, the nominal coefficient differs:
/// on the BMP280 `Level1..Level4` are coefficients 2, 4, 8 and 16, on the
/// BME688 they are filter sizes 1, 3, 7 and 15.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum IirFilter {
    #[default]
    Off = 0,
    Level1 = 1,
    Level2 = 2,
    Level3 = 3,
    Level4 = 4,
}

/// BMP280 inactive time between two normal-mode measurements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Standby {
    #[default]
    Ms0_5 = 0,
    Ms62_5 = 1,
    Ms125 = 2,
    Ms250 = 3,
    Ms500 = 4,
    Ms1000 = 5,
    Ms2000 = 6,
    Ms4000 = 7,
}

/// QMC5883P operating mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MagMode {
    Suspend = 0,
    #[default]
    Normal = 1,
    Single = 2,
    Continuous = 3,
}

/// QMC5883P output data rate in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MagOutputRate {
    Hz10 = 0,
    #[default]
    Hz50 = 1,
    Hz100 = 2,
    Hz200 = 3,
}

/// QMC5883P over-sampling ratio. Larger ratios lower noise and bandwidth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MagOversampling {
    X8 = 0,
    #[default]
    X4 = 1,
    X2 = 2,
    X1 = 3,
}

/// QMC5883P down-sampling ratio.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MagDownsampling {
    X1 = 0,
    #[default]
    X2 = 1,
    X4 = 2,
    X8 = 3,
}

/// QMC5883P set/reset pulse mode, used to remove the sensor's offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum SetResetMode {
    #[default]
    On = 0,
    SetOnly = 1,
    Off = 2,
}
