//! Sensor readout façade.
//!
//! Holds one handle per device, brings them up once and turns every later
//! read into a calibrated reading. Errors never escape: a device that did not
//! come up, has no fresh data, or failed a bus transaction produces the
//! all-NaN sentinel for its reading, and the next cycle tries again.

use crate::{
    driver::SensorDriver,
    units::{
        self, BaroSample, BarometricReading, EnvSample, EnvironmentalReading, InertialReading,
        MagSample, MagneticReading, MotionSample,
    },
};
use embedded_hal::delay::DelayNs;

/// Which devices passed [`SensorReadout::begin`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct SensorStatus {
    pub bmp280: bool,
    pub bme688: bool,
    pub mpu6050: bool,
    pub qmc5883p: bool,
}

impl SensorStatus {
    pub fn all_ready(&self) -> bool {
        self.bmp280 && self.bme688 && self.mpu6050 && self.qmc5883p
    }
}

/// One calibrated reading per sensor family.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Readings {
    pub barometric: BarometricReading,
    pub environmental: EnvironmentalReading,
    pub inertial: InertialReading,
    pub magnetic: MagneticReading,
}

impl Readings {
    pub const fn unavailable() -> Self {
        Self {
            barometric: BarometricReading::unavailable(),
            environmental: EnvironmentalReading::unavailable(),
            inertial: InertialReading::unavailable(),
            magnetic: MagneticReading::unavailable(),
        }
    }
}

pub struct SensorReadout<B, E, M, Q, D> {
    barometer: B,
    environment: E,
    motion: M,
    magnetometer: Q,
    delay: D,
    status: SensorStatus,
}

impl<B, E, M, Q, D> SensorReadout<B, E, M, Q, D>
where
    B: SensorDriver<Sample = BaroSample>,
    E: SensorDriver<Sample = EnvSample>,
    M: SensorDriver<Sample = MotionSample>,
    Q: SensorDriver<Sample = MagSample>,
    D: DelayNs,
{
    /// Takes ownership of the drivers. Nothing is read until
    /// [`begin`](Self::begin).
    pub fn new(barometer: B, environment: E, motion: M, magnetometer: Q, delay: D) -> Self {
        Self {
            barometer,
            environment,
            motion,
            magnetometer,
            delay,
            status: SensorStatus::default(),
        }
    }

    /// Start every device once and remember which ones answered.
    pub fn begin(&mut self) -> SensorStatus {
        self.status = SensorStatus {
            bmp280: start(&mut self.barometer, &mut self.delay, "bmp280"),
            bme688: start(&mut self.environment, &mut self.delay, "bme688"),
            mpu6050: start(&mut self.motion, &mut self.delay, "mpu6050"),
            qmc5883p: start(&mut self.magnetometer, &mut self.delay, "qmc5883p"),
        };
        self.status
    }

    pub fn status(&self) -> SensorStatus {
        self.status
    }

    pub fn read_barometer(&mut self) -> BarometricReading {
        sample(&mut self.barometer, &mut self.delay, self.status.bmp280, "bmp280")
            .map_or(BarometricReading::unavailable(), units::barometric)
    }

    pub fn read_environment(&mut self) -> EnvironmentalReading {
        sample(&mut self.environment, &mut self.delay, self.status.bme688, "bme688")
            .map_or(EnvironmentalReading::unavailable(), units::environmental)
    }

    pub fn read_motion(&mut self) -> InertialReading {
        sample(&mut self.motion, &mut self.delay, self.status.mpu6050, "mpu6050")
            .map_or(InertialReading::unavailable(), units::inertial)
    }

    /// NaN on every axis unless the magnetometer flagged a fresh sample.
    pub fn read_magnetometer(&mut self) -> MagneticReading {
        sample(
            &mut self.magnetometer,
            &mut self.delay,
            self.status.qmc5883p,
            "qmc5883p",
        )
        .map_or(MagneticReading::unavailable(), units::magnetic)
    }

    pub fn read_all(&mut self) -> Readings {
        Readings {
            barometric: self.read_barometer(),
            environmental: self.read_environment(),
            inertial: self.read_motion(),
            magnetic: self.read_magnetometer(),
        }
    }

    /// Hands the drivers and the delay back.
    pub fn release(self) -> (B, E, M, Q, D) {
        (
            self.barometer,
            self.environment,
            self.motion,
            self.magnetometer,
            self.delay,
        )
    }
}

fn start<S: SensorDriver, D: DelayNs>(driver: &mut S, delay: &mut D, name: &str) -> bool {
    match driver.begin(delay) {
        Ok(()) => {
            info!("{} ready", name);
            true
        }
        Err(_) => {
            warn!("{} not detected", name);
            false
        }
    }
}

fn sample<S: SensorDriver, D: DelayNs>(
    driver: &mut S,
    delay: &mut D,
    ready: bool,
    name: &str,
) -> Option<S::Sample> {
    if !ready {
        return None;
    }
    match driver.read(delay) {
        Ok(sample) => Some(sample),
        Err(_) => {
            debug!("{} read failed", name);
            None
        }
    }
}
