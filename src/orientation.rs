//! Complementary-filter attitude estimation.
//!
//! Pitch and roll blend the integrated gyroscope rate (smooth, drifts) with
//! the tilt seen by the accelerometer (drift free, disturbed by linear
//! acceleration):
//!
//! ```text
//! pitch = α·(pitch_prev + gx·dt·π/180) + (1 − α)·atan2(−ax, √(ay² + az²))
//! roll  = α·(roll_prev  + gy·dt·π/180) + (1 − α)·atan2(ay, az)
//! ```
//!
//! Angles are in radians, gyro rates in °/s. Yaw is the tilt-compensated
//! magnetometer heading, computed from the freshly blended pitch and roll. It is not integrated or smoothed, so it carries the
//! full magnetometer noise.

use crate::units::{InertialReading, MagneticReading};

/// Weight of the gyro path in the blend.
pub const DEFAULT_ALPHA: f32 = 0.98;

/// Running pitch and roll in radians.
///
/// Owned by whoever drives the update loop; a fresh state starts level.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct FilterState {
    pitch: f32,
    roll: f32,
}

impl FilterState {
    pub const fn new(pitch: f32, roll: f32) -> Self {
        Self { pitch, roll }
    }

    /// Pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Roll in radians.
    pub fn roll(&self) -> f32 {
        self.roll
    }
}

/// Attitude in degrees.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl Orientation {
    pub const fn unavailable() -> Self {
        Self {
            pitch: f32::NAN,
            roll: f32::NAN,
            yaw: f32::NAN,
        }
    }

    /// Whether the magnetometer contributed a heading.
    pub fn has_heading(&self) -> bool {
        !self.yaw.is_nan()
    }

    pub fn is_valid(&self) -> bool {
        !(self.pitch.is_nan() || self.roll.is_nan() || self.yaw.is_nan())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ComplementaryFilter {
    alpha: f32,
}

impl Default for ComplementaryFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplementaryFilter {
    pub const fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Filter with a custom gyro weight, clamped to `0.0..=1.0`.
    pub fn with_alpha(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Advance `state` by one step.
    ///
    /// `accel` is in g, `gyro` in °/s, `mag` in any consistent unit and `dt`
    /// in seconds. A non-positive (or NaN) `dt` skips the gyro integration;
    /// the accelerometer blend still runs. Any NaN magnetometer axis yields a
    /// NaN yaw without affecting pitch and roll.
    pub fn update(
        &self,
        state: &mut FilterState,
        accel: [f32; 3],
        gyro: [f32; 3],
        mag: [f32; 3],
        dt: f32,
    ) -> Orientation {
        let [ax, ay, az] = accel;
        let [gx, gy, _] = gyro;

        let pitch_acc = libm::atan2f(-ax, libm::sqrtf(ay * ay + az * az));
        let roll_acc = libm::atan2f(ay, az);

        let (pitch_gyro, roll_gyro) = if dt > 0.0 {
            (
                state.pitch + (gx * dt).to_radians(),
                state.roll + (gy * dt).to_radians(),
            )
        } else {
            (state.pitch, state.roll)
        };

        let alpha = self.alpha;
        state.pitch = alpha * pitch_gyro + (1.0 - alpha) * pitch_acc;
        state.roll = alpha * roll_gyro + (1.0 - alpha) * roll_acc;

        Orientation {
            pitch: state.pitch.to_degrees(),
            roll: state.roll.to_degrees(),
            yaw: heading(mag, state.pitch, state.roll),
        }
    }

    /// [`update`](Self::update) fed from calibrated readings.
    pub fn update_readings(
        &self,
        state: &mut FilterState,
        inertial: &InertialReading,
        magnetic: &MagneticReading,
        dt: f32,
    ) -> Orientation {
        self.update(
            state,
            inertial.accel.to_array(),
            inertial.gyro.to_array(),
            magnetic.field.to_array(),
            dt,
        )
    }
}

/// Tilt-compensated heading in degrees; pitch and roll in radians.
fn heading(mag: [f32; 3], pitch: f32, roll: f32) -> f32 {
    if mag.iter().any(|m| m.is_nan()) {
        return f32::NAN;
    }
    let [mx, my, mz] = mag;
    let (sin_p, cos_p) = (libm::sinf(pitch), libm::cosf(pitch));
    let (sin_r, cos_r) = (libm::sinf(roll), libm::cosf(roll));

    let xh = mx * cos_p + mz * sin_p;
    let yh = mx * sin_r * sin_p + my * cos_r - mz * sin_r * cos_p;
    libm::atan2f(-yh, xh).to_degrees()
}

/// One step with the default blend weight.
pub fn update(
    state: &mut FilterState,
    accel: [f32; 3],
    gyro: [f32; 3],
    mag: [f32; 3],
    dt: f32,
) -> Orientation {
    ComplementaryFilter::new().update(state, accel, gyro, mag, dt)
}
