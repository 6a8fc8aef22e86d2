//! Telemetry report assembly.
//!
//! The report mirrors the document consumers parse:
//!
//! ```text
//! bmp280      { temperature_c, pressure_hpa }
//! bme688      { temperature_c, humidity_%, pressure_hpa, gas_kohm }
//! accel_g     { x, y, z }
//! gyro_dps    { x, y, z }
//! mag_uT      { x, y, z }
//! orientation { pitch, roll, yaw }
//! ```
//!
//! Values are copied as-is; NaN sentinels reach the serializer untouched and
//! their encoding is up to it.

use crate::{
    accel::AccelF32,
    gyro::GyroF32,
    magnetometer::MagF32,
    orientation::Orientation,
    readout::Readings,
    units::{BarometricReading, EnvironmentalReading},
};
use serde::Serialize;

/// Number of scalar values in a report.
pub const FIELD_COUNT: usize = 18;

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct TelemetryReport {
    pub bmp280: BarometricReading,
    pub bme688: EnvironmentalReading,
    pub accel_g: AccelF32,
    pub gyro_dps: GyroF32,
    #[serde(rename = "mag_uT")]
    pub mag_ut: MagF32,
    pub orientation: Orientation,
}

impl TelemetryReport {
    pub fn assemble(readings: &Readings, orientation: &Orientation) -> Self {
        Self {
            bmp280: readings.barometric,
            bme688: readings.environmental,
            accel_g: readings.inertial.accel,
            gyro_dps: readings.inertial.gyro,
            mag_ut: readings.magnetic.field,
            orientation: *orientation,
        }
    }

    /// Flattened `(dotted key, value)` pairs in document order, for
    /// transports without a serializer.
    pub fn fields(&self) -> [(&'static str, f32); FIELD_COUNT] {
        let [ax, ay, az] = self.accel_g.to_array();
        let [gx, gy, gz] = self.gyro_dps.to_array();
        let [mx, my, mz] = self.mag_ut.to_array();
        [
            ("bmp280.temperature_c", self.bmp280.temperature_c),
            ("bmp280.pressure_hpa", self.bmp280.pressure_hpa),
            ("bme688.temperature_c", self.bme688.temperature_c),
            ("bme688.humidity_%", self.bme688.humidity_pct),
            ("bme688.pressure_hpa", self.bme688.pressure_hpa),
            ("bme688.gas_kohm", self.bme688.gas_kohm),
            ("accel_g.x", ax),
            ("accel_g.y", ay),
            ("accel_g.z", az),
            ("gyro_dps.x", gx),
            ("gyro_dps.y", gy),
            ("gyro_dps.z", gz),
            ("mag_uT.x", mx),
            ("mag_uT.y", my),
            ("mag_uT.z", mz),
            ("orientation.pitch", self.orientation.pitch),
            ("orientation.roll", self.orientation.roll),
            ("orientation.yaw", self.orientation.yaw),
        ]
    }
}

/// Free-function form of [`TelemetryReport::assemble`].
pub fn assemble(readings: &Readings, orientation: &Orientation) -> TelemetryReport {
    TelemetryReport::assemble(readings, orientation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{InertialReading, MagneticReading};
    use serde_json::{json, Value};

    fn readings() -> Readings {
        Readings {
            barometric: BarometricReading {
                temperature_c: 21.5,
                pressure_hpa: 1013.25,
            },
            environmental: EnvironmentalReading {
                temperature_c: 22.0,
                humidity_pct: 40.5,
                pressure_hpa: 1012.5,
                gas_kohm: 55.0,
            },
            inertial: InertialReading {
                accel: AccelF32::new(0.0, 0.5, 1.0),
                gyro: GyroF32::new(-1.0, 2.0, 0.25),
            },
            magnetic: MagneticReading {
                field: MagF32::new(20.0, -4.0, 42.5),
            },
        }
    }

    const LEVEL: Orientation = Orientation {
        pitch: 1.5,
        roll: -2.0,
        yaw: 90.0,
    };

    #[test]
    fn serializes_with_document_key_names() {
        let report = assemble(&readings(), &LEVEL);
        let value = serde_json::to_value(report).unwrap();

        assert_eq!(
            value,
            json!({
                "bmp280": { "temperature_c": 21.5, "pressure_hpa": 1013.25 },
                "bme688": {
                    "temperature_c": 22.0,
                    "humidity_%": 40.5,
                    "pressure_hpa": 1012.5,
                    "gas_kohm": 55.0
                },
                "accel_g": { "x": 0.0, "y": 0.5, "z": 1.0 },
                "gyro_dps": { "x": -1.0, "y": 2.0, "z": 0.25 },
                "mag_uT": { "x": 20.0, "y": -4.0, "z": 42.5 },
                "orientation": { "pitch": 1.5, "roll": -2.0, "yaw": 90.0 }
            })
        );
    }

    #[test]
    fn sentinels_pass_through() {
        let report = assemble(&Readings::unavailable(), &Orientation::unavailable());

        assert!(report.fields().iter().all(|(_, v)| v.is_nan()));
        // serde_json has no NaN literal and writes null
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["mag_uT"]["x"], Value::Null);
        assert_eq!(value["bme688"]["humidity_%"], Value::Null);
    }

    #[test]
    fn flattened_fields_follow_document_order() {
        let fields = assemble(&readings(), &LEVEL).fields();

        assert_eq!(fields[0], ("bmp280.temperature_c", 21.5));
        assert_eq!(fields[3], ("bme688.humidity_%", 40.5));
        assert_eq!(fields[12], ("mag_uT.x", 20.0));
        assert_eq!(fields[FIELD_COUNT - 1], ("orientation.yaw", 90.0));
    }
}
