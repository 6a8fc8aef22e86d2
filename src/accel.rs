//! Accelerometer samples and their conversion to g.

/// Raw acceleration readings vector, in register counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Accel {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
}

impl Accel {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Decodes the MPU6050 output registers (big-endian, X then Y then Z).
    pub fn from_bytes(data: [u8; 6]) -> Self {
        Self {
            x: i16::from_be_bytes([data[0], data[1]]),
            y: i16::from_be_bytes([data[2], data[3]]),
            z: i16::from_be_bytes([data[4], data[5]]),
        }
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    pub fn scaled(&self, scale: AccelFullScale) -> AccelF32 {
        AccelF32 {
            x: scale.scale_value(self.x),
            y: scale.scale_value(self.y),
            z: scale.scale_value(self.z),
        }
    }
}

/// Accelerometer full-scale range. The discriminant is the AFS_SEL field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum AccelFullScale {
    #[default]
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl AccelFullScale {
    /// Sensitivity in LSB per g.
    pub const fn scale(self) -> f32 {
        match self {
            Self::G2 => 16384.0,
            Self::G4 => 8192.0,
            Self::G8 => 4096.0,
            Self::G16 => 2048.0,
        }
    }

    pub fn scale_value(self, value: i16) -> f32 {
        (value as f32) / self.scale()
    }
}

/// Linear acceleration in g.
///
/// All three axes are NaN when the sample could not be read.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct AccelF32 {
    x: f32,
    y: f32,
    z: f32,
}

impl AccelF32 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Sentinel for a sample that could not be read.
    pub const fn unavailable() -> Self {
        Self::new(f32::NAN, f32::NAN, f32::NAN)
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_valid(&self) -> bool {
        !(self.x.is_nan() || self.y.is_nan() || self.z.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_g_range_divides_by_16384() {
        for raw in [i16::MIN, -16384, -1, 0, 1, 8192, 16384, i16::MAX] {
            let scaled = Accel::new(raw, raw, raw).scaled(AccelFullScale::G2);
            assert_eq!(scaled.x(), raw as f32 / 16384.0);
            assert_eq!(scaled.y(), raw as f32 / 16384.0);
            assert_eq!(scaled.z(), raw as f32 / 16384.0);
        }
    }

    #[test]
    fn decodes_big_endian_registers() {
        let accel = Accel::from_bytes([0x40, 0x00, 0xC0, 0x00, 0x00, 0x01]);
        assert_eq!(accel, Accel::new(16384, -16384, 1));
    }

    #[test]
    fn sentinel_is_invalid() {
        assert!(!AccelF32::unavailable().is_valid());
        assert!(AccelF32::new(0.0, 0.0, 1.0).is_valid());
    }
}
