//! Magnetometer Data Processing
//!
//! The QMC5883P measures the magnetic flux density along three axes and
//! reports it as signed 16-bit counts. The count-to-field ratio depends on the
//! configured range; telemetry is reported in microtesla (1 Gauss = 100 µT).

/// Microtesla per Gauss.
pub const MICROTESLA_PER_GAUSS: f32 = 100.0;

/// Raw magnetometer readings vector, in register counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Mag {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
}

impl Mag {
    pub const fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }

    /// Converts raw sensor bytes into magnetometer values.
    ///
    /// The QMC5883P stores each axis as 2 bytes, little-endian, signed.
    pub const fn from_bytes(data: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([data[0], data[1]]),
            y: i16::from_le_bytes([data[2], data[3]]),
            z: i16::from_le_bytes([data[4], data[5]]),
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

    pub fn scaled(&self, range: MagRange) -> MagF32 {
        MagF32 {
            x: range.microtesla(self.x),
            y: range.microtesla(self.y),
            z: range.microtesla(self.z),
        }
    }
}

/// QMC5883P full-scale range. The discriminant is the RNG field of CONTROL2.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MagRange {
    G30 = 0,
    G12 = 1,
    #[default]
    G8 = 2,
    G2 = 3,
}

impl MagRange {
    /// Sensitivity in LSB per Gauss.
    pub const fn lsb_per_gauss(self) -> f32 {
        match self {
            Self::G30 => 1000.0,
            Self::G12 => 2500.0,
            Self::G8 => 3750.0,
            Self::G2 => 15000.0,
        }
    }

    pub fn gauss(self, value: i16) -> f32 {
        (value as f32) / self.lsb_per_gauss()
    }

    pub fn microtesla(self, value: i16) -> f32 {
        self.gauss(value) * MICROTESLA_PER_GAUSS
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::G30,
            1 => Self::G12,
            2 => Self::G8,
            _ => Self::G2,
        }
    }
}

/// Magnetic flux density in µT.
///
/// All axes are NaN when the magnetometer had no fresh sample.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct MagF32 {
    x: f32,
    y: f32,
    z: f32,
}

impl MagF32 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

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
    use approx::assert_relative_eq;

    #[test]
    fn little_endian_decoding() {
        let mag = Mag::from_bytes([0xA6, 0x0E, 0x5A, 0xF1, 0x00, 0x00]);
        assert_eq!(mag, Mag::new(3750, -3750, 0));
    }

    #[test]
    fn eight_gauss_range_to_microtesla() {
        let field = Mag::new(3750, -3750, 1875).scaled(MagRange::G8);
        assert_relative_eq!(field.x(), 100.0, epsilon = 1e-4);
        assert_relative_eq!(field.y(), -100.0, epsilon = 1e-4);
        assert_relative_eq!(field.z(), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn range_bits_round_trip() {
        for range in [MagRange::G30, MagRange::G12, MagRange::G8, MagRange::G2] {
            assert_eq!(MagRange::from_bits(range as u8), range);
        }
    }
}
