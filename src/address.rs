//! I2C addresses of the supported devices.
//!
//! All devices share one bus, so every driver is constructed with an explicit
//! address. The constants below are the strap settings used on the reference
//! board; the `_ALT` variants are the other strap option of the same chip.

/// Represents a 7-bit I2C device address.
///
/// Note: Some I2C implementations may require left-shifting by 1 to create
/// the 8-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Address(pub u8);

impl Address {
    /// MPU6050 with AD0 low
    pub const MPU6050: Self = Self(0x68);
    /// MPU6050 with AD0 high
    pub const MPU6050_ALT: Self = Self(0x69);
    /// QMC5883P (fixed address)
    pub const QMC5883P: Self = Self(0x2C);
    /// BMP280 with SDO high
    pub const BMP280: Self = Self(0x77);
    /// BMP280 with SDO low
    pub const BMP280_ALT: Self = Self(0x76);
    /// BME688 with SDO low
    pub const BME688: Self = Self(0x76);
    /// BME688 with SDO high
    pub const BME688_ALT: Self = Self(0x77);
}

impl From<Address> for u8 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl From<u8> for Address {
    fn from(addr: u8) -> Self {
        Self(addr)
    }
}
