//! Register maps of the supported devices.
//!
//! Only the registers the drivers actually touch are listed. Multi-byte
//! blocks are named after their first register; the drivers rely on the
//! devices' address auto-increment to read the rest.

/// MPU6050 registers.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Mpu6050Register {
    /// Sample Rate Divider register (0x19)
    /// Sets the sample rate by dividing the gyroscope output
    SmpRtDiv = 0x19,

    /// Configuration register (0x1A)
    /// Controls the digital low pass filter and external sync
    Config = 0x1A,

    /// Gyroscope Configuration register (0x1B)
    /// Controls full-scale range
    GyroConfig = 0x1B,

    /// Accelerometer Configuration register (0x1C)
    /// Controls full-scale range and high pass filter
    AccelConfig = 0x1C,

    /// Interrupt Status register (0x3A)
    /// Bit 0 is set when a new set of sensor registers is available
    IntStatus = 0x3A,

    /// High byte of X-axis acceleration, start of the 14 byte motion block
    /// (accel, temperature, gyro)
    AccelX_H = 0x3B,

    /// High byte of X-axis angular rate
    GyroX_H = 0x43,

    /// Power Management 1 register (0x6B)
    /// Controls device power state, clock source, and reset
    PwrMgmt1 = 0x6B,

    /// Identity register, reads 0x68 regardless of the AD0 strap
    WhoAmI = 0x75,
}

/// QMC5883P registers.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Qmc5883pRegister {
    /// Chip identifier, reads 0x80
    ChipId = 0x00,
    /// X LSB, start of the 6 byte little-endian output block
    XoutL = 0x01,
    /// Bit 0: data ready, bit 1: overflow
    Status = 0x09,
    /// Mode, output data rate, over- and down-sampling
    Control1 = 0x0A,
    /// Set/reset mode, range, self test, soft reset
    Control2 = 0x0B,
}

/// BMP280 registers.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Bmp280Register {
    /// dig_T1, start of the 24 byte trimming table
    Calib00 = 0x88,
    /// Chip identifier, reads 0x58
    ChipId = 0xD0,
    /// Write 0xB6 for a power-on reset
    Reset = 0xE0,
    /// Bit 3: measuring, bit 0: NVM copy in progress
    Status = 0xF3,
    /// Temperature/pressure oversampling and power mode
    CtrlMeas = 0xF4,
    /// Standby time and IIR filter
    Config = 0xF5,
    /// Pressure MSB, start of the 6 byte data block (pressure, temperature)
    PressMsb = 0xF7,
}

/// BME688 registers (I2C addressing, no SPI page switching).
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Bme688Register {
    /// Third trimming block (heater range/value, switching error), 5 bytes
    Coeff3 = 0x00,
    /// Measurement status of field 0, start of the 17 byte data block
    Field0 = 0x1D,
    /// Heater resistance set point 0
    ResHeat0 = 0x5A,
    /// Heater duration set point 0
    GasWait0 = 0x64,
    /// Gas run control and heater profile index
    CtrlGas1 = 0x71,
    /// Humidity oversampling
    CtrlHum = 0x72,
    /// Temperature/pressure oversampling and power mode
    CtrlMeas = 0x74,
    /// IIR filter
    Config = 0x75,
    /// First trimming block, 23 bytes
    Coeff1 = 0x8A,
    /// Chip identifier, reads 0x61
    ChipId = 0xD0,
    /// Write 0xB6 for a soft reset
    SoftReset = 0xE0,
    /// Second trimming block, 14 bytes
    Coeff2 = 0xE1,
}
