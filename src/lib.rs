//! Sensor fusion and telemetry normalization for an MPU6050 / QMC5883P /
//! BMP280 / BME688 sensor stack sharing one I2C bus.
//!
//! Drivers produce bus-native samples, [`units`] turns them into physical
//! quantities, [`readout::SensorReadout`] hides device failures behind NaN
//! sentinels, [`orientation`] fuses the inertial and magnetic readings into
//! pitch/roll/yaw and [`telemetry`] arranges everything into one report.
//! [`station::TelemetryStation`] ties the chain together for a polling loop.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod accel;
pub mod address;
pub mod bme688;
pub mod bmp280;
pub mod config;
pub mod driver;
pub mod error;
pub mod gyro;
pub mod magnetometer;
pub mod mpu6050;
pub mod orientation;
pub mod qmc5883p;
pub mod readout;
pub mod registers;
pub mod station;
pub mod telemetry;
pub mod units;

#[cfg(test)]
mod mock;
