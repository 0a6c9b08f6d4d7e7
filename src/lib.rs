#![cfg_attr(not(test), no_std)]

//! Driver for the TI [INA238] 85-V, 16-bit, high-precision power monitor
//! with I2C interface.
//!
//! The chip is addressed through any blocking [`embedded_hal::i2c::I2c`]
//! implementation, typically a USB-to-I2C bridge on a host machine. All
//! register traffic is big-endian, as mandated by the datasheet.
//!
//! [INA238]: https://www.ti.com/product/INA238

pub mod driver;

pub use driver::registers::data::{AdcRange, AverageCount, ConversionTime, Mode};
pub use driver::{AdcConfigUpdate, ConfigUpdate, Error, INA238, DEFAULT_ADDRESS};
