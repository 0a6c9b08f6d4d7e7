use byteorder::{BigEndian, ByteOrder};
use embedded_hal::i2c::I2c;
use log::trace;

use crate::driver::registers::access::{ReadError, WriteError};
use crate::driver::registers::addressable::{Addressable, Width};

/// Raw register transactions against the INA238.
///
/// Keeps track of the register the device's internal pointer currently
/// addresses, so repeated reads of one register skip the redundant
/// pointer-set write (datasheet figures 7-7 through 7-9). The pointer also
/// follows register writes.
pub struct Operator<I2C> {
    i2c: I2C,
    device_address: u8,
    addressed: Option<u8>,
}

impl<I2C> Operator<I2C> {
    pub fn new(i2c: I2C, device_address: u8) -> Operator<I2C> {
        Operator {
            i2c,
            device_address,
            // The pointer state at power-on is unknown to us.
            addressed: None,
        }
    }

    /// Consume the operator and hand the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Operator<I2C> {
    /// Read a register, big-endian.
    pub fn read<R: Addressable>(&mut self, _register: R) -> Result<u32, ReadError<I2C::Error>> {
        if self.addressed != Some(R::ADDRESS) {
            self.i2c
                .write(self.device_address, &[R::ADDRESS])
                .map_err(ReadError::Bus)?;
            self.addressed = Some(R::ADDRESS);
        }

        let mut buffer = [0u8; 3];
        let length = R::WIDTH.bytes();
        self.i2c
            .read(self.device_address, &mut buffer[..length])
            .map_err(ReadError::Bus)?;

        let value = match R::WIDTH {
            Width::Bits16 => BigEndian::read_u16(&buffer[..2]) as u32,
            Width::Bits24 => BigEndian::read_u24(&buffer[..3]),
        };
        trace!("read register {:#04x} -> {:#x}", R::ADDRESS, value);
        Ok(value)
    }

    /// Write a register, big-endian. The value must fit the register width
    /// and must not touch reserved bits.
    pub fn write<R: Addressable>(
        &mut self,
        _register: R,
        value: u32,
    ) -> Result<(), WriteError<I2C::Error>> {
        if value > R::WIDTH.max_value() {
            return Err(WriteError::ValueTooWide {
                address: R::ADDRESS,
                value,
            });
        }
        if value & R::RESERVED != 0 {
            return Err(WriteError::ReservedBits {
                address: R::ADDRESS,
                value,
            });
        }

        let mut buffer = [0u8; 4];
        buffer[0] = R::ADDRESS;
        let length = R::WIDTH.bytes();
        match R::WIDTH {
            Width::Bits16 => BigEndian::write_u16(&mut buffer[1..3], value as u16),
            Width::Bits24 => BigEndian::write_u24(&mut buffer[1..4], value),
        }

        trace!("write register {:#04x} <- {:#x}", R::ADDRESS, value);
        self.i2c
            .write(self.device_address, &buffer[..1 + length])
            .map_err(WriteError::Bus)?;
        self.addressed = Some(R::ADDRESS);
        Ok(())
    }
}
