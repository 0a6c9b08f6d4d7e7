use super::addressable::Addressable;

/// Failed to read a register.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadError<E> {
    /// The underlying transport failed.
    Bus(E),
    /// A bit the datasheet declares reserved read back non-zero, which
    /// points at a wire problem or a different chip.
    ReservedBits { address: u8, value: u32 },
}

/// Failed to write a register.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteError<E> {
    /// The underlying transport failed.
    Bus(E),
    /// The value does not fit the register's declared width.
    ValueTooWide { address: u8, value: u32 },
    /// The value intersects the register's reserved-bit mask.
    ReservedBits { address: u8, value: u32 },
}

/// Read the typed content of a register.
pub trait ReadFromRegister<R: Addressable, Data, E> {
    fn read(&mut self, register: R) -> Result<Data, ReadError<E>>;
}

/// Write the typed content of a register.
pub trait WriteToRegister<R: Addressable, Data, E> {
    fn write(&mut self, register: R, data: Data) -> Result<(), WriteError<E>>;
}
