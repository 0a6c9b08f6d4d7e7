/// Width in bits of a device register.
///
/// Every INA238 register is 16 bits wide except POWER, which is 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Bits16,
    Bits24,
}

impl Width {
    /// Number of bytes transferred on the wire for this width.
    pub const fn bytes(self) -> usize {
        match self {
            Width::Bits16 => 2,
            Width::Bits24 => 3,
        }
    }

    /// Largest raw value the register can hold.
    pub const fn max_value(self) -> u32 {
        match self {
            Width::Bits16 => 0xFFFF,
            Width::Bits24 => 0xFF_FFFF,
        }
    }
}

/// Wire-level description of a register.
///
/// Implemented by the marker types in [`super`]. The address/width table is
/// the contract with the physical device and must match the datasheet
/// (7.6.1, "INA238 Registers") exactly.
pub trait Addressable {
    /// Register pointer value.
    const ADDRESS: u8;

    /// Register width.
    const WIDTH: Width;

    /// Bits that must never be written. The datasheet specifies they also
    /// read back as zero.
    const RESERVED: u32 = 0;
}
