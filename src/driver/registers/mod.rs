#![allow(non_camel_case_types)]

pub mod access;
pub mod addressable;
pub mod data;

use enum_variant_type::EnumVariantType;

use self::addressable::{Addressable, Width};

/// The INA238 register map. Datasheet 7.6.1.
///
/// Each variant has a generated marker type of the same name carrying the
/// wire-level description through [`Addressable`].
#[derive(EnumVariantType, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    CONFIG,
    ADC_CONFIG,
    SHUNT_CAL,
    VSHUNT,
    VBUS,
    DIETEMP,
    CURRENT,
    POWER,
    DIAG_ALRT,
    SOVL,
    SUVL,
    BOVL,
    BUVL,
    TEMP_LIMIT,
    PWR_LIMIT,
    MANUFACTURER_ID,
    DEVICE_ID,
}

macro_rules! addressable {
    ($($register:ty { address: $address:literal, width: $width:expr, reserved: $reserved:literal }),* $(,)?) => {
        $(impl Addressable for $register {
            const ADDRESS: u8 = $address;
            const WIDTH: Width = $width;
            const RESERVED: u32 = $reserved;
        })*
    };
}

addressable! {
    CONFIG { address: 0x00, width: Width::Bits16, reserved: 0x402F },
    ADC_CONFIG { address: 0x01, width: Width::Bits16, reserved: 0x0000 },
    SHUNT_CAL { address: 0x02, width: Width::Bits16, reserved: 0x8000 },
    VSHUNT { address: 0x04, width: Width::Bits16, reserved: 0x0000 },
    VBUS { address: 0x05, width: Width::Bits16, reserved: 0x0000 },
    DIETEMP { address: 0x06, width: Width::Bits16, reserved: 0x000F },
    CURRENT { address: 0x07, width: Width::Bits16, reserved: 0x0000 },
    POWER { address: 0x08, width: Width::Bits24, reserved: 0x000000 },
    DIAG_ALRT { address: 0x0B, width: Width::Bits16, reserved: 0x0D00 },
    SOVL { address: 0x0C, width: Width::Bits16, reserved: 0x0000 },
    SUVL { address: 0x0D, width: Width::Bits16, reserved: 0x0000 },
    BOVL { address: 0x0E, width: Width::Bits16, reserved: 0x8000 },
    BUVL { address: 0x0F, width: Width::Bits16, reserved: 0x8000 },
    TEMP_LIMIT { address: 0x10, width: Width::Bits16, reserved: 0x000F },
    PWR_LIMIT { address: 0x11, width: Width::Bits16, reserved: 0x0000 },
    MANUFACTURER_ID { address: 0x3E, width: Width::Bits16, reserved: 0x0000 },
    DEVICE_ID { address: 0x3F, width: Width::Bits16, reserved: 0x0000 },
}
