use bitfield::bitfield;
use ux::{u12, u4};

bitfield! {
    /// CONFIG register layout (0x00). Datasheet 7.6.1.1.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Config(u16);
    impl Debug;
    /// Writing 1 resets the device to its power-on state.
    pub bool, reset, set_reset: 15;
    /// Initial conversion delay in steps of 2 ms.
    pub u8, conversion_delay, set_conversion_delay: 13, 6;
    /// Shunt full-scale range selection; 1 selects the ±40.96 mV range.
    pub bool, adc_range_low, set_adc_range_low: 4;
}

impl Config {
    pub fn from_bits(bits: u16) -> Config {
        Config(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn adc_range(&self) -> AdcRange {
        if self.adc_range_low() {
            AdcRange::Low
        } else {
            AdcRange::High
        }
    }
}

/// Shunt voltage full-scale range (CONFIG.ADCRANGE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcRange {
    /// ±163.84 mV
    High,
    /// ±40.96 mV
    Low,
}

impl AdcRange {
    /// VSHUNT register resolution in volts per count.
    pub fn shunt_voltage_lsb(self) -> f64 {
        match self {
            AdcRange::High => 5.0e-6,
            AdcRange::Low => 1.25e-6,
        }
    }
}

bitfield! {
    /// ADC_CONFIG register layout (0x01). Datasheet 7.6.1.2.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct AdcConfig(u16);
    impl Debug;
    pub u8, mode_bits, set_mode_bits: 15, 12;
    pub u8, bus_voltage_time_bits, set_bus_voltage_time_bits: 11, 9;
    pub u8, shunt_voltage_time_bits, set_shunt_voltage_time_bits: 8, 6;
    pub u8, temperature_time_bits, set_temperature_time_bits: 5, 3;
    pub u8, average_count_bits, set_average_count_bits: 2, 0;
}

impl AdcConfig {
    pub fn from_bits(bits: u16) -> AdcConfig {
        AdcConfig(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn mode(&self) -> Mode {
        Mode::from_bits(self.mode_bits())
    }

    pub fn bus_voltage_time(&self) -> ConversionTime {
        ConversionTime::from_bits(self.bus_voltage_time_bits())
    }

    pub fn shunt_voltage_time(&self) -> ConversionTime {
        ConversionTime::from_bits(self.shunt_voltage_time_bits())
    }

    pub fn temperature_time(&self) -> ConversionTime {
        ConversionTime::from_bits(self.temperature_time_bits())
    }

    pub fn average_count(&self) -> AverageCount {
        AverageCount::from_bits(self.average_count_bits())
    }
}

/// Operating mode (ADC_CONFIG.MODE).
///
/// Triggered modes run one conversion set and return to shutdown;
/// continuous modes free-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Shutdown = 0x0,
    TriggeredBusVoltage = 0x1,
    TriggeredShuntVoltage = 0x2,
    TriggeredShuntAndBusVoltage = 0x3,
    TriggeredTemperature = 0x4,
    TriggeredTemperatureAndBusVoltage = 0x5,
    TriggeredTemperatureAndShuntVoltage = 0x6,
    TriggeredAll = 0x7,
    Shutdown2 = 0x8,
    ContinuousBusVoltage = 0x9,
    ContinuousShuntVoltage = 0xA,
    ContinuousShuntAndBusVoltage = 0xB,
    ContinuousTemperature = 0xC,
    ContinuousTemperatureAndBusVoltage = 0xD,
    ContinuousTemperatureAndShuntVoltage = 0xE,
    ContinuousAll = 0xF,
}

impl Mode {
    pub fn from_bits(bits: u8) -> Mode {
        match bits & 0xF {
            0x0 => Mode::Shutdown,
            0x1 => Mode::TriggeredBusVoltage,
            0x2 => Mode::TriggeredShuntVoltage,
            0x3 => Mode::TriggeredShuntAndBusVoltage,
            0x4 => Mode::TriggeredTemperature,
            0x5 => Mode::TriggeredTemperatureAndBusVoltage,
            0x6 => Mode::TriggeredTemperatureAndShuntVoltage,
            0x7 => Mode::TriggeredAll,
            0x8 => Mode::Shutdown2,
            0x9 => Mode::ContinuousBusVoltage,
            0xA => Mode::ContinuousShuntVoltage,
            0xB => Mode::ContinuousShuntAndBusVoltage,
            0xC => Mode::ContinuousTemperature,
            0xD => Mode::ContinuousTemperatureAndBusVoltage,
            0xE => Mode::ContinuousTemperatureAndShuntVoltage,
            _ => Mode::ContinuousAll,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// Conversion time for one measurement (VBUSCT/VSHCT/VTCT).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTime {
    _50_us = 0x0,
    _84_us = 0x1,
    _150_us = 0x2,
    _280_us = 0x3,
    _540_us = 0x4,
    _1052_us = 0x5,
    _2074_us = 0x6,
    _4120_us = 0x7,
}

impl ConversionTime {
    pub fn from_bits(bits: u8) -> ConversionTime {
        match bits & 0x7 {
            0x0 => ConversionTime::_50_us,
            0x1 => ConversionTime::_84_us,
            0x2 => ConversionTime::_150_us,
            0x3 => ConversionTime::_280_us,
            0x4 => ConversionTime::_540_us,
            0x5 => ConversionTime::_1052_us,
            0x6 => ConversionTime::_2074_us,
            _ => ConversionTime::_4120_us,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Conversion time in microseconds.
    pub fn us(self) -> u16 {
        match self {
            ConversionTime::_50_us => 50,
            ConversionTime::_84_us => 84,
            ConversionTime::_150_us => 150,
            ConversionTime::_280_us => 280,
            ConversionTime::_540_us => 540,
            ConversionTime::_1052_us => 1052,
            ConversionTime::_2074_us => 2074,
            ConversionTime::_4120_us => 4120,
        }
    }
}

/// ADC sample averaging count (ADC_CONFIG.AVG).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageCount {
    _1 = 0x0,
    _4 = 0x1,
    _16 = 0x2,
    _64 = 0x3,
    _128 = 0x4,
    _256 = 0x5,
    _512 = 0x6,
    _1024 = 0x7,
}

impl AverageCount {
    pub fn from_bits(bits: u8) -> AverageCount {
        match bits & 0x7 {
            0x0 => AverageCount::_1,
            0x1 => AverageCount::_4,
            0x2 => AverageCount::_16,
            0x3 => AverageCount::_64,
            0x4 => AverageCount::_128,
            0x5 => AverageCount::_256,
            0x6 => AverageCount::_512,
            _ => AverageCount::_1024,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn count(self) -> u16 {
        match self {
            AverageCount::_1 => 1,
            AverageCount::_4 => 4,
            AverageCount::_16 => 16,
            AverageCount::_64 => 64,
            AverageCount::_128 => 128,
            AverageCount::_256 => 256,
            AverageCount::_512 => 512,
            AverageCount::_1024 => 1024,
        }
    }
}

bitfield! {
    /// DIAG_ALRT register layout (0x0B). Datasheet 7.6.1.9.
    ///
    /// Bits 15..12 configure the ALERT pin, the rest are status flags.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct DiagAlrt(u16);
    impl Debug;
    pub bool, alert_latch, set_alert_latch: 15;
    pub bool, alert_on_conversion_ready, set_alert_on_conversion_ready: 14;
    pub bool, slow_alert, set_slow_alert: 13;
    pub bool, alert_polarity, set_alert_polarity: 12;
    pub bool, math_overflow, _: 9;
    pub bool, temperature_over_limit, _: 7;
    pub bool, shunt_over_limit, _: 6;
    pub bool, shunt_under_limit, _: 5;
    pub bool, bus_over_limit, _: 4;
    pub bool, bus_under_limit, _: 3;
    pub bool, power_over_limit, _: 2;
    pub bool, conversion_ready, _: 1;
    pub bool, memory_ok, _: 0;
}

impl DiagAlrt {
    pub fn from_bits(bits: u16) -> DiagAlrt {
        DiagAlrt(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }
}

/// Decoded DEVICE_ID register (0x3F). Datasheet 7.6.1.17.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    /// Die identification, 0x238 for the INA238.
    pub die_id: u12,
    /// Silicon revision.
    pub rev_id: u4,
}

impl DeviceId {
    pub fn from_bits(bits: u16) -> DeviceId {
        DeviceId {
            die_id: u12::new(bits >> 4),
            rev_id: u4::new((bits & 0xF) as u8),
        }
    }
}
