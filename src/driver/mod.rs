use embedded_hal::i2c::I2c;
use log::debug;

use crate::driver::registers::access::{
    ReadError, ReadFromRegister, WriteError, WriteToRegister,
};
use crate::driver::registers::addressable::Addressable;
use crate::driver::registers::data::{
    AdcConfig, AdcRange, AverageCount, Config, ConversionTime, DeviceId, DiagAlrt, Mode,
};
use crate::driver::registers::{
    ADC_CONFIG, BOVL, BUVL, CONFIG, CURRENT, DEVICE_ID, DIAG_ALRT, DIETEMP, MANUFACTURER_ID,
    POWER, PWR_LIMIT, SHUNT_CAL, SOVL, SUVL, TEMP_LIMIT, VBUS, VSHUNT,
};

use self::operator::Operator;

pub mod initialization;
pub mod operator;
pub mod registers;

/// I2C address with both address pins tied to GND.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// MANUFACTURER_ID reads back "TI" in ASCII.
pub const MANUFACTURER_ID_VALUE: u16 = 0x5449;

/// DEVICE_ID reads back die 0x238, revision 1.
pub const DEVICE_ID_VALUE: u16 = 0x2381;

/// VBUS resolution, volts per count.
const BUS_VOLTAGE_LSB: f64 = 3.125e-3;

/// DIETEMP resolution, degrees Celsius per count.
const DIE_TEMPERATURE_LSB: f64 = 0.125;

/// The POWER register counts in units of `0.2 * current_lsb` watts.
const POWER_SCALE: f64 = 0.2;

#[derive(Debug, PartialEq)]
pub enum Error<E> {
    Read(ReadError<E>),
    Write(WriteError<E>),
    /// A fixed identification register did not read back its documented
    /// value; wrong chip on the bus or a wiring fault.
    IdentityMismatch {
        register: u8,
        expected: u16,
        found: u16,
    },
    /// Current or power was requested before a shunt calibration defined
    /// the scale factor.
    NotCalibrated,
    /// Shunt calibration called with a non-positive shunt value or current
    /// budget.
    InvalidCalibration {
        r_shunt_ohm: f64,
        max_expected_current_a: f64,
    },
}

impl<E> From<ReadError<E>> for Error<E> {
    fn from(source: ReadError<E>) -> Self {
        Error::Read(source)
    }
}

impl<E> From<WriteError<E>> for Error<E> {
    fn from(source: WriteError<E>) -> Self {
        Error::Write(source)
    }
}

/// Partial CONFIG update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigUpdate {
    /// Initial conversion delay in steps of 2 ms.
    pub conversion_delay: Option<u8>,
    pub adc_range: Option<AdcRange>,
}

/// Partial ADC_CONFIG update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdcConfigUpdate {
    pub mode: Option<Mode>,
    pub bus_voltage_time: Option<ConversionTime>,
    pub shunt_voltage_time: Option<ConversionTime>,
    pub temperature_time: Option<ConversionTime>,
    pub average_count: Option<AverageCount>,
}

/// TI INA238 power monitor on an I2C bus.
///
/// Synchronous and single-owner: callers sharing one device across threads
/// must serialize access themselves.
pub struct INA238<I2C: I2c> {
    operator: Operator<I2C>,
    config: Option<Config>,
    adc_config: Option<AdcConfig>,
    /// Amperes per CURRENT count, defined by the last shunt calibration.
    current_lsb: Option<f64>,
}

impl<I2C: I2c> INA238<I2C> {
    pub fn new(i2c: I2C, device_address: u8) -> INA238<I2C> {
        INA238 {
            operator: Operator::new(i2c, device_address),
            config: None,
            adc_config: None,
            current_lsb: None,
        }
    }

    /// Consume the driver and hand the bus back.
    pub fn release(self) -> I2C {
        self.operator.release()
    }

    /// Reset the device to its power-on state. Drops all cached
    /// configuration and the shunt calibration.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut config = Config::from_bits(0);
        config.set_reset(true);
        self.operator.write(CONFIG, config.bits() as u32)?;
        debug!("device reset issued");
        self.config = None;
        self.adc_config = None;
        self.current_lsb = None;
        Ok(())
    }

    /// Decoded CONFIG register, read from the device once and cached.
    pub fn config(&mut self) -> Result<Config, Error<I2C::Error>> {
        if let Some(config) = self.config {
            return Ok(config);
        }
        let config = ReadFromRegister::read(self, CONFIG)?;
        self.config = Some(config);
        Ok(config)
    }

    /// Merge the update into the current CONFIG and write it back. Skips
    /// the bus write when nothing changes. Changing the ADC range makes a
    /// previously written shunt calibration wrong, so it is dropped and
    /// current/power reads fail until [`set_shunt_calibration`] runs again.
    ///
    /// [`set_shunt_calibration`]: INA238::set_shunt_calibration
    pub fn set_config(&mut self, update: ConfigUpdate) -> Result<(), Error<I2C::Error>> {
        let current = self.config()?;
        let mut merged = current;
        if let Some(delay) = update.conversion_delay {
            merged.set_conversion_delay(delay);
        }
        if let Some(range) = update.adc_range {
            merged.set_adc_range_low(range == AdcRange::Low);
        }
        if merged == current {
            return Ok(());
        }

        WriteToRegister::write(self, CONFIG, merged)?;
        if merged.adc_range() != current.adc_range() {
            debug!("ADC range changed, dropping shunt calibration");
            self.current_lsb = None;
        }
        self.config = Some(merged);
        Ok(())
    }

    /// Decoded ADC_CONFIG register, read from the device once and cached.
    pub fn adc_config(&mut self) -> Result<AdcConfig, Error<I2C::Error>> {
        if let Some(adc_config) = self.adc_config {
            return Ok(adc_config);
        }
        let adc_config = ReadFromRegister::read(self, ADC_CONFIG)?;
        self.adc_config = Some(adc_config);
        Ok(adc_config)
    }

    /// Merge the update into the current ADC_CONFIG and write it back.
    /// Skips the bus write when nothing changes.
    pub fn set_adc_config(&mut self, update: AdcConfigUpdate) -> Result<(), Error<I2C::Error>> {
        let current = self.adc_config()?;
        let mut merged = current;
        if let Some(mode) = update.mode {
            merged.set_mode_bits(mode.bits());
        }
        if let Some(time) = update.bus_voltage_time {
            merged.set_bus_voltage_time_bits(time.bits());
        }
        if let Some(time) = update.shunt_voltage_time {
            merged.set_shunt_voltage_time_bits(time.bits());
        }
        if let Some(time) = update.temperature_time {
            merged.set_temperature_time_bits(time.bits());
        }
        if let Some(count) = update.average_count {
            merged.set_average_count_bits(count.bits());
        }
        if merged == current {
            return Ok(());
        }

        WriteToRegister::write(self, ADC_CONFIG, merged)?;
        self.adc_config = Some(merged);
        Ok(())
    }

    /// Compute and write SHUNT_CAL from the shunt resistor value and the
    /// largest expected current (datasheet 8.1.2):
    /// `current_lsb = max_expected_current_a / 2^15` and
    /// `shunt_cal = 819.2e6 * current_lsb * r_shunt_ohm`, scaled by 4 in
    /// the low ADC range. The derived scale factor is kept for decoding
    /// CURRENT and POWER.
    pub fn set_shunt_calibration(
        &mut self,
        r_shunt_ohm: f64,
        max_expected_current_a: f64,
    ) -> Result<(), Error<I2C::Error>> {
        if !(r_shunt_ohm > 0.0) || !(max_expected_current_a > 0.0) {
            return Err(Error::InvalidCalibration {
                r_shunt_ohm,
                max_expected_current_a,
            });
        }

        let current_lsb = max_expected_current_a / 32768.0;
        let mut shunt_cal = 819.2e6 * current_lsb * r_shunt_ohm;
        if self.config()?.adc_range() == AdcRange::Low {
            shunt_cal *= 4.0;
        }

        let value = shunt_cal as u32;
        self.operator.write(SHUNT_CAL, value)?;
        self.current_lsb = Some(current_lsb);
        debug!("shunt calibration {} ({} A per count)", value, current_lsb);
        Ok(())
    }

    /// Raw SHUNT_CAL register content.
    pub fn shunt_calibration(&mut self) -> Result<u16, Error<I2C::Error>> {
        Ok(self.operator.read(SHUNT_CAL)? as u16)
    }

    /// Amperes per CURRENT count, if a shunt calibration has been set.
    pub fn current_lsb(&self) -> Option<f64> {
        self.current_lsb
    }

    /// Voltage across the shunt in volts. Resolution depends on the
    /// configured ADC range.
    pub fn shunt_voltage(&mut self) -> Result<f64, Error<I2C::Error>> {
        let lsb = self.config()?.adc_range().shunt_voltage_lsb();
        let raw = self.operator.read(VSHUNT)? as u16 as i16;
        Ok(raw as f64 * lsb)
    }

    /// Bus voltage in volts.
    pub fn bus_voltage(&mut self) -> Result<f64, Error<I2C::Error>> {
        let raw = self.operator.read(VBUS)? as u16;
        Ok(raw as f64 * BUS_VOLTAGE_LSB)
    }

    /// Die temperature in degrees Celsius.
    pub fn die_temperature(&mut self) -> Result<f64, Error<I2C::Error>> {
        let raw = self.operator.read(DIETEMP)? as u16 as i16;
        Ok((raw >> 4) as f64 * DIE_TEMPERATURE_LSB)
    }

    /// Current through the shunt in amperes. Requires a shunt calibration.
    pub fn current(&mut self) -> Result<f64, Error<I2C::Error>> {
        let lsb = self.current_lsb.ok_or(Error::NotCalibrated)?;
        let raw = self.operator.read(CURRENT)? as u16 as i16;
        Ok(raw as f64 * lsb)
    }

    /// Power in watts. Requires a shunt calibration.
    pub fn power(&mut self) -> Result<f64, Error<I2C::Error>> {
        let lsb = self.current_lsb.ok_or(Error::NotCalibrated)?;
        let raw = self.operator.read(POWER)?;
        Ok(raw as f64 * POWER_SCALE * lsb)
    }

    /// Alert configuration and status flags.
    pub fn diagnostics(&mut self) -> Result<DiagAlrt, Error<I2C::Error>> {
        Ok(ReadFromRegister::read(self, DIAG_ALRT)?)
    }

    /// SOVL threshold in shunt-voltage counts (same resolution as VSHUNT).
    pub fn shunt_overvoltage_limit(&mut self) -> Result<i16, Error<I2C::Error>> {
        Ok(self.operator.read(SOVL)? as u16 as i16)
    }

    pub fn set_shunt_overvoltage_limit(&mut self, counts: i16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(SOVL, counts as u16 as u32)?)
    }

    /// SUVL threshold in shunt-voltage counts (same resolution as VSHUNT).
    pub fn shunt_undervoltage_limit(&mut self) -> Result<i16, Error<I2C::Error>> {
        Ok(self.operator.read(SUVL)? as u16 as i16)
    }

    pub fn set_shunt_undervoltage_limit(&mut self, counts: i16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(SUVL, counts as u16 as u32)?)
    }

    /// BOVL threshold in 3.125 mV counts, 15 bits.
    pub fn bus_overvoltage_limit(&mut self) -> Result<u16, Error<I2C::Error>> {
        Ok(self.operator.read(BOVL)? as u16)
    }

    pub fn set_bus_overvoltage_limit(&mut self, counts: u16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(BOVL, counts as u32)?)
    }

    /// BUVL threshold in 3.125 mV counts, 15 bits.
    pub fn bus_undervoltage_limit(&mut self) -> Result<u16, Error<I2C::Error>> {
        Ok(self.operator.read(BUVL)? as u16)
    }

    pub fn set_bus_undervoltage_limit(&mut self, counts: u16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(BUVL, counts as u32)?)
    }

    /// TEMP_LIMIT register content; temperature threshold in bits 15..4,
    /// 125 m°C per count.
    pub fn temperature_limit(&mut self) -> Result<u16, Error<I2C::Error>> {
        Ok(self.operator.read(TEMP_LIMIT)? as u16)
    }

    pub fn set_temperature_limit(&mut self, value: u16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(TEMP_LIMIT, value as u32)?)
    }

    /// PWR_LIMIT threshold, compared against POWER >> 8.
    pub fn power_limit(&mut self) -> Result<u16, Error<I2C::Error>> {
        Ok(self.operator.read(PWR_LIMIT)? as u16)
    }

    pub fn set_power_limit(&mut self, value: u16) -> Result<(), Error<I2C::Error>> {
        Ok(self.operator.write(PWR_LIMIT, value as u32)?)
    }

    /// Read MANUFACTURER_ID and check it against [`MANUFACTURER_ID_VALUE`].
    pub fn manufacturer_id(&mut self) -> Result<u16, Error<I2C::Error>> {
        let found = self.operator.read(MANUFACTURER_ID)? as u16;
        if found != MANUFACTURER_ID_VALUE {
            return Err(Error::IdentityMismatch {
                register: <MANUFACTURER_ID as Addressable>::ADDRESS,
                expected: MANUFACTURER_ID_VALUE,
                found,
            });
        }
        Ok(found)
    }

    /// Read DEVICE_ID, check it against [`DEVICE_ID_VALUE`] and decode the
    /// die id and silicon revision.
    pub fn device_id(&mut self) -> Result<DeviceId, Error<I2C::Error>> {
        let found = self.operator.read(DEVICE_ID)? as u16;
        if found != DEVICE_ID_VALUE {
            return Err(Error::IdentityMismatch {
                register: <DEVICE_ID as Addressable>::ADDRESS,
                expected: DEVICE_ID_VALUE,
                found,
            });
        }
        Ok(DeviceId::from_bits(found))
    }
}

impl<I2C: I2c> ReadFromRegister<CONFIG, Config, I2C::Error> for INA238<I2C> {
    fn read(&mut self, register: CONFIG) -> Result<Config, ReadError<I2C::Error>> {
        let raw = self.operator.read(register)?;
        if raw & <CONFIG as Addressable>::RESERVED != 0 {
            return Err(ReadError::ReservedBits {
                address: <CONFIG as Addressable>::ADDRESS,
                value: raw,
            });
        }
        Ok(Config::from_bits(raw as u16))
    }
}

impl<I2C: I2c> WriteToRegister<CONFIG, Config, I2C::Error> for INA238<I2C> {
    fn write(&mut self, register: CONFIG, data: Config) -> Result<(), WriteError<I2C::Error>> {
        self.operator.write(register, data.bits() as u32)
    }
}

impl<I2C: I2c> ReadFromRegister<ADC_CONFIG, AdcConfig, I2C::Error> for INA238<I2C> {
    fn read(&mut self, register: ADC_CONFIG) -> Result<AdcConfig, ReadError<I2C::Error>> {
        Ok(AdcConfig::from_bits(self.operator.read(register)? as u16))
    }
}

impl<I2C: I2c> WriteToRegister<ADC_CONFIG, AdcConfig, I2C::Error> for INA238<I2C> {
    fn write(
        &mut self,
        register: ADC_CONFIG,
        data: AdcConfig,
    ) -> Result<(), WriteError<I2C::Error>> {
        self.operator.write(register, data.bits() as u32)
    }
}

impl<I2C: I2c> ReadFromRegister<DIAG_ALRT, DiagAlrt, I2C::Error> for INA238<I2C> {
    fn read(&mut self, register: DIAG_ALRT) -> Result<DiagAlrt, ReadError<I2C::Error>> {
        Ok(DiagAlrt::from_bits(self.operator.read(register)? as u16))
    }
}
