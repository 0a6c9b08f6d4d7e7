use embedded_hal::i2c::I2c;

use crate::driver::registers::data::{AverageCount, ConversionTime, Mode};
use crate::driver::{AdcConfigUpdate, Error, INA238};

/// Bring the device into a known, measuring state for one application.
pub trait Initializer<Application> {
    type Error;

    fn init(&mut self, application: Application) -> Result<(), Self::Error>;
}

/// Continuous monitoring of shunt voltage, bus voltage and die temperature
/// with long conversion times and heavy averaging. Suitable for supervising
/// a mostly static supply rail.
pub struct ContinuousMonitoring {
    /// Shunt resistor value in ohms.
    pub r_shunt_ohm: f64,
    /// Largest current the application expects to measure, in amperes.
    pub max_expected_current_a: f64,
}

impl<I2C: I2c> Initializer<ContinuousMonitoring> for INA238<I2C> {
    type Error = Error<I2C::Error>;

    fn init(&mut self, application: ContinuousMonitoring) -> Result<(), Self::Error> {
        self.reset()?;
        self.manufacturer_id()?;
        self.device_id()?;

        self.set_adc_config(AdcConfigUpdate {
            mode: Some(Mode::ContinuousAll),
            bus_voltage_time: Some(ConversionTime::_4120_us),
            shunt_voltage_time: Some(ConversionTime::_4120_us),
            temperature_time: Some(ConversionTime::_4120_us),
            average_count: Some(AverageCount::_256),
        })?;

        self.set_shunt_calibration(application.r_shunt_ohm, application.max_expected_current_a)?;

        Ok(())
    }
}
