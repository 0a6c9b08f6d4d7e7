use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use ina238::driver::initialization::{ContinuousMonitoring, Initializer};
use ina238::driver::registers::access::{ReadError, WriteError};
use ina238::{AdcConfigUpdate, AdcRange, ConfigUpdate, Error, INA238, DEFAULT_ADDRESS};

const ADDR: u8 = DEFAULT_ADDRESS;

fn driver(expectations: &[I2cTransaction]) -> INA238<I2cMock> {
    INA238::new(I2cMock::new(expectations), ADDR)
}

fn finish(device: INA238<I2cMock>) {
    let mut i2c = device.release();
    i2c.done();
}

#[test]
fn manufacturer_id_reads_ti() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x3E]),
        I2cTransaction::read(ADDR, vec![0x54, 0x49]),
    ]);
    assert_eq!(device.manufacturer_id().unwrap(), 0x5449);
    finish(device);
}

#[test]
fn device_id_decodes_die_and_revision() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x3F]),
        I2cTransaction::read(ADDR, vec![0x23, 0x81]),
    ]);
    let id = device.device_id().unwrap();
    assert_eq!(u16::from(id.die_id), 0x238);
    assert_eq!(u8::from(id.rev_id), 0x1);
    finish(device);
}

#[test]
fn device_id_mismatch_is_an_error() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x3F]),
        I2cTransaction::read(ADDR, vec![0x22, 0x81]),
    ]);
    assert_eq!(
        device.device_id(),
        Err(Error::IdentityMismatch {
            register: 0x3F,
            expected: 0x2381,
            found: 0x2281,
        })
    );
    finish(device);
}

#[test]
fn manufacturer_id_mismatch_is_an_error() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x3E]),
        I2cTransaction::read(ADDR, vec![0x54, 0x4A]),
    ]);
    assert_eq!(
        device.manufacturer_id(),
        Err(Error::IdentityMismatch {
            register: 0x3E,
            expected: 0x5449,
            found: 0x544A,
        })
    );
    finish(device);
}

#[test]
fn config_with_reserved_bits_set_is_an_error() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        // bit 14 is reserved and must read zero
        I2cTransaction::read(ADDR, vec![0x40, 0x00]),
    ]);
    assert_eq!(
        device.config(),
        Err(Error::Read(ReadError::ReservedBits {
            address: 0x00,
            value: 0x4000,
        }))
    );
    finish(device);
}

#[test]
fn set_config_merges_and_writes_once() {
    let mut device = driver(&[
        // first read of CONFIG (power-on default)
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        // 42 << 6 == 0x0A80
        I2cTransaction::write(ADDR, vec![0x00, 0x0A, 0x80]),
    ]);

    device
        .set_config(ConfigUpdate {
            conversion_delay: Some(42),
            ..Default::default()
        })
        .unwrap();

    // served from cache, decoded from what was written
    let config = device.config().unwrap();
    assert_eq!(config.conversion_delay(), 42);
    assert_eq!(config.adc_range(), AdcRange::High);

    // writing the same value again must not touch the bus
    device
        .set_config(ConfigUpdate {
            conversion_delay: Some(42),
            ..Default::default()
        })
        .unwrap();

    finish(device);
}

#[test]
fn shunt_calibration_value_high_range() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        // 819.2e6 * (2.5 / 32768) * 0.04 == 2500
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
    ]);
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    assert_eq!(device.current_lsb(), Some(2.5 / 32768.0));
    finish(device);
}

#[test]
fn shunt_calibration_value_low_range_is_quadrupled() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        // ADCRANGE bit
        I2cTransaction::write(ADDR, vec![0x00, 0x00, 0x10]),
        // 2500 * 4 == 10000
        I2cTransaction::write(ADDR, vec![0x02, 0x27, 0x10]),
    ]);
    device
        .set_config(ConfigUpdate {
            adc_range: Some(AdcRange::Low),
            ..Default::default()
        })
        .unwrap();
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    finish(device);
}

#[test]
fn oversized_calibration_does_not_fit_the_register() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
    ]);
    // 819.2e6 * (3.0 / 32768) * 1.0 == 75000, beyond 16 bits
    assert_eq!(
        device.set_shunt_calibration(1.0, 3.0),
        Err(Error::Write(WriteError::ValueTooWide {
            address: 0x02,
            value: 75_000,
        }))
    );
    // the calibration gate must stay closed after the failure
    assert_eq!(device.current_lsb(), None);
    assert_eq!(device.current(), Err(Error::NotCalibrated));
    finish(device);
}

#[test]
fn calibration_into_the_reserved_bit_is_rejected() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
    ]);
    // 819.2e6 * (40.0 / 32768) * 0.04 == 40000: fits 16 bits but sets
    // SHUNT_CAL bit 15, which is reserved
    assert_eq!(
        device.set_shunt_calibration(0.04, 40.0),
        Err(Error::Write(WriteError::ReservedBits {
            address: 0x02,
            value: 40_000,
        }))
    );
    assert_eq!(device.current_lsb(), None);
    finish(device);
}

#[test]
fn non_positive_calibration_inputs_are_rejected() {
    let mut device = driver(&[]);
    assert_eq!(
        device.set_shunt_calibration(0.0, 2.5),
        Err(Error::InvalidCalibration {
            r_shunt_ohm: 0.0,
            max_expected_current_a: 2.5,
        })
    );
    assert_eq!(
        device.set_shunt_calibration(0.04, -1.0),
        Err(Error::InvalidCalibration {
            r_shunt_ohm: 0.04,
            max_expected_current_a: -1.0,
        })
    );
    finish(device);
}

#[test]
fn current_and_power_require_calibration() {
    let mut device = driver(&[]);
    assert_eq!(device.current(), Err(Error::NotCalibrated));
    assert_eq!(device.power(), Err(Error::NotCalibrated));
    finish(device);
}

#[test]
fn current_scales_by_calibrated_lsb() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
        I2cTransaction::write(ADDR, vec![0x07]),
        I2cTransaction::read(ADDR, vec![0x40, 0x00]),
    ]);
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    // 16384 counts * (2.5 / 32768) A == 1.25 A exactly
    assert_eq!(device.current().unwrap(), 1.25);
    finish(device);
}

#[test]
fn power_reads_24_bits_and_scales() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
        I2cTransaction::write(ADDR, vec![0x08]),
        I2cTransaction::read(ADDR, vec![0x06, 0x1A, 0x80]),
    ]);
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    assert_eq!(
        device.power().unwrap(),
        400_000.0 * 0.2 * (2.5 / 32768.0)
    );
    finish(device);
}

#[test]
fn repeated_reads_elide_the_pointer_set() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x05]),
        I2cTransaction::read(ADDR, vec![0x20, 0x00]),
        // second read: no pointer-set write
        I2cTransaction::read(ADDR, vec![0x20, 0x00]),
    ]);
    // 8192 counts * 3.125 mV
    assert_eq!(device.bus_voltage().unwrap(), 25.6);
    assert_eq!(device.bus_voltage().unwrap(), 25.6);
    finish(device);
}

#[test]
fn read_after_write_elides_the_pointer_set() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x11, 0x12, 0x34]),
        I2cTransaction::read(ADDR, vec![0x12, 0x34]),
    ]);
    device.set_power_limit(0x1234).unwrap();
    assert_eq!(device.power_limit().unwrap(), 0x1234);
    finish(device);
}

#[test]
fn reserved_bits_are_never_written() {
    let mut device = driver(&[]);
    assert_eq!(
        device.set_bus_overvoltage_limit(0x8000),
        Err(Error::Write(WriteError::ReservedBits {
            address: 0x0E,
            value: 0x8000,
        }))
    );
    finish(device);
}

#[test]
fn shunt_voltage_is_signed_and_range_dependent() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x04]),
        I2cTransaction::read(ADDR, vec![0xFF, 0xFF]),
    ]);
    // -1 count in the ±163.84 mV range
    assert_eq!(device.shunt_voltage().unwrap(), -5.0e-6);
    finish(device);
}

#[test]
fn die_temperature_decodes_both_signs() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x06]),
        I2cTransaction::read(ADDR, vec![0x0C, 0x80]),
        I2cTransaction::read(ADDR, vec![0xF3, 0x80]),
    ]);
    assert_eq!(device.die_temperature().unwrap(), 25.0);
    assert_eq!(device.die_temperature().unwrap(), -25.0);
    finish(device);
}

#[test]
fn diagnostics_expose_status_flags() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x0B]),
        I2cTransaction::read(ADDR, vec![0x00, 0x03]),
    ]);
    let diag = device.diagnostics().unwrap();
    assert!(diag.conversion_ready());
    assert!(diag.memory_ok());
    assert!(!diag.math_overflow());
    finish(device);
}

#[test]
fn reset_drops_the_calibration_gate() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
        I2cTransaction::write(ADDR, vec![0x00, 0x80, 0x00]),
    ]);
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    device.reset().unwrap();
    assert_eq!(device.current(), Err(Error::NotCalibrated));
    finish(device);
}

#[test]
fn adc_range_change_invalidates_calibration() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
        I2cTransaction::write(ADDR, vec![0x00, 0x00, 0x10]),
    ]);
    device.set_shunt_calibration(0.04, 2.5).unwrap();
    device
        .set_config(ConfigUpdate {
            adc_range: Some(AdcRange::Low),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(device.current(), Err(Error::NotCalibrated));
    finish(device);
}

#[test]
fn adc_config_partial_update() {
    let mut device = driver(&[
        I2cTransaction::write(ADDR, vec![0x01]),
        // power-on default: continuous all, 1052 us, no averaging
        I2cTransaction::read(ADDR, vec![0xFB, 0x68]),
        // only AVG changes: 0xFB68 | 0x5 == 0xFB6D
        I2cTransaction::write(ADDR, vec![0x01, 0xFB, 0x6D]),
    ]);
    device
        .set_adc_config(AdcConfigUpdate {
            average_count: Some(ina238::AverageCount::_256),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(
        device.adc_config().unwrap().average_count(),
        ina238::AverageCount::_256
    );
    finish(device);
}

#[test]
fn continuous_monitoring_bring_up_sequence() {
    let mut device = driver(&[
        // reset
        I2cTransaction::write(ADDR, vec![0x00, 0x80, 0x00]),
        // identity probe
        I2cTransaction::write(ADDR, vec![0x3E]),
        I2cTransaction::read(ADDR, vec![0x54, 0x49]),
        I2cTransaction::write(ADDR, vec![0x3F]),
        I2cTransaction::read(ADDR, vec![0x23, 0x81]),
        // adc config: 4120 us everywhere, 256 averages
        I2cTransaction::write(ADDR, vec![0x01]),
        I2cTransaction::read(ADDR, vec![0xFB, 0x68]),
        I2cTransaction::write(ADDR, vec![0x01, 0xFF, 0xFD]),
        // calibration
        I2cTransaction::write(ADDR, vec![0x00]),
        I2cTransaction::read(ADDR, vec![0x00, 0x00]),
        I2cTransaction::write(ADDR, vec![0x02, 0x09, 0xC4]),
    ]);
    device
        .init(ContinuousMonitoring {
            r_shunt_ohm: 0.04,
            max_expected_current_a: 2.5,
        })
        .unwrap();
    finish(device);
}
