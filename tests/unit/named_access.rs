//! Unit tests for name-based access

use crate::common::create_mock_driver;
use ssi_prbs_rategen::{Error, FIELDS, Field, TX_RATE_NAME, Value, fields};

#[test]
fn test_get_named_field() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x04, 512);

    assert_eq!(driver.get_named("PacketLength").unwrap(), Value::UInt(512));
}

#[test]
fn test_get_named_tx_rate() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x08, 124_999);

    assert_eq!(driver.get_named(TX_RATE_NAME).unwrap(), Value::Float(1000.0));
}

#[test]
fn test_set_named_tx_rate() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .set_named("TxRate", Value::Float(1000.0), true)
        .unwrap();
    assert_eq!(interface.get_u32(0x08), 124_999);

    driver.set_named("TxRate", Value::UInt(500), true).unwrap();
    assert_eq!(interface.get_u32(0x08), 249_999);
}

#[test]
fn test_set_named_tx_rate_staged() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .set_named("TxRate", Value::Float(1000.0), false)
        .unwrap();

    assert_eq!(interface.write_count(), 0);
    assert_eq!(driver.staged(Field::RawPeriod), Some(Value::UInt(124_999)));
}

#[test]
fn test_set_named_tx_rate_rejects_bool() {
    let (mut driver, _interface) = create_mock_driver();

    assert_eq!(
        driver.set_named("TxRate", Value::Bool(true), true),
        Err(Error::TypeMismatch(Field::RawPeriod))
    );
}

#[test]
fn test_set_named_field() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_named("TxEn", Value::Bool(true), true).unwrap();
    assert_eq!(interface.get_u32(0x0C), 1);
}

#[test]
fn test_unknown_names() {
    let (mut driver, interface) = create_mock_driver();

    assert_eq!(driver.get_named("Bogus"), Err(Error::UnknownVariable));
    assert_eq!(
        driver.set_named("txrate", Value::Float(1.0), true),
        Err(Error::UnknownVariable)
    );
    assert!(interface.operations().is_empty());
}

#[test]
fn test_every_table_name_resolves() {
    let (mut driver, _interface) = create_mock_driver();

    for info in &FIELDS {
        assert!(driver.get_named(info.name).is_ok(), "{}", info.name);
    }
}

#[test]
fn test_display_with_metadata() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x14, 1000);
    interface.set_u32(0x08, 124_999);

    let info = Field::FrameRate.info();
    let value = driver.get_named(info.name).unwrap();
    assert_eq!(value.format(info.disp, info.units).unwrap(), "1000 Hz");

    let rate = driver.get_named(TX_RATE_NAME).unwrap();
    assert_eq!(
        rate.format(fields::TX_RATE_DISP, Some(fields::TX_RATE_UNITS))
            .unwrap(),
        "1000.000 Hz"
    );

    let info = Field::RawPeriod.info();
    let value = driver.get(Field::RawPeriod).unwrap();
    assert_eq!(value.format(info.disp, info.units).unwrap(), "0x1e847");
}
