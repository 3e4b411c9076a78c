//! Integration test: configure, run, and poll the generator

use crate::common::create_mock_driver;
use crate::common::test_utils::assert_float_eq;
use ssi_prbs_rategen::{Field, GeneratorConfig, Value, polled_fields};

#[test]
fn test_configure_then_poll() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure(GeneratorConfig {
            packet_length: 1024,
            tx_rate_hz: 10_000.0,
            tx_enable: true,
        })
        .unwrap();

    // Packet length, then rate, then enable
    assert_eq!(interface.writes_to(0x04), vec![1024]);
    assert_eq!(interface.writes_to(0x08), vec![12_499]);
    assert_eq!(interface.writes_to(0x0C), vec![1]);
    assert_float_eq(driver.get_rate().unwrap(), 10_000.0, 1e-9);

    // Clear statistics before sampling
    driver.stat_reset().unwrap();
    assert_eq!(interface.get_u32(0x00), 1);

    // Firmware reports some traffic
    interface.set_u32(0x14, 10_000);
    interface.set_u64(0x40, 50_000);
    interface.clear_operations();

    // An external poller walks the polled fields once per interval
    let mut sampled = Vec::new();
    for info in polled_fields() {
        sampled.push((info.field, driver.get(info.field).unwrap()));
    }

    assert_eq!(sampled.len(), 8);
    assert_eq!(interface.read_count(), 8);
    assert!(sampled.contains(&(Field::FrameRate, Value::UInt(10_000))));
    assert!(sampled.contains(&(Field::FrameCount, Value::UInt(50_000))));

    let stats = driver.read_statistics().unwrap();
    assert_eq!(stats.frame_rate, 10_000);
    assert_eq!(stats.frame_count, 50_000);
}

#[test]
fn test_one_shot_burst() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure(GeneratorConfig {
            tx_enable: false,
            ..GeneratorConfig::default()
        })
        .unwrap();
    assert_eq!(interface.get_u32(0x04), 256);

    // Two bursts, two edges
    driver.one_shot().unwrap();
    driver.one_shot().unwrap();
    assert_eq!(interface.writes_to(0x0C), vec![0, 0b10, 0]);
}

#[test]
fn test_staged_reconfiguration() {
    let (mut driver, interface) = create_mock_driver();
    driver.configure(GeneratorConfig::default()).unwrap();
    interface.clear_operations();

    driver
        .set_named("PacketLength", Value::UInt(64), false)
        .unwrap();
    driver
        .set_named("TxRate", Value::Float(2.5e6), false)
        .unwrap();
    driver.set_named("TxEn", Value::Bool(true), false).unwrap();
    assert_eq!(interface.write_count(), 0);

    driver.commit().unwrap();

    assert_eq!(interface.get_u32(0x04), 64);
    assert_eq!(interface.get_u32(0x08), 49);
    assert!(driver.tx_enabled().unwrap());
    assert_float_eq(driver.get_rate().unwrap(), 2.5e6, 1e-6);
}

#[test]
fn test_disable_rate() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .configure(GeneratorConfig {
            tx_rate_hz: 0.0,
            ..GeneratorConfig::default()
        })
        .unwrap();

    assert_eq!(interface.get_u32(0x08), 0xFFFF_FFFF);
    assert!(driver.get_rate().unwrap() < 0.03);
}
