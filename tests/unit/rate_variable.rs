//! Unit tests for the derived TxRate variable

use crate::common::test_utils::{CLOCK_HZ, assert_float_eq};
use crate::common::{Operation, create_mock_driver};
use crate::common::mock_interface::MockInterface;
use ssi_prbs_rategen::{Field, RAW_PERIOD_MAX, RateConfig, RateGenDriver, Value};

#[test]
#[allow(clippy::float_cmp)]
fn test_set_rate_example() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_rate(1000.0, true).unwrap();

    assert_eq!(interface.get_u32(0x08), 124_999);
    assert_eq!(driver.get_rate().unwrap(), 1000.0);
}

#[test]
fn test_set_rate_single_write() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_rate(12_345.0, true).unwrap();

    assert_eq!(
        interface.operations(),
        vec![Operation::Write {
            address: 0x08,
            size_bits: 32,
            value: 10_124
        }]
    );
}

#[test]
fn test_non_positive_rate_selects_max_period() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_rate(0.0, true).unwrap();
    assert_eq!(interface.get_u32(0x08), RAW_PERIOD_MAX);

    interface.set_u32(0x08, 0);
    driver.set_rate(-5.0, true).unwrap();
    assert_eq!(interface.get_u32(0x08), RAW_PERIOD_MAX);
}

#[test]
fn test_rate_above_clock_clamps_to_zero() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x08, 77);

    driver.set_rate(2.0e9, true).unwrap();
    assert_eq!(interface.get_u32(0x08), 0);
}

#[test]
fn test_very_slow_rate_clamps_to_max() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_rate(0.001, true).unwrap();
    assert_eq!(interface.get_u32(0x08), RAW_PERIOD_MAX);
}

#[test]
fn test_get_rate_at_max_period() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x08, RAW_PERIOD_MAX);

    let rate = driver.get_rate().unwrap();
    assert!(rate.is_finite());
    assert_float_eq(rate, CLOCK_HZ / 4_294_967_296.0, 1e-12);
}

#[test]
fn test_get_rate_decreasing_in_period() {
    let (mut driver, interface) = create_mock_driver();

    let mut previous = f64::INFINITY;
    for period in [0u32, 1, 7, 124_999, 1 << 24, RAW_PERIOD_MAX - 1, RAW_PERIOD_MAX] {
        interface.set_u32(0x08, period);
        let rate = driver.get_rate().unwrap();
        assert_float_eq(rate, CLOCK_HZ / (f64::from(period) + 1.0), 1e-9);
        assert!(rate < previous, "rate not decreasing at period {period}");
        previous = rate;
    }
}

#[test]
fn test_rate_round_trip() {
    let (mut driver, _interface) = create_mock_driver();

    for rate in [1.0, 10.0, 1000.0, 44_100.0, 1.0e6] {
        driver.set_rate(rate, true).unwrap();
        let back = driver.get_rate().unwrap();
        // Truncation makes the period at most one cycle short
        let period = f64::from(RateConfig::new(CLOCK_HZ).period_from_rate(rate));
        let step = CLOCK_HZ / period - CLOCK_HZ / (period + 1.0);
        assert!(back >= rate - 1e-9);
        assert!(back - rate <= step, "rate {rate} came back as {back}");
    }
}

#[test]
fn test_staged_rate_does_not_change_reading() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_u32(0x08, 124_999);

    driver.set_rate(50.0, false).unwrap();

    assert_eq!(interface.write_count(), 0);
    assert_eq!(
        driver.staged(Field::RawPeriod),
        Some(Value::UInt(2_499_999))
    );
    assert_float_eq(driver.get_rate().unwrap(), 1000.0, 1e-9);

    driver.commit().unwrap();
    assert_float_eq(driver.get_rate().unwrap(), 50.0, 1e-9);
}

#[test]
fn test_custom_clock() {
    let interface = MockInterface::new();
    let mut driver = RateGenDriver::new(interface.clone(), RateConfig::new(156.25e6));

    driver.set_rate(1.0e6, true).unwrap();
    assert_eq!(interface.get_u32(0x08), 155);
    assert_float_eq(driver.get_rate().unwrap(), 156.25e6 / 156.0, 1e-6);
    assert_float_eq(driver.config().clock_freq_hz, 156.25e6, 1e-6);
}
