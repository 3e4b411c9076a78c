//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use ssi_prbs_rategen::{RateConfig, RateGenDriver};

/// Reference clock used throughout the tests
pub const CLOCK_HZ: f64 = 125.0e6;

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (RateGenDriver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = RateGenDriver::new(interface, RateConfig::new(CLOCK_HZ));
    (driver, interface_clone)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
