//! Frequency/period conversion for the generator pacing register
//!
//! The hardware paces frames with a clock divider: a frame is emitted every
//! `RawPeriod + 1` reference clock cycles. Operators think in frames per
//! second, so the driver presents the divider as the derived `TxRate`
//! variable:
//!
//! ```text
//! TxRate    = clock_freq / (RawPeriod + 1)
//! RawPeriod = floor(clock_freq / TxRate) - 1
//! ```
//!
//! Nothing is cached. The rate is recomputed from `RawPeriod` on every read
//! and decomposed back into `RawPeriod` on every write.

use crate::{DEFAULT_CLOCK_FREQ_HZ, RAW_PERIOD_MAX};

/// Convert a `RawPeriod` register value to a frame rate in Hz
///
/// `raw_period + 1` is computed in `f64`, so `0xFFFF_FFFF` yields the
/// slowest representable rate rather than wrapping to a division by zero.
#[must_use]
pub fn rate_from_period(clock_freq_hz: f64, raw_period: u32) -> f64 {
    clock_freq_hz / (f64::from(raw_period) + 1.0)
}

/// Convert a requested frame rate in Hz to a `RawPeriod` register value
///
/// - Rates `<= 0` (and NaN) select `0xFFFF_FFFF`, the slowest pacing.
/// - Rates too slow for 32 bits clamp to `0xFFFF_FFFF`.
/// - Rates faster than the reference clock clamp to `0` (one frame per cycle).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn period_from_rate(clock_freq_hz: f64, rate_hz: f64) -> u32 {
    if rate_hz.is_nan() || rate_hz <= 0.0 {
        return RAW_PERIOD_MAX;
    }

    let period = libm::floor(clock_freq_hz / rate_hz) - 1.0;

    if period >= f64::from(RAW_PERIOD_MAX) {
        RAW_PERIOD_MAX
    } else if period <= 0.0 {
        0
    } else {
        // In range (0, 2^32 - 1) and already integral
        period as u32
    }
}

/// Rate conversion configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RateConfig {
    /// Reference clock driving the period counter, in Hz
    pub clock_freq_hz: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            clock_freq_hz: DEFAULT_CLOCK_FREQ_HZ,
        }
    }
}

impl RateConfig {
    /// Create a configuration for the given reference clock
    #[must_use]
    pub const fn new(clock_freq_hz: f64) -> Self {
        Self { clock_freq_hz }
    }

    /// Frame rate in Hz for a `RawPeriod` value
    #[must_use]
    pub fn rate_from_period(&self, raw_period: u32) -> f64 {
        rate_from_period(self.clock_freq_hz, raw_period)
    }

    /// `RawPeriod` value for a frame rate in Hz (clamped, never fails)
    #[must_use]
    pub fn period_from_rate(&self, rate_hz: f64) -> u32 {
        period_from_rate(self.clock_freq_hz, rate_hz)
    }

    /// Slowest representable rate (`RawPeriod = 0xFFFF_FFFF`)
    #[must_use]
    pub fn min_rate_hz(&self) -> f64 {
        self.rate_from_period(RAW_PERIOD_MAX)
    }

    /// Fastest representable rate (`RawPeriod = 0`)
    #[must_use]
    pub fn max_rate_hz(&self) -> f64 {
        self.rate_from_period(0)
    }
}
