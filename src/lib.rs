#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod command;
pub mod device;
pub mod fields;
pub mod interface;
pub mod rate;
pub mod registers;

// Re-export main types
pub use command::{Command, ToggleState};
pub use device::{GeneratorConfig, RateGenDriver, Statistics};
pub use fields::{
    Base, Disp, FIELDS, Field, FieldInfo, Mode, TX_RATE_NAME, UnknownField, Value, polled_fields,
};
pub use interface::{MmioError, MmioInterface};
pub use rate::{RateConfig, period_from_rate, rate_from_period};

/// Default reference clock of the rate generator (125 MHz)
pub const DEFAULT_CLOCK_FREQ_HZ: f64 = 125.0e6;

/// Largest `RawPeriod` value, also selected for rates `<= 0`
pub const RAW_PERIOD_MAX: u32 = 0xFFFF_FFFF;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error on the register bus
    Bus(E),
    /// Write attempted on a read-only field
    ReadOnly(Field),
    /// Value type does not match the field (e.g. `Bool` for an integer field)
    TypeMismatch(Field),
    /// Value does not fit in the field's bit width
    OutOfRange(Field),
    /// Name matches neither a register field nor `TxRate`
    UnknownVariable,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
