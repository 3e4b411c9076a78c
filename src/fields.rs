//! Field table and name-based access types
//!
//! Every addressable field of the rate generator is described once in
//! [`FIELDS`], together with the presentation metadata an operator layer
//! needs (poll interval, display format, units). The typed register
//! accessors live in [`crate::registers`]; this table is what name-based
//! access (`get_named` / `set_named`) and external pollers work from.

use core::fmt::Write;
use core::str::FromStr;

use crate::command::Command;

/// Name of the derived rate variable
pub const TX_RATE_NAME: &str = "TxRate";

/// Display format of the derived rate variable
pub const TX_RATE_DISP: Disp = Disp::Fixed3;

/// Units of the derived rate variable
pub const TX_RATE_UNITS: &str = "Hz";

/// Number of register fields in the block
pub const FIELD_COUNT: usize = 13;

/// Register fields of the rate generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Statistics reset command (0x00, bit 0)
    StatReset = 0,
    /// Frames per packet (0x04)
    PacketLength = 1,
    /// Period divider count (0x08), backs `TxRate`
    RawPeriod = 2,
    /// Generator enable (0x0C, bit 0)
    TxEn = 3,
    /// One-shot burst command (0x0C, bit 1)
    OneShot = 4,
    /// Missed frame counter (0x10)
    Missed = 5,
    /// Instantaneous frame rate (0x14)
    FrameRate = 6,
    /// Highest observed frame rate (0x18)
    FrameRateMax = 7,
    /// Lowest observed frame rate (0x1C)
    FrameRateMin = 8,
    /// Instantaneous bandwidth (0x20)
    BandWidth = 9,
    /// Highest observed bandwidth (0x28)
    BandWidthMax = 10,
    /// Lowest observed bandwidth (0x30)
    BandWidthMin = 11,
    /// Cumulative frame count (0x40)
    FrameCount = 12,
}

/// Underlying value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Base {
    /// Unsigned integer of `bit_size` bits
    UInt,
    /// Single-bit boolean
    Bool,
}

/// Access mode of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Read-only (status and statistics)
    ReadOnly,
    /// Read-write configuration
    ReadWrite,
    /// Write-triggered toggle command
    Command,
}

/// Display format for operator-facing values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Disp {
    /// Hexadecimal with `0x` prefix (`{:#x}`), the default for integers
    Hex,
    /// Plain decimal (`{:d}`)
    Decimal,
    /// Fixed point with three decimals (`{:0.3f}`)
    Fixed3,
    /// `True` / `False`
    Bool,
}

/// Static description of one register field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldInfo {
    /// Field identifier
    pub field: Field,
    /// Operator-facing name
    pub name: &'static str,
    /// Byte offset of the containing register
    pub offset: u8,
    /// Bit offset within the register
    pub bit_offset: u8,
    /// Width in bits
    pub bit_size: u8,
    /// Value type
    pub base: Base,
    /// Access mode
    pub mode: Mode,
    /// Poll interval in seconds, if the field should be sampled periodically
    pub poll_interval: Option<u32>,
    /// Display format
    pub disp: Disp,
    /// Unit label
    pub units: Option<&'static str>,
}

impl FieldInfo {
    /// Largest value the field can hold
    #[must_use]
    pub const fn max_value(&self) -> u64 {
        if self.bit_size >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bit_size) - 1
        }
    }

    /// Whether the field accepts writes
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        !matches!(self.mode, Mode::ReadOnly)
    }
}

const fn control(
    field: Field,
    name: &'static str,
    offset: u8,
    bit_offset: u8,
    bit_size: u8,
    base: Base,
    mode: Mode,
) -> FieldInfo {
    FieldInfo {
        field,
        name,
        offset,
        bit_offset,
        bit_size,
        base,
        mode,
        poll_interval: None,
        disp: match base {
            Base::UInt => Disp::Hex,
            Base::Bool => Disp::Bool,
        },
        units: None,
    }
}

const fn statistic(
    field: Field,
    name: &'static str,
    offset: u8,
    bit_size: u8,
    disp: Disp,
    units: Option<&'static str>,
) -> FieldInfo {
    FieldInfo {
        field,
        name,
        offset,
        bit_offset: 0,
        bit_size,
        base: Base::UInt,
        mode: Mode::ReadOnly,
        poll_interval: Some(1),
        disp,
        units,
    }
}

/// Field table, indexed by `Field as usize`
pub static FIELDS: [FieldInfo; FIELD_COUNT] = [
    control(Field::StatReset, "StatReset", 0x00, 0, 1, Base::UInt, Mode::Command),
    control(Field::PacketLength, "PacketLength", 0x04, 0, 32, Base::UInt, Mode::ReadWrite),
    control(Field::RawPeriod, "RawPeriod", 0x08, 0, 32, Base::UInt, Mode::ReadWrite),
    control(Field::TxEn, "TxEn", 0x0C, 0, 1, Base::Bool, Mode::ReadWrite),
    control(Field::OneShot, "OneShot", 0x0C, 1, 1, Base::UInt, Mode::Command),
    statistic(Field::Missed, "Missed", 0x10, 32, Disp::Decimal, None),
    statistic(Field::FrameRate, "FrameRate", 0x14, 32, Disp::Decimal, Some("Hz")),
    statistic(Field::FrameRateMax, "FrameRateMax", 0x18, 32, Disp::Decimal, None),
    statistic(Field::FrameRateMin, "FrameRateMin", 0x1C, 32, Disp::Decimal, None),
    statistic(Field::BandWidth, "BandWidth", 0x20, 64, Disp::Hex, None),
    statistic(Field::BandWidthMax, "BandWidthMax", 0x28, 64, Disp::Hex, None),
    statistic(Field::BandWidthMin, "BandWidthMin", 0x30, 64, Disp::Hex, None),
    statistic(Field::FrameCount, "FrameCount", 0x40, 64, Disp::Hex, None),
];

impl Field {
    /// All fields in table order
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::StatReset,
        Self::PacketLength,
        Self::RawPeriod,
        Self::TxEn,
        Self::OneShot,
        Self::Missed,
        Self::FrameRate,
        Self::FrameRateMax,
        Self::FrameRateMin,
        Self::BandWidth,
        Self::BandWidthMax,
        Self::BandWidthMin,
        Self::FrameCount,
    ];

    /// Static description of this field
    #[must_use]
    pub fn info(self) -> &'static FieldInfo {
        &FIELDS[self as usize]
    }

    /// Operator-facing name
    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The toggle command backed by this field, if any
    #[must_use]
    pub const fn command(self) -> Option<Command> {
        match self {
            Self::StatReset => Some(Command::StatReset),
            Self::OneShot => Some(Command::OneShot),
            _ => None,
        }
    }
}

/// Returned when a name matches no field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownField;

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("unknown field name")
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FIELDS
            .iter()
            .find(|info| info.name == s)
            .map(|info| info.field)
            .ok_or(UnknownField)
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields that should be sampled periodically, in table order
pub fn polled_fields() -> impl Iterator<Item = &'static FieldInfo> {
    FIELDS.iter().filter(|info| info.poll_interval.is_some())
}

/// A field or variable value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    /// Unsigned integer field value
    UInt(u64),
    /// Boolean field value
    Bool(bool),
    /// Derived floating point value (`TxRate`)
    Float(f64),
}

impl Value {
    /// Integer payload, if this is a `UInt`
    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Bool`
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`
    #[must_use]
    pub const fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Render the value for display, with an optional unit suffix
    ///
    /// # Errors
    ///
    /// Returns `core::fmt::Error` if the rendering does not fit the buffer
    /// (only possible for extreme float magnitudes).
    pub fn format(
        self,
        disp: Disp,
        units: Option<&str>,
    ) -> Result<heapless::String<48>, core::fmt::Error> {
        let mut out = heapless::String::new();

        match (self, disp) {
            (Self::Bool(v), _) => out.write_str(if v { "True" } else { "False" })?,
            (Self::UInt(v), Disp::Hex) => write!(out, "{v:#x}")?,
            (Self::UInt(v), Disp::Decimal | Disp::Bool) => write!(out, "{v}")?,
            #[allow(clippy::cast_precision_loss)]
            (Self::UInt(v), Disp::Fixed3) => write!(out, "{:.3}", v as f64)?,
            (Self::Float(v), _) => write!(out, "{v:.3}")?,
        }

        if let Some(units) = units {
            write!(out, " {units}")?;
        }

        Ok(out)
    }
}
