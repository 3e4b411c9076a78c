//! Toggle commands
//!
//! The statistics reset and one-shot trigger are edge sensitive. Each
//! invocation writes the complement of the bit written last time, so every
//! call produces an edge the firmware can observe without the caller keeping
//! track of the line level.

use crate::fields::Field;

/// Write-triggered commands of the rate generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Clear the frame and bandwidth statistics
    StatReset,
    /// Emit a single burst
    OneShot,
}

impl Command {
    /// All commands
    pub const ALL: [Self; 2] = [Self::StatReset, Self::OneShot];

    /// Register field driven by this command
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::StatReset => Field::StatReset,
            Self::OneShot => Field::OneShot,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::StatReset => 0,
            Self::OneShot => 1,
        }
    }
}

/// Last bit written to a toggle command field
///
/// Starts at 0, so the first toggle writes 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToggleState {
    last: u8,
}

impl ToggleState {
    /// Bit most recently written
    #[must_use]
    pub const fn last(self) -> u8 {
        self.last
    }

    /// Bit the next toggle will write
    #[must_use]
    pub const fn next(self) -> u8 {
        self.last ^ 1
    }

    /// Record a bit that reached the hardware
    pub fn record(&mut self, bit: u8) {
        self.last = bit & 1;
    }
}
