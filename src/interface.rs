//! Memory-mapped bus interface
//!
//! This module provides a `device-driver` register interface for a rate
//! generator mapped directly into the CPU address space (for example an
//! AXI-Lite slave behind a Zynq GP port, or a UIO mapping on Linux).
//!
//! The block only supports 32-bit word accesses. 64-bit registers are
//! transferred as two words, low word first.

use core::ptr::NonNull;

use device_driver::RegisterInterface;

/// Bus word size in bytes
const WORD_BYTES: usize = 4;

/// Errors raised by [`MmioInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MmioError {
    /// Register address is not word aligned
    Misaligned(u8),
    /// Access size is not a whole number of 32-bit words
    UnsupportedSize(u32),
}

/// Memory-mapped interface for the rate generator
pub struct MmioInterface {
    base: NonNull<u32>,
}

impl MmioInterface {
    /// Create an interface for a block mapped at `base`
    ///
    /// # Safety
    ///
    /// `base` must point to the rate generator's register window, mapped
    /// for volatile reads and writes and at least 0x48 bytes long, for the
    /// whole lifetime of the interface. No other code may access the window
    /// while the interface exists.
    #[must_use]
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }

    /// Base address of the register window
    #[must_use]
    pub const fn base(&self) -> NonNull<u32> {
        self.base
    }

    fn check(address: u8, size_bits: u32, len: usize) -> Result<(), MmioError> {
        if usize::from(address) % WORD_BYTES != 0 {
            return Err(MmioError::Misaligned(address));
        }
        if size_bits == 0 || size_bits % 32 != 0 || len != WORD_BYTES * (size_bits as usize / 32)
        {
            return Err(MmioError::UnsupportedSize(size_bits));
        }
        Ok(())
    }

    fn word(&self, address: u8, index: usize) -> *mut u32 {
        // SAFETY: the constructor contract covers the whole register window
        // and `check` keeps the offset word aligned.
        unsafe { self.base.as_ptr().add(usize::from(address) / WORD_BYTES + index) }
    }
}

impl RegisterInterface for MmioInterface {
    type Error = MmioError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        Self::check(address, size_bits, read_data.len())?;

        for (i, chunk) in read_data.chunks_exact_mut(WORD_BYTES).enumerate() {
            // SAFETY: see `MmioInterface::new`
            let value = unsafe { self.word(address, i).read_volatile() };
            chunk.copy_from_slice(&value.to_le_bytes());
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        Self::check(address, size_bits, write_data.len())?;

        for (i, chunk) in write_data.chunks_exact(WORD_BYTES).enumerate() {
            let value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            // SAFETY: see `MmioInterface::new`
            unsafe { self.word(address, i).write_volatile(value) };
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl device_driver::AsyncRegisterInterface for MmioInterface {
    type Error = MmioError;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        // Volatile accesses complete immediately
        RegisterInterface::read_register(self, address, size_bits, read_data)
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        RegisterInterface::write_register(self, address, size_bits, write_data)
    }
}
