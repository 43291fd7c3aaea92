//! Memory-mapped register access.
//!
//! All device register access in the RW612 backend goes through [`MmioRegion`].

use core::ptr::{read_volatile, write_volatile};

/// A block of device registers starting at `base`.
///
/// # Example
/// ```rust,ignore
/// let gpio = unsafe { MmioRegion::new(0x4010_0000) };
/// gpio.write8(0x01, 1);
/// let dir = gpio.read32(0x2000);
/// ```
#[derive(Clone, Copy)]
pub struct MmioRegion {
    base: usize,
}

impl MmioRegion {
    /// # Safety
    ///
    /// `base` must be the address of a device register block, and every offset later
    /// passed to this region must name a register inside it.
    #[inline]
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline]
    pub fn read8(&self, offset: usize) -> u8 {
        // SAFETY: `new` requires the region to cover device registers
        unsafe { read_volatile((self.base + offset) as *const u8) }
    }

    #[inline]
    pub fn write8(&self, offset: usize, value: u8) {
        // SAFETY: see read8
        unsafe { write_volatile((self.base + offset) as *mut u8, value) }
    }

    #[inline]
    pub fn read32(&self, offset: usize) -> u32 {
        // SAFETY: see read8
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    pub fn write32(&self, offset: usize, value: u32) {
        // SAFETY: see read8
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    /// Read-modify-write a 32-bit register.
    #[inline]
    pub fn modify32<F>(&self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }

    /// Spin until `(register & mask) == expected`.
    #[inline]
    pub fn wait32(&self, offset: usize, mask: u32, expected: u32) {
        while self.read32(offset) & mask != expected {
            core::hint::spin_loop();
        }
    }
}
