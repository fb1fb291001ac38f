#![allow(unsafe_code)]

use crate::devapc::error::ConfigError;

/// A register access the bus did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault {
    pub address: usize,
}

impl core::fmt::Display for BusFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bus fault at {:#010x}", self.address)
    }
}

impl From<BusFault> for ConfigError {
    fn from(fault: BusFault) -> Self {
        ConfigError::RegisterAccessFailed {
            address: fault.address,
        }
    }
}

/// Word access to the controller's memory-mapped register window.
///
/// Addresses are opaque integers. No endian conversion happens here.
pub trait RegisterAccess {
    fn read32(&mut self, address: usize) -> Result<u32, BusFault>;
    fn write32(&mut self, address: usize, value: u32) -> Result<(), BusFault>;

    /// Read-modify-write of one register.
    fn modify32(&mut self, address: usize, f: impl FnOnce(u32) -> u32) -> Result<u32, BusFault>
    where
        Self: Sized,
    {
        let value = f(self.read32(address)?);
        self.write32(address, value)?;
        Ok(value)
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    #[inline]
    fn read32(&mut self, address: usize) -> Result<u32, BusFault> {
        (**self).read32(address)
    }

    #[inline]
    fn write32(&mut self, address: usize, value: u32) -> Result<(), BusFault> {
        (**self).write32(address, value)
    }
}

/// Volatile access to a physical register window.
///
/// Accesses outside `[base, base + len)` or not word aligned are reported
/// as bus faults instead of being issued.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
    len: usize,
}

impl Mmio {
    /// # Safety
    /// `base..base + len` must be mapped device memory belonging to the
    /// access controller for as long as this value lives, and nothing else
    /// may access it concurrently.
    pub const unsafe fn new(base: usize, len: usize) -> Self {
        Self { base, len }
    }

    fn check(&self, address: usize) -> Result<*mut u32, BusFault> {
        let in_window = address >= self.base
            && address
                .checked_add(4)
                .is_some_and(|end| end <= self.base + self.len);
        if !in_window || address % 4 != 0 {
            return Err(BusFault { address });
        }
        Ok(address as *mut u32)
    }
}

impl RegisterAccess for Mmio {
    fn read32(&mut self, address: usize) -> Result<u32, BusFault> {
        let ptr = self.check(address)?;
        // SAFETY: `check` keeps the access inside the window promised by `new`.
        Ok(unsafe { core::ptr::read_volatile(ptr) })
    }

    fn write32(&mut self, address: usize, value: u32) -> Result<(), BusFault> {
        let ptr = self.check(address)?;
        // SAFETY: as above.
        unsafe { core::ptr::write_volatile(ptr, value) };
        Ok(())
    }
}
