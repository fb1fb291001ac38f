/// Errors raised while building or programming a permission table.
///
/// Every variant is fatal to the boot path: a partially applied table
/// must not be run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Region name is not in the catalog.
    UnknownRegion,
    /// Two descriptors in one region share this slave index.
    DuplicateSlave(u16),
    /// Slave index is not below the region's slave count.
    SlaveOutOfRange(u16),
    /// Region has more slaves than a table can hold.
    TableTooLarge,
    /// Field width and row size do not pack into a 32-bit register.
    InvalidGeometry,
    /// The register window reported a bus fault.
    RegisterAccessFailed { address: usize },
    /// Read-back still differs after every retry.
    VerificationMismatch { slave: u16, domain: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::UnknownRegion => write!(f, "unknown region"),
            ConfigError::DuplicateSlave(index) => write!(f, "duplicate slave index {}", index),
            ConfigError::SlaveOutOfRange(index) => {
                write!(f, "slave index {} exceeds region slave count", index)
            }
            ConfigError::TableTooLarge => write!(f, "region exceeds table capacity"),
            ConfigError::InvalidGeometry => write!(f, "region geometry does not fill a register"),
            ConfigError::RegisterAccessFailed { address } => {
                write!(f, "bus fault accessing register {:#010x}", address)
            }
            ConfigError::VerificationMismatch { slave, domain } => write!(
                f,
                "read-back mismatch for slave {} domain {}",
                slave, domain
            ),
        }
    }
}

/// Errors raised while decoding a permission field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Bit pattern does not correspond to any permission.
    ReservedEncoding(u32),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::ReservedEncoding(bits) => write!(f, "reserved encoding {:#x}", bits),
        }
    }
}
