//! Bitfield packing shared by the programmer and the violation monitor.
//!
//! A register row packs `slaves_per_row` fields of `bits_per_slave` bits
//! each into one 32-bit word. Slave `i` lives in row
//! `i / slaves_per_row` at bit offset `(i % slaves_per_row) * bits_per_slave`.
//! The same [`FieldLayout`] describes both the 2-bit permission fields and the
//! 1-bit violation status latches, so both sides always agree on placement.

use crate::devapc::{
    error::{ConfigError, DecodeError},
    policy::Permission,
};

/// Width of one hardware register in bits.
pub const REGISTER_BITS: u32 = 32;

/// Row and bit offset of one slave's field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPosition {
    pub row: u16,
    pub offset: u8,
}

/// Packing of per-slave fields into 32-bit register rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    slaves_per_row: u16,
    bits_per_slave: u8,
}

impl FieldLayout {
    /// 2-bit permission fields, 16 slaves per row.
    pub const PERMISSION: FieldLayout = FieldLayout {
        slaves_per_row: 16,
        bits_per_slave: 2,
    };

    /// 1-bit violation status latches, 32 slaves per row.
    pub const STATUS: FieldLayout = FieldLayout {
        slaves_per_row: 32,
        bits_per_slave: 1,
    };

    /// Creates a layout, rejecting any that does not fill a register exactly.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidGeometry`] - if `slaves_per_row * bits_per_slave != 32`
    pub const fn new(slaves_per_row: u16, bits_per_slave: u8) -> Result<Self, ConfigError> {
        if bits_per_slave == 0 || slaves_per_row as u32 * bits_per_slave as u32 != REGISTER_BITS
        {
            return Err(ConfigError::InvalidGeometry);
        }
        Ok(Self {
            slaves_per_row,
            bits_per_slave,
        })
    }

    #[inline]
    pub const fn slaves_per_row(&self) -> u16 {
        self.slaves_per_row
    }

    #[inline]
    pub const fn bits_per_slave(&self) -> u8 {
        self.bits_per_slave
    }

    /// Unshifted mask covering one field.
    #[inline]
    pub const fn mask(&self) -> u32 {
        if self.bits_per_slave as u32 >= REGISTER_BITS {
            u32::MAX
        } else {
            (1u32 << self.bits_per_slave) - 1
        }
    }

    /// Number of rows needed to hold `total_slaves` fields.
    #[inline]
    pub const fn rows_for(&self, total_slaves: u16) -> u16 {
        total_slaves.div_ceil(self.slaves_per_row)
    }

    /// Position of `slave_index`'s field.
    ///
    /// # Example
    /// ```
    /// use apusys_devapc::devapc::codec::{FieldLayout, FieldPosition};
    ///
    /// let pos = FieldLayout::PERMISSION.locate(29);
    /// assert_eq!(pos, FieldPosition { row: 1, offset: 26 });
    /// ```
    #[inline]
    pub const fn locate(&self, slave_index: u16) -> FieldPosition {
        FieldPosition {
            row: slave_index / self.slaves_per_row,
            offset: ((slave_index % self.slaves_per_row) as u32 * self.bits_per_slave as u32)
                as u8,
        }
    }

    /// Inverse of [`Self::locate`].
    ///
    /// Returns `None` if `pos` is not the start of a field or the index
    /// does not fit in `u16`.
    pub const fn index_of(&self, pos: FieldPosition) -> Option<u16> {
        let offset = pos.offset as u32;
        let bits = self.bits_per_slave as u32;
        if offset >= REGISTER_BITS || offset % bits != 0 {
            return None;
        }
        let index = pos.row as u32 * self.slaves_per_row as u32 + offset / bits;
        if index > u16::MAX as u32 {
            return None;
        }
        Some(index as u16)
    }

    /// Reads the field at `pos` out of a row value.
    #[inline]
    pub const fn extract(&self, word: u32, pos: FieldPosition) -> u32 {
        (word >> pos.offset) & self.mask()
    }

    /// Replaces the field at `pos` in a row value, leaving the other fields intact.
    #[inline]
    pub const fn insert(&self, word: u32, pos: FieldPosition, bits: u32) -> u32 {
        let mask = self.mask() << pos.offset;
        (word & !mask) | ((bits << pos.offset) & mask)
    }
}

/// Hardware encoding of a permission.
#[inline]
pub const fn encode(permission: Permission) -> u32 {
    permission as u32
}

/// Permission for a raw field value.
///
/// # Errors
/// * [`DecodeError::ReservedEncoding`] - if `bits` names no permission
pub const fn decode(bits: u32) -> Result<Permission, DecodeError> {
    match bits {
        0 => Ok(Permission::NoProtection),
        1 => Ok(Permission::SecRwOnly),
        2 => Ok(Permission::SecRwNsR),
        3 => Ok(Permission::Forbidden),
        other => Err(DecodeError::ReservedEncoding(other)),
    }
}
