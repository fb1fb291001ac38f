use heapless::Vec;

use crate::devapc::{
    codec::FieldLayout,
    error::ConfigError,
    policy::{DomainId, MAX_DOMAINS, SlavePolicy},
};

/// Upper bound on slaves in one region.
pub const MAX_SLAVES: usize = 128;

/// One slave and the policy applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaveDescriptor {
    pub index: u16,
    pub name: &'static str,
    pub policy: SlavePolicy,
}

impl SlaveDescriptor {
    pub const fn new(index: u16, name: &'static str, policy: SlavePolicy) -> Self {
        Self {
            index,
            name,
            policy,
        }
    }
}

/// Size of a region's permission register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionGeometry {
    pub total_slaves: u16,
    pub domain_count: u8,
    pub slaves_per_row: u16,
    pub bits_per_slave: u8,
}

impl RegionGeometry {
    /// Geometry with the platform's 16 slaves per row at 2 bits each.
    pub const fn standard(total_slaves: u16, domain_count: u8) -> Self {
        Self {
            total_slaves,
            domain_count,
            slaves_per_row: FieldLayout::PERMISSION.slaves_per_row(),
            bits_per_slave: FieldLayout::PERMISSION.bits_per_slave(),
        }
    }
}

/// Where a region's permission registers live.
///
/// Domain `d`, row `r` is at `base + d * domain_stride + r * row_stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    pub base: usize,
    pub domain_stride: usize,
    pub row_stride: usize,
}

impl RegisterLayout {
    #[inline]
    pub const fn address(&self, domain: DomainId, row: u16) -> usize {
        self.base + domain.index() * self.domain_stride + row as usize * self.row_stride
    }
}

/// Where a region's violation mask, status and debug registers live.
///
/// Mask and status rows hold one bit per slave, 32 slaves per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationLayout {
    pub mask_base: usize,
    pub status_base: usize,
    pub row_stride: usize,
    /// Violating domain and access kind.
    pub debug0: usize,
    /// Violating bus address.
    pub debug1: usize,
}

impl ViolationLayout {
    #[inline]
    pub const fn mask_address(&self, row: u16) -> usize {
        self.mask_base + row as usize * self.row_stride
    }

    #[inline]
    pub const fn status_address(&self, row: u16) -> usize {
        self.status_base + row as usize * self.row_stride
    }
}

/// Static description of a region as supplied by the catalog.
#[derive(Debug, Clone, Copy)]
pub struct RegionConfig {
    pub name: &'static str,
    pub geometry: RegionGeometry,
    pub registers: RegisterLayout,
    pub violation: ViolationLayout,
    pub slaves: &'static [SlaveDescriptor],
}

/// A validated power-domain region, slaves sorted by index.
#[derive(Debug, Clone)]
pub struct DomainRegion {
    name: &'static str,
    geometry: RegionGeometry,
    layout: FieldLayout,
    registers: RegisterLayout,
    violation: ViolationLayout,
    slaves: Vec<SlaveDescriptor, MAX_SLAVES>,
}

impl DomainRegion {
    /// Validates `config` and builds the region.
    ///
    /// Runs before any register is touched so that a bad table never
    /// reaches hardware.
    ///
    /// # Errors
    /// * [`ConfigError::InvalidGeometry`] - row packing or domain count is invalid
    /// * [`ConfigError::TableTooLarge`] - more than [`MAX_SLAVES`] slaves
    /// * [`ConfigError::SlaveOutOfRange`] - an index is not below `total_slaves`
    /// * [`ConfigError::DuplicateSlave`] - two descriptors share an index
    pub fn build(config: &RegionConfig) -> Result<Self, ConfigError> {
        Self::from_parts(
            config.name,
            config.geometry,
            config.registers,
            config.violation,
            config.slaves,
        )
    }

    pub fn from_parts(
        name: &'static str,
        geometry: RegionGeometry,
        registers: RegisterLayout,
        violation: ViolationLayout,
        slaves: &[SlaveDescriptor],
    ) -> Result<Self, ConfigError> {
        let layout = FieldLayout::new(geometry.slaves_per_row, geometry.bits_per_slave)?;
        if geometry.domain_count as usize > MAX_DOMAINS {
            return Err(ConfigError::InvalidGeometry);
        }
        if geometry.total_slaves as usize > MAX_SLAVES || slaves.len() > MAX_SLAVES {
            return Err(ConfigError::TableTooLarge);
        }

        let mut seen = bitmaps::Bitmap::<MAX_SLAVES>::new();
        let mut sorted: Vec<SlaveDescriptor, MAX_SLAVES> = Vec::new();
        for slave in slaves {
            if slave.index >= geometry.total_slaves {
                return Err(ConfigError::SlaveOutOfRange(slave.index));
            }
            if seen.set(slave.index as usize, true) {
                return Err(ConfigError::DuplicateSlave(slave.index));
            }
            sorted
                .push(*slave)
                .map_err(|_| ConfigError::TableTooLarge)?;
        }
        sorted.sort_unstable_by_key(|s| s.index);

        Ok(Self {
            name,
            geometry,
            layout,
            registers,
            violation,
            slaves: sorted,
        })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn geometry(&self) -> &RegionGeometry {
        &self.geometry
    }

    #[inline]
    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    #[inline]
    pub fn registers(&self) -> &RegisterLayout {
        &self.registers
    }

    #[inline]
    pub fn violation(&self) -> &ViolationLayout {
        &self.violation
    }

    #[inline]
    pub fn total_slaves(&self) -> u16 {
        self.geometry.total_slaves
    }

    /// Slaves in ascending index order.
    #[inline]
    pub fn slaves(&self) -> &[SlaveDescriptor] {
        &self.slaves
    }

    pub fn slave(&self, index: u16) -> Option<&SlaveDescriptor> {
        self.slaves
            .binary_search_by_key(&index, |s| s.index)
            .ok()
            .map(|i| &self.slaves[i])
    }

    pub fn domains(&self) -> impl Iterator<Item = DomainId> + use<> {
        (0..self.geometry.domain_count).map(DomainId)
    }

    /// Number of permission rows per domain.
    #[inline]
    pub fn rows(&self) -> u16 {
        self.layout.rows_for(self.geometry.total_slaves)
    }
}
