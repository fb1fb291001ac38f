//! Test support utilities - only compiled in test builds.

use crate::devapc::{
    monitor::ViolationRecord,
    policy::{DomainId, SlavePolicy},
    regs::{BusFault, RegisterAccess},
    report::Reporter,
    table::{DomainRegion, RegionGeometry, RegisterLayout, SlaveDescriptor, ViolationLayout},
};

/// Number of words backing a [`FakeRegisters`] window.
pub const FAKE_WORDS: usize = 512;

/// Synthetic register block: 4 domains, 0x20 bytes apart.
pub const TEST_REGISTERS: RegisterLayout = RegisterLayout {
    base: 0x1000,
    domain_stride: 0x20,
    row_stride: 4,
};

pub const TEST_VIOLATION: ViolationLayout = ViolationLayout {
    mask_base: 0x1100,
    status_base: 0x1140,
    row_stride: 4,
    debug0: 0x1180,
    debug1: 0x1184,
};

pub const TEST_DOMAINS: u8 = 4;

pub fn test_geometry(total_slaves: u16) -> RegionGeometry {
    RegionGeometry::standard(total_slaves, TEST_DOMAINS)
}

/// Alternates between two policies so neighbouring fields differ.
pub fn alternating_slaves<const N: usize>() -> [SlaveDescriptor; N] {
    core::array::from_fn(|i| {
        let policy = if i % 2 == 0 {
            SlavePolicy::ForbidExceptD0SecRwD5NoProtect
        } else {
            SlavePolicy::ForbidExceptD0D5NoProtectD3SecRw
        };
        SlaveDescriptor::new(i as u16, "TEST", policy)
    })
}

/// Region with 20 slaves (two permission rows) over [`TEST_REGISTERS`].
pub fn test_region() -> DomainRegion {
    DomainRegion::from_parts(
        "TEST",
        test_geometry(20),
        TEST_REGISTERS,
        TEST_VIOLATION,
        &alternating_slaves::<20>(),
    )
    .unwrap()
}

/// In-memory register window with fault injection.
pub struct FakeRegisters {
    base: usize,
    words: [u32; FAKE_WORDS],
    w1c: Option<(usize, usize)>,
    pub reads: usize,
    pub writes: usize,
    /// Any access to this address faults.
    pub fault_at: Option<usize>,
    /// Bits at this address ignore writes of one.
    pub stuck_low: Option<(usize, u32)>,
    /// Number of writes to drop silently before behaving.
    pub dropped_writes: usize,
}

impl FakeRegisters {
    pub fn new(base: usize) -> Self {
        Self {
            base,
            words: [0; FAKE_WORDS],
            w1c: None,
            reads: 0,
            writes: 0,
            fault_at: None,
            stuck_low: None,
            dropped_writes: 0,
        }
    }

    /// Window over `region` with write-one-to-clear status rows.
    pub fn for_region(region: &DomainRegion) -> Self {
        let mut regs = Self::new(region.registers().base);
        let violation = region.violation();
        regs.w1c = Some((
            violation.status_base,
            violation.status_base + 0x10 * violation.row_stride,
        ));
        regs
    }

    fn slot(&self, address: usize) -> Result<usize, BusFault> {
        if self.fault_at == Some(address) || address < self.base || address % 4 != 0 {
            return Err(BusFault { address });
        }
        let slot = (address - self.base) / 4;
        if slot >= FAKE_WORDS {
            return Err(BusFault { address });
        }
        Ok(slot)
    }

    /// Sets a word directly, bypassing write semantics.
    pub fn poke(&mut self, address: usize, value: u32) {
        let slot = self.slot(address).unwrap();
        self.words[slot] = value;
    }

    /// Reads a word directly, without counting.
    pub fn peek(&self, address: usize) -> u32 {
        self.words[self.slot(address).unwrap()]
    }

    /// Snapshot of the whole window.
    pub fn snapshot(&self) -> [u32; FAKE_WORDS] {
        self.words
    }
}

impl RegisterAccess for FakeRegisters {
    fn read32(&mut self, address: usize) -> Result<u32, BusFault> {
        let slot = self.slot(address)?;
        self.reads += 1;
        Ok(self.words[slot])
    }

    fn write32(&mut self, address: usize, value: u32) -> Result<(), BusFault> {
        let slot = self.slot(address)?;
        self.writes += 1;
        if self.dropped_writes > 0 {
            self.dropped_writes -= 1;
            return Ok(());
        }

        let mut value = value;
        if let Some((stuck, bits)) = self.stuck_low {
            if stuck == address {
                value &= !bits;
            }
        }

        match self.w1c {
            Some((start, end)) if (start..end).contains(&address) => {
                self.words[slot] &= !value;
            }
            _ => self.words[slot] = value,
        }
        Ok(())
    }
}

/// Reporter that keeps the last record and counts calls.
#[derive(Default)]
pub struct RecordingReporter {
    pub reported: usize,
    pub escalated: usize,
    pub config_failures: usize,
    pub last: Option<ViolationRecord>,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, record: &ViolationRecord) {
        self.reported += 1;
        self.last = Some(*record);
    }

    fn escalate(&mut self, record: &ViolationRecord) {
        self.escalated += 1;
        self.last = Some(*record);
    }

    fn config_failed(&mut self, _region: &str, _error: crate::devapc::error::ConfigError) {
        self.config_failures += 1;
    }
}

/// Latches a violation for `slave_index` by `domain`.
pub fn latch_violation(
    regs: &mut FakeRegisters,
    region: &DomainRegion,
    slave_index: u16,
    domain: DomainId,
    debug_bits: u32,
) {
    let violation = region.violation();
    let pos = crate::devapc::codec::FieldLayout::STATUS.locate(slave_index);
    let address = violation.status_address(pos.row);
    let latched = regs.peek(address) | (1 << pos.offset);
    regs.poke(address, latched);
    regs.poke(violation.debug0, domain.0 as u32 | debug_bits);
    regs.poke(violation.debug1, 0x4000_0000 + slave_index as u32 * 0x100);
}
