//! Violation detection and dispatch.
//!
//! The hardware latches one status bit per slave when a bus master breaks
//! that slave's permission, records the offending domain and address in the
//! debug registers, and raises an interrupt. The monitor walks
//!
//! ```text
//! Idle ──signal──▶ Decoding ──▶ Reported  ──clear latch──▶ Idle
//!                           └─▶ Escalated ──clear latch──▶ Idle
//! ```
//!
//! one latched violation at a time. Malformed input still ends in
//! `Reported` or `Escalated`: an unacknowledged latch keeps the interrupt
//! line asserted.

use crate::devapc::{
    codec::{FieldLayout, FieldPosition, decode},
    error::{ConfigError, DecodeError},
    policy::{DomainId, Permission},
    regs::{BusFault, RegisterAccess},
    report::{EscalationPolicy, Reporter},
    table::DomainRegion,
};

/// Violating domain id in `debug0`.
pub const DBG0_DOMAIN_MASK: u32 = 0x3F;
/// Set in `debug0` when the violating access was a write.
pub const DBG0_WRITE_VIO: u32 = 1 << 28;
/// Set in `debug0` when the violating access was a read.
pub const DBG0_READ_VIO: u32 = 1 << 29;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Decoding,
    Reported,
    Escalated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
    /// Hardware flagged neither or both directions.
    Unknown,
}

impl AccessKind {
    fn from_debug0(debug0: u32) -> Self {
        match (debug0 & DBG0_READ_VIO != 0, debug0 & DBG0_WRITE_VIO != 0) {
            (true, false) => AccessKind::Read,
            (false, true) => AccessKind::Write,
            _ => AccessKind::Unknown,
        }
    }
}

/// Slave a violation was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaveRef {
    Known { index: u16, name: &'static str },
    /// Latched bit maps to no slave in the table.
    Unknown { raw_index: u16 },
    /// Status registers could not be read.
    Unreadable,
}

/// One decoded violation, handed to the [`Reporter`] and then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationRecord {
    pub region: &'static str,
    pub domain: Option<DomainId>,
    pub slave: SlaveRef,
    pub access: AccessKind,
    pub address: Option<u32>,
    /// Permission programmed for (domain, slave) at the time of the violation.
    pub observed: Option<Result<Permission, DecodeError>>,
    pub sequence: u32,
}

impl core::fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{} {} ", self.sequence, self.region)?;
        match self.slave {
            SlaveRef::Known { index, name } => write!(f, "slave {} ({})", index, name)?,
            SlaveRef::Unknown { raw_index } => write!(f, "unknown slave {}", raw_index)?,
            SlaveRef::Unreadable => write!(f, "unreadable slave")?,
        }
        match self.domain {
            Some(domain) => write!(f, " dom {}", domain.0)?,
            None => write!(f, " dom ?")?,
        }
        write!(f, " {:?}", self.access)?;
        if let Some(address) = self.address {
            write!(f, " @ {:#010x}", address)?;
        }
        match self.observed {
            Some(Ok(permission)) => write!(f, " perm {:?}", permission),
            Some(Err(e)) => write!(f, " perm {}", e),
            None => Ok(()),
        }
    }
}

/// Violation state machine for one region.
#[derive(Debug)]
pub struct ViolationMonitor {
    region: DomainRegion,
    state: MonitorState,
    sequence: u32,
}

impl ViolationMonitor {
    pub fn new(region: DomainRegion) -> Self {
        Self {
            region,
            state: MonitorState::Idle,
            sequence: 0,
        }
    }

    #[inline]
    pub fn region(&self) -> &DomainRegion {
        &self.region
    }

    #[inline]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Sequence number the next record will carry.
    #[inline]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    fn status_rows(&self) -> u16 {
        FieldLayout::STATUS.rows_for(self.region.total_slaves())
    }

    /// Clears the violation mask bit of every slave in the table.
    pub fn unmask<R: RegisterAccess>(&self, registers: &mut R) -> Result<(), ConfigError> {
        let layout = FieldLayout::STATUS;
        let violation = self.region.violation();
        for row in 0..self.status_rows() {
            let bits = self
                .region
                .slaves()
                .iter()
                .map(|s| layout.locate(s.index))
                .filter(|pos| pos.row == row)
                .fold(0u32, |acc, pos| acc | (1 << pos.offset));
            if bits != 0 {
                registers.modify32(violation.mask_address(row), |mask| mask & !bits)?;
            }
        }
        log::info!("devapc: {} violation interrupts unmasked", self.region.name());
        Ok(())
    }

    /// Handles the lowest latched violation.
    ///
    /// Returns the terminal state reached, or `None` if nothing was latched.
    pub fn handle<R, P, E>(
        &mut self,
        registers: &mut R,
        reporter: &mut P,
        escalation: &E,
    ) -> Option<MonitorState>
    where
        R: RegisterAccess,
        P: Reporter,
        E: EscalationPolicy,
    {
        let outcome = self.handle_one(registers, reporter, escalation);
        if outcome.is_none() {
            log::warn!("devapc: {} spurious violation signal", self.region.name());
        }
        outcome.map(|(state, _)| state)
    }

    /// Handles latched violations one at a time until none remain.
    ///
    /// Stops early if a latch cannot be cleared. Returns the number handled.
    pub fn service<R, P, E>(
        &mut self,
        registers: &mut R,
        reporter: &mut P,
        escalation: &E,
    ) -> usize
    where
        R: RegisterAccess,
        P: Reporter,
        E: EscalationPolicy,
    {
        let bound = self.status_rows() as usize * FieldLayout::STATUS.slaves_per_row() as usize;
        let mut handled = 0;
        while handled < bound {
            match self.handle_one(registers, reporter, escalation) {
                Some((_, true)) => handled += 1,
                Some((_, false)) => return handled + 1,
                None => break,
            }
        }
        handled
    }

    fn handle_one<R, P, E>(
        &mut self,
        registers: &mut R,
        reporter: &mut P,
        escalation: &E,
    ) -> Option<(MonitorState, bool)>
    where
        R: RegisterAccess,
        P: Reporter,
        E: EscalationPolicy,
    {
        self.state = MonitorState::Decoding;

        let latched = match self.find_latched(registers) {
            Ok(Some(pos)) => Some(pos),
            Ok(None) => {
                self.state = MonitorState::Idle;
                return None;
            }
            Err(fault) => {
                log::error!(
                    "devapc: {} violation status unreadable: {}",
                    self.region.name(),
                    fault
                );
                None
            }
        };

        let record = self.decode_record(registers, latched);
        self.sequence = self.sequence.wrapping_add(1);

        let terminal = if escalation.is_fatal(&record) {
            self.state = MonitorState::Escalated;
            reporter.escalate(&record);
            MonitorState::Escalated
        } else {
            self.state = MonitorState::Reported;
            reporter.report(&record);
            MonitorState::Reported
        };

        let cleared = match latched {
            Some(pos) => self.clear_latch(registers, pos),
            None => false,
        };

        self.state = MonitorState::Idle;
        Some((terminal, cleared))
    }

    fn find_latched<R: RegisterAccess>(
        &self,
        registers: &mut R,
    ) -> Result<Option<FieldPosition>, BusFault> {
        let violation = self.region.violation();
        for row in 0..self.status_rows() {
            let status = registers.read32(violation.status_address(row))?;
            if status != 0 {
                return Ok(Some(FieldPosition {
                    row,
                    offset: status.trailing_zeros() as u8,
                }));
            }
        }
        Ok(None)
    }

    fn decode_record<R: RegisterAccess>(
        &self,
        registers: &mut R,
        latched: Option<FieldPosition>,
    ) -> ViolationRecord {
        let violation = self.region.violation();

        let (domain, access) = match registers.read32(violation.debug0) {
            Ok(debug0) => (
                Some(DomainId((debug0 & DBG0_DOMAIN_MASK) as u8)),
                AccessKind::from_debug0(debug0),
            ),
            Err(fault) => {
                log::error!("devapc: {} debug0 unreadable: {}", self.region.name(), fault);
                (None, AccessKind::Unknown)
            }
        };
        let address = registers.read32(violation.debug1).ok();

        let slave = match latched.and_then(|pos| FieldLayout::STATUS.index_of(pos)) {
            None => SlaveRef::Unreadable,
            Some(index) => match self.region.slave(index) {
                Some(s) => SlaveRef::Known {
                    index,
                    name: s.name,
                },
                None => {
                    log::warn!(
                        "devapc: {} violation on unknown slave {}",
                        self.region.name(),
                        index
                    );
                    SlaveRef::Unknown { raw_index: index }
                }
            },
        };

        let observed = match (slave, domain) {
            (SlaveRef::Known { index, .. }, Some(domain))
                if domain.0 < self.region.geometry().domain_count =>
            {
                self.read_permission(registers, index, domain)
            }
            _ => None,
        };

        ViolationRecord {
            region: self.region.name(),
            domain,
            slave,
            access,
            address,
            observed,
            sequence: self.sequence,
        }
    }

    fn read_permission<R: RegisterAccess>(
        &self,
        registers: &mut R,
        index: u16,
        domain: DomainId,
    ) -> Option<Result<Permission, DecodeError>> {
        let layout = self.region.layout();
        let pos = layout.locate(index);
        let address = self.region.registers().address(domain, pos.row);
        let word = registers.read32(address).ok()?;
        let observed = decode(layout.extract(word, pos));
        if let Err(e) = observed {
            log::warn!(
                "devapc: {} slave {} dom {}: {}",
                self.region.name(),
                index,
                domain.0,
                e
            );
        }
        Some(observed)
    }

    fn clear_latch<R: RegisterAccess>(&self, registers: &mut R, pos: FieldPosition) -> bool {
        let address = self.region.violation().status_address(pos.row);
        let bit = 1 << pos.offset;
        let remaining = registers
            .write32(address, bit)
            .and_then(|()| registers.read32(address));
        match remaining {
            Ok(status) if status & bit == 0 => true,
            Ok(_) => {
                log::error!(
                    "devapc: {} violation latch stuck at row {} bit {}",
                    self.region.name(),
                    pos.row,
                    pos.offset
                );
                false
            }
            Err(fault) => {
                log::error!(
                    "devapc: {} violation latch not cleared: {}",
                    self.region.name(),
                    fault
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devapc::{
        catalog,
        programmer::Programmer,
        policy::SlavePolicy,
        report::{FatalSlaves, NeverEscalate},
        table::{RegionGeometry, SlaveDescriptor},
        test_support::{
            FakeRegisters, RecordingReporter, TEST_REGISTERS, TEST_VIOLATION, latch_violation,
            test_region,
        },
    };

    fn setup() -> (ViolationMonitor, FakeRegisters) {
        let region = test_region();
        let mut regs = FakeRegisters::for_region(&region);
        Programmer::default().configure(&region, &mut regs).unwrap();
        (ViolationMonitor::new(region), regs)
    }

    #[test]
    fn spurious_signal_stays_idle() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();

        assert_eq!(monitor.handle(&mut regs, &mut reporter, &NeverEscalate), None);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert_eq!(reporter.reported, 0);
        assert_eq!(monitor.sequence(), 0);
    }

    #[test]
    fn violation_is_decoded_reported_and_cleared() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        latch_violation(&mut regs, &region, 4, DomainId(2), DBG0_WRITE_VIO);

        let state = monitor.handle(&mut regs, &mut reporter, &NeverEscalate);

        assert_eq!(state, Some(MonitorState::Reported));
        assert_eq!(monitor.state(), MonitorState::Idle);
        let record = reporter.last.unwrap();
        assert_eq!(record.region, "TEST");
        assert_eq!(record.domain, Some(DomainId(2)));
        assert_eq!(record.slave, SlaveRef::Known { index: 4, name: "TEST" });
        assert_eq!(record.access, AccessKind::Write);
        assert_eq!(record.address, Some(0x4000_0400));
        assert_eq!(record.observed, Some(Ok(Permission::Forbidden)));
        assert_eq!(record.sequence, 0);

        // Latch is write-one-to-clear
        assert_eq!(regs.peek(region.violation().status_address(0)), 0);
        assert_eq!(monitor.handle(&mut regs, &mut reporter, &NeverEscalate), None);
    }

    #[test]
    fn slave_beyond_region_yields_synthetic_record() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        // 20 slaves, bit 25 of the first status row is past the table
        latch_violation(&mut regs, &region, 25, DomainId(1), DBG0_READ_VIO);

        let state = monitor.handle(&mut regs, &mut reporter, &NeverEscalate);

        assert_eq!(state, Some(MonitorState::Reported));
        let record = reporter.last.unwrap();
        assert_eq!(record.slave, SlaveRef::Unknown { raw_index: 25 });
        assert_eq!(record.access, AccessKind::Read);
        assert_eq!(record.observed, None);
        assert_eq!(regs.peek(region.violation().status_address(0)), 0);
    }

    #[test]
    fn slave_beyond_region_is_reported_under_fatal_slaves() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        latch_violation(&mut regs, &region, 25, DomainId(1), DBG0_WRITE_VIO);

        let policy = FatalSlaves::new("TEST", &[7]);
        assert_eq!(
            monitor.handle(&mut regs, &mut reporter, &policy),
            Some(MonitorState::Reported)
        );
        assert_eq!((reporter.reported, reporter.escalated), (1, 0));
    }

    #[test]
    fn fatal_slave_is_escalated() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        let policy = FatalSlaves::new("TEST", &[7]);
        latch_violation(&mut regs, &region, 7, DomainId(3), DBG0_WRITE_VIO);

        assert_eq!(
            monitor.handle(&mut regs, &mut reporter, &policy),
            Some(MonitorState::Escalated)
        );
        assert_eq!(reporter.escalated, 1);
        assert_eq!(reporter.reported, 0);
        // odd slaves grant domain 3 secure rw
        assert_eq!(
            reporter.last.unwrap().observed,
            Some(Ok(Permission::SecRwOnly))
        );
    }

    #[test]
    fn queued_violations_are_handled_in_order() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        latch_violation(&mut regs, &region, 18, DomainId(1), DBG0_WRITE_VIO);
        latch_violation(&mut regs, &region, 2, DomainId(1), DBG0_WRITE_VIO);

        monitor.handle(&mut regs, &mut reporter, &NeverEscalate);
        assert_eq!(
            reporter.last.unwrap().slave,
            SlaveRef::Known { index: 2, name: "TEST" }
        );

        monitor.handle(&mut regs, &mut reporter, &NeverEscalate);
        let record = reporter.last.unwrap();
        assert_eq!(record.slave, SlaveRef::Known { index: 18, name: "TEST" });
        assert_eq!(record.sequence, 1);
    }

    #[test]
    fn service_drains_every_latch() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        for slave in [0, 5, 19] {
            latch_violation(&mut regs, &region, slave, DomainId(4), DBG0_READ_VIO);
        }

        assert_eq!(monitor.service(&mut regs, &mut reporter, &NeverEscalate), 3);
        assert_eq!(reporter.reported, 3);
        assert_eq!(monitor.sequence(), 3);
        // domain 4 is outside the region's 4 domains
        assert_eq!(reporter.last.unwrap().observed, None);
    }

    #[test]
    fn stuck_latch_stops_service_after_one_record() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        let status = region.violation().status_address(0);
        latch_violation(&mut regs, &region, 4, DomainId(2), DBG0_WRITE_VIO);
        regs.stuck_low = Some((status, 1 << 4));

        let handled = monitor.service(&mut regs, &mut reporter, &NeverEscalate);

        assert_eq!((handled, reporter.reported, monitor.sequence()), (1, 1, 1));
        assert_eq!(regs.peek(status), 1 << 4);
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[test]
    fn unreadable_status_is_still_reported() {
        let (mut monitor, mut regs) = setup();
        let mut reporter = RecordingReporter::default();
        let region = monitor.region().clone();
        latch_violation(&mut regs, &region, 3, DomainId(0), DBG0_WRITE_VIO);
        regs.fault_at = Some(region.violation().status_address(0));

        assert_eq!(monitor.service(&mut regs, &mut reporter, &NeverEscalate), 1);
        let record = reporter.last.unwrap();
        assert_eq!(record.slave, SlaveRef::Unreadable);
        assert_eq!(record.domain, Some(DomainId(0)));
    }

    #[test]
    fn reserved_encoding_is_recorded_not_fatal() {
        // 4-bit fields leave patterns 4..=15 without a permission
        let geometry = RegionGeometry {
            total_slaves: 8,
            domain_count: 1,
            slaves_per_row: 8,
            bits_per_slave: 4,
        };
        let region = DomainRegion::from_parts(
            "WIDE",
            geometry,
            TEST_REGISTERS,
            TEST_VIOLATION,
            &[SlaveDescriptor::new(0, "WIDE", SlavePolicy::ForbidAll)],
        )
        .unwrap();
        let mut regs = FakeRegisters::for_region(&region);
        let mut reporter = RecordingReporter::default();
        regs.poke(TEST_REGISTERS.base, 0b0101);
        latch_violation(&mut regs, &region, 0, DomainId(0), DBG0_WRITE_VIO);

        let mut monitor = ViolationMonitor::new(region);
        assert_eq!(
            monitor.handle(&mut regs, &mut reporter, &NeverEscalate),
            Some(MonitorState::Reported)
        );
        assert_eq!(
            reporter.last.unwrap().observed,
            Some(Err(DecodeError::ReservedEncoding(0b0101)))
        );
    }

    #[test]
    fn unmask_clears_only_configured_slaves() {
        let ao = catalog::build("AO").unwrap();
        let mut regs = FakeRegisters::for_region(&ao);
        let mask = ao.violation().mask_address(0);
        regs.poke(mask, 0xFFFF_FFFF);

        ViolationMonitor::new(ao).unmask(&mut regs).unwrap();

        // 30 slaves: bits 30 and 31 stay masked
        assert_eq!(regs.peek(mask), 0xC000_0000);
    }

    #[test]
    fn record_display_is_readable() {
        let record = ViolationRecord {
            region: "AO",
            domain: Some(DomainId(3)),
            slave: SlaveRef::Known {
                index: 14,
                name: "AO_DAPC_CON",
            },
            access: AccessKind::Write,
            address: None,
            observed: Some(Ok(Permission::SecRwOnly)),
            sequence: 9,
        };

        let mut buf = heapless::String::<96>::new();
        core::fmt::write(&mut buf, format_args!("{}", record)).unwrap();
        assert_eq!(
            buf.as_str(),
            "#9 AO slave 14 (AO_DAPC_CON) dom 3 Write perm SecRwOnly"
        );
    }
}
