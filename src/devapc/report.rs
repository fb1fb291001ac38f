use crate::devapc::{
    error::ConfigError,
    monitor::{SlaveRef, ViolationRecord},
};

/// Receives violation records and configuration failures.
///
/// Called from interrupt context: implementations must not block.
pub trait Reporter {
    /// A violation that only needs recording.
    fn report(&mut self, record: &ViolationRecord);
    /// A violation the platform treats as fatal, typically by resetting.
    fn escalate(&mut self, record: &ViolationRecord);
    /// A region could not be programmed.
    fn config_failed(&mut self, region: &str, error: ConfigError) {
        log::error!("devapc: region {} left unprogrammed: {}", region, error);
    }
}

/// Decides which violations are escalated rather than reported.
pub trait EscalationPolicy {
    fn is_fatal(&self, record: &ViolationRecord) -> bool;
}

/// Reporter that writes every record to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, record: &ViolationRecord) {
        log::info!("devapc violation: {}", record);
    }

    fn escalate(&mut self, record: &ViolationRecord) {
        log::error!("devapc fatal violation: {}", record);
    }
}

/// Default policy that never escalates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEscalate;

impl EscalationPolicy for NeverEscalate {
    fn is_fatal(&self, _record: &ViolationRecord) -> bool {
        false
    }
}

/// Escalates violations against a fixed set of slaves in one region.
///
/// Violations whose slave cannot be identified are only reported unless
/// `escalate_unidentified` is set.
#[derive(Debug, Clone, Copy)]
pub struct FatalSlaves {
    pub region: &'static str,
    pub slaves: &'static [u16],
    pub escalate_unidentified: bool,
}

impl FatalSlaves {
    pub const fn new(region: &'static str, slaves: &'static [u16]) -> Self {
        Self {
            region,
            slaves,
            escalate_unidentified: false,
        }
    }
}

impl EscalationPolicy for FatalSlaves {
    fn is_fatal(&self, record: &ViolationRecord) -> bool {
        if record.region != self.region {
            return false;
        }
        match record.slave {
            SlaveRef::Known { index, .. } => self.slaves.contains(&index),
            SlaveRef::Unknown { .. } | SlaveRef::Unreadable => self.escalate_unidentified,
        }
    }
}
