pub mod catalog;
pub mod codec;
pub mod error;
pub mod handle;
mod macros;
pub mod monitor;
pub mod policy;
pub mod programmer;
pub mod regs;
pub mod report;
pub mod table;

#[cfg(test)]
mod test_support;

pub use codec::{FieldLayout, FieldPosition, decode, encode};
pub use error::{ConfigError, DecodeError};
pub use handle::SharedMonitor;
pub use monitor::{AccessKind, MonitorState, SlaveRef, ViolationMonitor, ViolationRecord};
pub use policy::{DomainId, MAX_DOMAINS, Permission, SlavePolicy};
pub use programmer::{Programmer, RetryPolicy};
pub use regs::{BusFault, Mmio, RegisterAccess};
pub use report::{EscalationPolicy, FatalSlaves, LogReporter, NeverEscalate, Reporter};
pub use table::{
    DomainRegion, MAX_SLAVES, RegionConfig, RegionGeometry, RegisterLayout, SlaveDescriptor,
    ViolationLayout,
};

pub mod prelude {
    pub use super::{
        AccessKind, BusFault, ConfigError, DecodeError, DomainId, DomainRegion, EscalationPolicy,
        FatalSlaves, FieldLayout, LogReporter, Mmio, MonitorState, NeverEscalate, Permission,
        Programmer, RegisterAccess, Reporter, RetryPolicy, SharedMonitor, SlaveDescriptor,
        SlavePolicy, SlaveRef, ViolationMonitor, ViolationRecord, catalog,
    };
}
