//! A `no_std`, no-alloc core for the MT8188 APU subsystem's Device Access
//! Permission Controller (DEVAPC).
//!
//! The controller decides, per bus-master domain and per slave, whether an
//! access is allowed. This crate programs those decisions into the
//! controller's registers at boot and reacts when the hardware reports a
//! violation.
//!
//! # Features
//!
//! - **Zero heap allocation** - Tables live in fixed-capacity storage
//! - **Fail before write** - Tables are validated before any register is touched
//! - **Verified programming** - Read-modify-write per field, bounded retries, full read-back
//! - **Interrupt-safe monitoring** - Violations are decoded and cleared one at a time
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  build   ┌──────────────┐  configure  ┌──────────────────┐
//! │  catalog         │─────────▶│ DomainRegion │────────────▶│ permission regs  │
//! │  (SLAVE_* table) │          └──────────────┘ Programmer  │ dom x row x 2bit │
//! └──────────────────┘                 │                     └──────────────────┘
//!                                      │ owns                         │
//!                                      ▼                              │ violation
//!                           ┌──────────────────┐   handle   ┌─────────▼─────────┐
//!                           │ ViolationMonitor │◀───────────│ status / debug    │
//!                           └──────────────────┘            └───────────────────┘
//!                                      │ report / escalate
//!                                      ▼
//!                                  Reporter
//! ```
//!
//! [`FieldLayout`](devapc::FieldLayout) is the single placement law used on
//! both paths.
//!
//! # Example
//!
//! ```rust,no_run
//! use apusys_devapc::prelude::*;
//!
//! let ao = catalog::build("AO").unwrap();
//! let mut regs = unsafe { Mmio::new(catalog::APU_CTRL_DAPC_AO_BASE, 0x1000) };
//!
//! // Boot: program and verify the table
//! Programmer::new(RetryPolicy::default())
//!     .configure(&ao, &mut regs)
//!     .unwrap();
//!
//! // Runtime: from the violation interrupt
//! let mut monitor = ViolationMonitor::new(ao);
//! monitor.unmask(&mut regs).unwrap();
//! monitor.handle(&mut regs, &mut LogReporter, &NeverEscalate);
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod devapc;

pub mod prelude {
    pub use crate::devapc::prelude::*;
}
