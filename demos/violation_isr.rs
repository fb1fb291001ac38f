//! Violation example: Simulating the DEVAPC interrupt
//!
//! This example demonstrates:
//! - A shared monitor in a static, entered through critical sections
//! - A simulated ISR thread servicing latched violations
//! - Escalating violations against the controller's own registers

mod common;

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use apusys_devapc::prelude::*;
use common::{RamRegisters, init_logging};

type Monitor = SharedMonitor<RamRegisters, LogReporter, FatalSlaves>;

static MONITOR: OnceLock<Monitor> = OnceLock::new();

// Simulate an interrupt line
static INTERRUPT_PENDING: AtomicBool = AtomicBool::new(false);

/// AO_DAPC_CON guards the controller itself.
const FATAL: FatalSlaves = FatalSlaves::new("AO", &[14]);

fn main() {
    init_logging();
    println!("=== Violation ISR Example ===\n");

    let ao = catalog::build("AO").unwrap();
    let mut regs = RamRegisters::new().with_status_latches(&ao);
    Programmer::default().configure(&ao, &mut regs).unwrap();

    let monitor = ViolationMonitor::new(ao);
    monitor.unmask(&mut regs).unwrap();
    let _ = MONITOR.set(SharedMonitor::new(monitor, regs, LogReporter, FATAL));

    let isr_thread = thread::spawn(|| {
        for _ in 0..20 {
            if INTERRUPT_PENDING.swap(false, Ordering::AcqRel) {
                if let Some(monitor) = MONITOR.get() {
                    let handled = monitor.on_violation();
                    println!("ISR: handled {} violation(s)", handled);
                }
            }
            thread::sleep(Duration::from_millis(25));
        }
    });

    // Domain 2 writes PLL, then reads a slave past the table
    raise(4, 2, true);
    raise(31, 2, false);
    thread::sleep(Duration::from_millis(100));

    // Domain 1 touches the controller's own configuration
    raise(14, 1, true);

    isr_thread.join().unwrap();
    println!("\n=== Example Complete ===");
}

fn raise(slave: u16, domain: u8, write: bool) {
    if let Some(monitor) = MONITOR.get() {
        monitor.with_monitor(|monitor, regs, _| {
            let region = monitor.region().clone();
            regs.raise(&region, slave, domain, write);
        });
        INTERRUPT_PENDING.store(true, Ordering::Release);
    }
}
