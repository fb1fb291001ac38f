//! Boot example: programming every APU region
//!
//! This example demonstrates:
//! - Building regions from the compiled-in catalog
//! - Programming and verifying each region in boot order
//! - Dumping the resulting permission rows
//! - Re-programming RCX after a simulated power cycle

mod common;

use apusys_devapc::prelude::*;
use common::{RamRegisters, init_logging};

fn main() {
    init_logging();
    println!("=== DEVAPC Boot Example ===\n");

    // Validate every table before touching hardware
    let regions = catalog::REGIONS.map(|config| DomainRegion::build(config).unwrap());

    let mut regs = RamRegisters::new();
    let programmer = Programmer::new(RetryPolicy::default());

    programmer
        .configure_all(&regions, &mut regs, &mut LogReporter)
        .expect("permission tables must apply before the APU is released");

    // AO row 0 for domain 0 and domain 5
    let ao = &regions[0];
    programmer
        .dump(ao, &mut regs, |domain, row, address, value| {
            if domain == DomainId(0) || domain == DomainId(5) {
                println!(
                    "AO dom {:2} row {} [{:#010x}] = {:#010x}",
                    domain.0, row, address, value
                );
            }
        })
        .unwrap();

    // Duplicate indices are rejected before any write happens
    let broken = [
        SlaveDescriptor::new(0, "VCORE", SlavePolicy::ForbidExceptD0SecRwD5NoProtect),
        SlaveDescriptor::new(0, "RPC", SlavePolicy::ForbidExceptD0SecRwNsRD5NoProtect),
    ];
    let err = DomainRegion::from_parts(
        "BROKEN",
        catalog::AO.geometry,
        catalog::AO.registers,
        catalog::AO.violation,
        &broken,
    )
    .unwrap_err();
    println!("\nbroken table rejected: {}", err);

    // RCX loses its registers when the compute complex powers down
    println!("\nRCX power cycle");
    let rcx = &regions[1];
    let mut fresh = RamRegisters::new();
    assert!(programmer.verify(rcx, &mut fresh).is_err());
    programmer.configure(rcx, &mut fresh).unwrap();
    programmer.verify(rcx, &mut fresh).unwrap();

    println!("\n=== Example Complete ===");
}
