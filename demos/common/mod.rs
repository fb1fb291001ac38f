//! Host-side stand-ins for the register window and the console.

use std::collections::BTreeMap;

use apusys_devapc::prelude::*;

/// Sparse in-memory register window.
///
/// Writes inside `w1c` clear the bits written as one, like the hardware
/// violation status latches.
pub struct RamRegisters {
    words: BTreeMap<usize, u32>,
    w1c: Option<(usize, usize)>,
}

impl Default for RamRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl RamRegisters {
    pub fn new() -> Self {
        Self {
            words: BTreeMap::new(),
            w1c: None,
        }
    }

    /// Treats the status rows of `region` as write-one-to-clear.
    pub fn with_status_latches(mut self, region: &DomainRegion) -> Self {
        let violation = region.violation();
        self.w1c = Some((violation.status_base, violation.debug0));
        self
    }

    /// Simulates the hardware latching a violation.
    pub fn raise(&mut self, region: &DomainRegion, slave: u16, domain: u8, write: bool) {
        let violation = region.violation();
        let pos = FieldLayout::STATUS.locate(slave);
        *self
            .words
            .entry(violation.status_address(pos.row))
            .or_insert(0) |= 1 << pos.offset;

        let kind = if write {
            apusys_devapc::devapc::monitor::DBG0_WRITE_VIO
        } else {
            apusys_devapc::devapc::monitor::DBG0_READ_VIO
        };
        self.words.insert(violation.debug0, domain as u32 | kind);
        self.words
            .insert(violation.debug1, 0x1903_0000 + slave as u32 * 0x1000);
    }
}

impl RegisterAccess for RamRegisters {
    fn read32(&mut self, address: usize) -> Result<u32, BusFault> {
        if address % 4 != 0 {
            return Err(BusFault { address });
        }
        Ok(self.words.get(&address).copied().unwrap_or(0))
    }

    fn write32(&mut self, address: usize, value: u32) -> Result<(), BusFault> {
        if address % 4 != 0 {
            return Err(BusFault { address });
        }
        match self.w1c {
            Some((start, end)) if (start..end).contains(&address) => {
                *self.words.entry(address).or_insert(0) &= !value;
            }
            _ => {
                self.words.insert(address, value);
            }
        }
        Ok(())
    }
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("[{:5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn init_logging() {
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(log::LevelFilter::Debug));
}
