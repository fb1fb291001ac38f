use crate::devapc::{
    codec::{FieldPosition, decode, encode},
    error::ConfigError,
    policy::DomainId,
    regs::RegisterAccess,
    report::Reporter,
    table::{DomainRegion, SlaveDescriptor},
};

/// How many times one field write is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u8,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u8 = 3;

    /// Zero is treated as one attempt.
    pub const fn new(max_attempts: u8) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    #[inline]
    pub const fn max_attempts(&self) -> u8 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS)
    }
}

/// Writes a region's permission table into its register block.
#[derive(Debug, Default, Clone, Copy)]
pub struct Programmer {
    retry: RetryPolicy,
}

impl Programmer {
    pub const fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// Programs every (domain, slave) field of `region` and verifies it.
    ///
    /// Slaves are written in ascending index order with a read-modify-write
    /// per field, so fields sharing a row are never disturbed. Each write is
    /// read back and retried up to the retry limit; a final pass re-reads
    /// every field. Running it twice leaves the same register state.
    ///
    /// # Errors
    /// * [`ConfigError::RegisterAccessFailed`] - the bus faulted
    /// * [`ConfigError::VerificationMismatch`] - a field never read back as written
    pub fn configure<R: RegisterAccess>(
        &self,
        region: &DomainRegion,
        registers: &mut R,
    ) -> Result<(), ConfigError> {
        log::info!(
            "devapc: programming region {} ({} slaves, {} domains)",
            region.name(),
            region.slaves().len(),
            region.geometry().domain_count
        );

        let result = self
            .program(region, registers)
            .and_then(|()| self.verify(region, registers));

        match result {
            Ok(()) => log::info!("devapc: region {} programmed", region.name()),
            Err(e) => log::error!("devapc: region {} failed: {}", region.name(), e),
        }
        result
    }

    /// Programs each region in order, stopping at the first failure.
    ///
    /// The failure is handed to `reporter` before being returned.
    pub fn configure_all<R: RegisterAccess, P: Reporter>(
        &self,
        regions: &[DomainRegion],
        registers: &mut R,
        reporter: &mut P,
    ) -> Result<(), ConfigError> {
        for region in regions {
            if let Err(e) = self.configure(region, registers) {
                reporter.config_failed(region.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Re-reads every field and compares it with the table.
    ///
    /// # Errors
    /// * [`ConfigError::RegisterAccessFailed`] - the bus faulted
    /// * [`ConfigError::VerificationMismatch`] - the first field that differs
    pub fn verify<R: RegisterAccess>(
        &self,
        region: &DomainRegion,
        registers: &mut R,
    ) -> Result<(), ConfigError> {
        let layout = region.layout();
        for slave in region.slaves() {
            let pos = layout.locate(slave.index);
            for domain in region.domains() {
                let address = region.registers().address(domain, pos.row);
                let word = registers.read32(address)?;
                let expected = slave.policy.permission(domain);
                if decode(layout.extract(word, pos)) != Ok(expected) {
                    return Err(ConfigError::VerificationMismatch {
                        slave: slave.index,
                        domain: domain.0,
                    });
                }
            }
        }
        Ok(())
    }

    /// Reads every permission row of every domain.
    ///
    /// `f` receives `(domain, row, address, value)`.
    pub fn dump<R: RegisterAccess>(
        &self,
        region: &DomainRegion,
        registers: &mut R,
        mut f: impl FnMut(DomainId, u16, usize, u32),
    ) -> Result<(), ConfigError> {
        for domain in region.domains() {
            for row in 0..region.rows() {
                let address = region.registers().address(domain, row);
                let value = registers.read32(address)?;
                log::debug!(
                    "devapc: {} dom {} row {} [{:#010x}] = {:#010x}",
                    region.name(),
                    domain.0,
                    row,
                    address,
                    value
                );
                f(domain, row, address, value);
            }
        }
        Ok(())
    }

    fn program<R: RegisterAccess>(
        &self,
        region: &DomainRegion,
        registers: &mut R,
    ) -> Result<(), ConfigError> {
        let layout = region.layout();
        for slave in region.slaves() {
            let pos = layout.locate(slave.index);
            for domain in region.domains() {
                self.program_field(region, registers, slave, domain, pos)?;
            }
        }
        Ok(())
    }

    fn program_field<R: RegisterAccess>(
        &self,
        region: &DomainRegion,
        registers: &mut R,
        slave: &SlaveDescriptor,
        domain: DomainId,
        pos: FieldPosition,
    ) -> Result<(), ConfigError> {
        let layout = region.layout();
        let address = region.registers().address(domain, pos.row);
        let bits = encode(slave.policy.permission(domain));

        for attempt in 1..=self.retry.max_attempts() {
            registers.modify32(address, |word| layout.insert(word, pos, bits))?;

            let readback = layout.extract(registers.read32(address)?, pos);
            if readback == bits {
                log::trace!(
                    "devapc: {} slave {} ({}) dom {} = {:#x}",
                    region.name(),
                    slave.index,
                    slave.name,
                    domain.0,
                    bits
                );
                return Ok(());
            }

            log::warn!(
                "devapc: {} slave {} dom {} read back {:#x}, wrote {:#x} (attempt {}/{})",
                region.name(),
                slave.index,
                domain.0,
                readback,
                bits,
                attempt,
                self.retry.max_attempts()
            );
        }

        Err(ConfigError::VerificationMismatch {
            slave: slave.index,
            domain: domain.0,
        })
    }
}
