#![allow(unsafe_code)]

use core::cell::UnsafeCell;

use crate::devapc::{
    monitor::ViolationMonitor,
    regs::RegisterAccess,
    report::{EscalationPolicy, Reporter},
};

struct Inner<R, P, E> {
    monitor: ViolationMonitor,
    registers: R,
    reporter: P,
    escalation: E,
}

/// A violation monitor that can live in a `static` and be entered from an
/// interrupt handler.
///
/// Owns the monitor together with its register window, reporter and
/// escalation policy. All access goes through a critical section.
pub struct SharedMonitor<R, P, E>
where
    R: RegisterAccess,
    P: Reporter,
    E: EscalationPolicy,
{
    inner: UnsafeCell<Inner<R, P, E>>,
}

// SAFETY: the inner state is only reached inside a critical section, or
// through the unchecked entry points whose callers guarantee exclusivity.
unsafe impl<R, P, E> Sync for SharedMonitor<R, P, E>
where
    R: RegisterAccess + Send,
    P: Reporter + Send,
    E: EscalationPolicy + Send,
{
}

impl<R, P, E> core::fmt::Debug for SharedMonitor<R, P, E>
where
    R: RegisterAccess,
    P: Reporter,
    E: EscalationPolicy,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedMonitor").finish_non_exhaustive()
    }
}

impl<R, P, E> SharedMonitor<R, P, E>
where
    R: RegisterAccess,
    P: Reporter,
    E: EscalationPolicy,
{
    pub fn new(monitor: ViolationMonitor, registers: R, reporter: P, escalation: E) -> Self {
        Self {
            inner: UnsafeCell::new(Inner {
                monitor,
                registers,
                reporter,
                escalation,
            }),
        }
    }

    /// Services every latched violation.
    ///
    /// Call from the violation interrupt handler. Returns the number handled.
    pub fn on_violation(&self) -> usize {
        critical_section::with(|_| unsafe { self.on_violation_unchecked() })
    }

    /// # Safety
    /// Requires exclusive access to this monitor. Safe from an interrupt
    /// handler that cannot be preempted by anything else touching it.
    pub unsafe fn on_violation_unchecked(&self) -> usize {
        let inner = unsafe { &mut *self.inner.get() };
        inner
            .monitor
            .service(&mut inner.registers, &mut inner.reporter, &inner.escalation)
    }

    /// Runs `f` with the monitor, its registers and its reporter.
    pub fn with_monitor<T>(
        &self,
        f: impl FnOnce(&mut ViolationMonitor, &mut R, &mut P) -> T,
    ) -> T {
        critical_section::with(|_| {
            let inner = unsafe { &mut *self.inner.get() };
            f(&mut inner.monitor, &mut inner.registers, &mut inner.reporter)
        })
    }
}
