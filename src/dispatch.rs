//! Framework-facing surface: the capability traits a firmware dispatch
//! table holds, and the process-wide singleton entry points wired into the
//! boot and trap paths.

use log::{debug, trace};
use memory_addr::PhysAddr;
use spin::Once;

use crate::clint::{Clint, HartMask, InitError};
use crate::regs::ClintLayout;

/// Inter-processor signaling, as the dispatch table sees it.
pub trait IpiOps: Send + Sync {
    fn ipi_send(&self, targets: HartMask);
    fn ipi_clear(&self, hart: usize);
    fn ipi_pending(&self, hart: usize) -> bool;
}

/// Per-hart one-shot timer control, as the dispatch table sees it.
pub trait TimerOps: Send + Sync {
    fn timer_value(&self) -> u64;
    fn timer_event_start(&self, hart: usize, deadline: u64);
    fn timer_event_stop(&self, hart: usize);
}

impl IpiOps for Clint {
    fn ipi_send(&self, targets: HartMask) {
        trace!("clint: ipi_send mask={:#x}", targets.bits());
        self.send_ipi(targets);
    }

    fn ipi_clear(&self, hart: usize) {
        trace!("clint: ipi_clear hart={}", hart);
        self.clear_ipi(hart);
    }

    fn ipi_pending(&self, hart: usize) -> bool {
        Clint::ipi_pending(self, hart)
    }
}

impl TimerOps for Clint {
    fn timer_value(&self) -> u64 {
        self.current_time()
    }

    fn timer_event_start(&self, hart: usize, deadline: u64) {
        trace!("clint: timer_event_start hart={} deadline={}", hart, deadline);
        self.arm_timer(hart, deadline);
    }

    fn timer_event_stop(&self, hart: usize) {
        trace!("clint: timer_event_stop hart={}", hart);
        self.disarm_timer(hart);
    }
}

static CLINT: Once<Clint> = Once::new();

/// Installs the process-wide controller. Boot sequencing calls this
/// exactly once, from the elected hart, before releasing the others; the
/// default SiFive layout is assumed.
///
/// # Safety
///
/// Same mapping requirement as [`Clint::cold_init`].
pub unsafe fn cold_init(
    base: PhysAddr,
    hart_count: usize,
) -> Result<&'static Clint, InitError> {
    unsafe { cold_init_with_layout(base, ClintLayout::SIFIVE, hart_count) }
}

/// [`cold_init`] for boards that place the register groups at non-default
/// offsets.
///
/// # Safety
///
/// Same mapping requirement as [`Clint::cold_init`].
pub unsafe fn cold_init_with_layout(
    base: PhysAddr,
    layout: ClintLayout,
    hart_count: usize,
) -> Result<&'static Clint, InitError> {
    let clint = unsafe { Clint::cold_init(base, layout, hart_count)? };
    debug!(
        "clint: cold init base={:#x} harts={}",
        base.as_usize(),
        hart_count
    );
    debug_assert!(!CLINT.is_completed(), "cold_init ran twice");
    Ok(CLINT.call_once(|| clint))
}

/// Per-hart boot path; runs any time after [`cold_init`] has completed
/// globally.
pub fn warm_init() -> Result<(), InitError> {
    let clint = CLINT.get().ok_or(InitError::NotInitialized)?;
    let hart = current_hart();
    clint.warm_init(hart);
    debug!("clint: warm init hart={}", hart);
    Ok(())
}

/// The installed controller, if cold init has run.
pub fn get() -> Option<&'static Clint> {
    CLINT.get()
}

fn controller() -> Option<&'static Clint> {
    let clint = CLINT.get();
    debug_assert!(clint.is_some(), "controller used before cold_init");
    clint
}

pub fn send_ipi(targets: HartMask) {
    if let Some(clint) = controller() {
        clint.ipi_send(targets);
    }
}

/// Clears the calling hart's own pending bit; the software-interrupt trap
/// handler calls this after it has observed the signal.
pub fn clear_ipi() {
    if let Some(clint) = controller() {
        clint.ipi_clear(current_hart());
    }
}

pub fn ipi_pending(hart: usize) -> bool {
    controller().is_some_and(|clint| IpiOps::ipi_pending(clint, hart))
}

/// Arms the calling hart's one-shot deadline.
pub fn arm_timer(deadline: u64) {
    if let Some(clint) = controller() {
        clint.timer_event_start(current_hart(), deadline);
    }
}

/// Disarms the calling hart's timer.
pub fn disarm_timer() {
    if let Some(clint) = controller() {
        clint.timer_event_stop(current_hart());
    }
}

pub fn current_time() -> u64 {
    controller().map_or(0, |clint| clint.timer_value())
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
fn current_hart() -> usize {
    riscv::register::mhartid::read()
}

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
fn current_hart() -> usize {
    0
}
