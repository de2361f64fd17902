use memory_addr::PhysAddr;

use crate::consts::{MAX_HARTS, MTIMECMP_DISARMED};
use crate::regs::{ClintLayout, ClintRegs};

/// Boot-time initialization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Hart count is zero or above [`MAX_HARTS`].
    InvalidCount,
    /// Warm init ran before cold init completed.
    NotInitialized,
}

/// A set of hart ids, one bit per hart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HartMask(usize);

impl HartMask {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: usize) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> usize {
        self.0
    }

    pub const fn single(hart: usize) -> Self {
        Self(1 << hart)
    }

    pub const fn with(self, hart: usize) -> Self {
        Self(self.0 | (1 << hart))
    }

    pub const fn contains(self, hart: usize) -> bool {
        self.0 & (1 << hart) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// The timer + IPI controller: one instance per register block.
///
/// Per-hart register state is partitioned by hart id: a hart writes only
/// its own MSIP bit and its own MTIMECMP entry (remote MSIP bits are set
/// only through [`Clint::send_ipi`]), so every operation here runs without
/// a lock.
pub struct Clint {
    regs: ClintRegs,
}

impl Clint {
    /// One-time setup, run by the elected boot hart with all others
    /// parked. Records the block location and puts every hart's signal
    /// state into the quiescent position: MSIP clear, MTIMECMP at the
    /// disarmed sentinel. The shared MTIME counter is hardware-driven and
    /// is left alone.
    ///
    /// # Safety
    ///
    /// `base` must point at a mapped register block covering `layout` for
    /// `hart_count` harts; see [`ClintRegs::new`].
    pub unsafe fn cold_init(
        base: PhysAddr,
        layout: ClintLayout,
        hart_count: usize,
    ) -> Result<Self, InitError> {
        if hart_count == 0 || hart_count > MAX_HARTS {
            return Err(InitError::InvalidCount);
        }
        debug_assert!(
            memory_addr::is_aligned(base.as_usize(), 8),
            "register block base must be naturally aligned"
        );
        let regs = unsafe { ClintRegs::new(base, layout, hart_count) };
        for hart in 0..hart_count {
            regs.write_msip(hart, false);
            regs.write_mtimecmp(hart, MTIMECMP_DISARMED);
        }
        Ok(Self { regs })
    }

    pub const fn hart_count(&self) -> usize {
        self.regs.hart_count()
    }

    pub const fn regs(&self) -> &ClintRegs {
        &self.regs
    }

    /// Per-hart boot path, run by every hart on its own execution context
    /// (the cold-boot hart included): resets the hart's own signal state
    /// and opens its software- and timer-interrupt lines in `mie`.
    pub fn warm_init(&self, hart: usize) {
        self.clear_ipi(hart);
        self.disarm_timer(hart);
        #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
        unsafe {
            riscv::register::mie::set_msoft();
            riscv::register::mie::set_mtimer();
        }
    }

    /// Posts an IPI to every hart in `targets`; mask bits at or above the
    /// hart count are ignored. Repeated sends to the same hart coalesce
    /// into one pending bit, and delivery is asynchronous: the caller does
    /// not wait for the target to react, and any data published for the
    /// target must be ordered by the layer above before this call.
    pub fn send_ipi(&self, targets: HartMask) {
        for hart in 0..self.regs.hart_count() {
            if targets.contains(hart) {
                self.regs.write_msip(hart, true);
            }
        }
    }

    /// Drops `hart`'s pending bit. `hart` must be the calling hart:
    /// clearing another hart's bit races with that hart's own handler and
    /// can lose a signal.
    pub fn clear_ipi(&self, hart: usize) {
        self.regs.write_msip(hart, false);
    }

    /// Point-in-time read of a hart's pending bit. Diagnostic only; the
    /// authoritative signal is the interrupt itself.
    pub fn ipi_pending(&self, hart: usize) -> bool {
        self.regs.read_msip(hart)
    }

    /// Sets `hart`'s one-shot deadline. `hart` must be the calling hart.
    /// A deadline at or below the current counter becomes pending
    /// essentially immediately.
    pub fn arm_timer(&self, hart: usize, deadline: u64) {
        self.regs.write_mtimecmp(hart, deadline);
    }

    /// Parks `hart`'s compare at the sentinel the counter never reaches.
    /// `hart` must be the calling hart. An interrupt already latched by a
    /// passed deadline may still be observed; callers treat that as a
    /// normal fire.
    pub fn disarm_timer(&self, hart: usize) {
        self.regs.write_mtimecmp(hart, MTIMECMP_DISARMED);
    }

    /// The shared counter: monotonic across harts, never written by
    /// software.
    pub fn current_time(&self) -> u64 {
        self.regs.read_mtime()
    }

    pub fn timer_armed(&self, hart: usize) -> bool {
        self.regs.read_mtimecmp(hart) != MTIMECMP_DISARMED
    }

    pub fn timer_due(&self, hart: usize) -> bool {
        self.regs.read_mtimecmp(hart) <= self.regs.read_mtime()
    }

    pub fn deadline(&self, hart: usize) -> u64 {
        self.regs.read_mtimecmp(hart)
    }
}
