/// Compiled-in ceiling on supported harts; keeps a `HartMask` inside one
/// `usize` word on rv32 as well as rv64.
pub const MAX_HARTS: usize = 32;

/// Default register-group offsets (SiFive/QEMU-virt CLINT placement).
pub const MSIP_BASE: usize = 0x0000;
pub const MTIMECMP_BASE: usize = 0x4000;
pub const MTIME_OFFSET: usize = 0xBFF8;

/// `MSIP[i]` is a 32-bit register, `MTIMECMP[i]` a 64-bit one.
pub const MSIP_STRIDE: usize = 4;
pub const MTIMECMP_STRIDE: usize = 8;

/// Compare value the counter never reaches: the disarmed state.
pub const MTIMECMP_DISARMED: u64 = u64::MAX;
