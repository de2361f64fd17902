#![no_std]

//! Timer and inter-processor-interrupt controller driver for a CLINT-style
//! memory-mapped register block: cold/warm boot sequencing, hart-mask IPI
//! delivery, and per-hart one-shot deadlines over a shared counter.

pub mod clint;
pub mod consts;
pub mod dispatch;
pub mod regs;
