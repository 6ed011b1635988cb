//! # BIOS Boot Stage Sequencer
//!
//! Models the path a BIOS loader takes from power-on to the kernel entry point:
//!
//! ```text
//! RealMode ──survey_memory──▶ Surveyed ──enter_protected_mode──▶ ProtectedMode
//!                                                                    │
//!              hand_off ◀── LongMode ◀──────enter_long_mode──────────┘
//! ```
//!
//! Each stage is its own type and every transition consumes the previous
//! stage, so there is no way to name an earlier, less capable mode once it has
//! been left. The firmware handle is dropped by [`RealMode::survey_memory`];
//! code past that point cannot issue BIOS calls.
//!
//! The privileged instructions themselves (`lgdt`, `mov cr0`, `wrmsr`, far
//! jumps) belong to the loader and sit behind [`ModeControl`]. After every
//! transition the sequencer reads the control registers back and refuses to
//! continue unless the processor reports the expected [`CpuMode`].
//!
//! [`CpuMode`]: kernel_info::boot::CpuMode

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod cpu;
mod error;
pub mod firmware;
pub mod gdt;
pub mod mode;
mod stage;

pub use cpu::{ModeControl, PageTableRoot};
pub use error::BootError;
pub use firmware::{E820Entry, E820Reply, Firmware, FirmwareError};
pub use stage::{BootStage, LongMode, ProtectedMode, RealMode, Surveyed};
