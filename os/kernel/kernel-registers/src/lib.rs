//! # Typed `x86_64` Control Registers
//!
//! Bit-level models of the registers that decide which operating mode the
//! processor is in: `CR0` (protection and paging), `CR4` (physical address
//! extension) and the `EFER` MSR (long mode enable/active).
//!
//! The models are plain values and can be built, inspected and compared on any
//! host. Reading the live registers is privileged and only available
//! with the `asm` feature on `x86_64`.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod control;
pub mod cr0;
pub mod cr4;
pub mod efer;

pub use control::ControlRegisters;
pub use cr0::Cr0;
pub use cr4::Cr4;
pub use efer::Efer;

pub trait LoadRegisterUnsafe {
    /// # Safety
    /// The caller must uphold the implementation-specific safety requirements.
    /// For example, the register access might be privileged and require kernel mode (Ring 0).
    unsafe fn load_unsafe() -> Self;
}
