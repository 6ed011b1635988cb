//! # Kernel Boot Interface
//!
//! This crate is the contract between the BIOS boot path and the kernel. It
//! defines what the loader leaves behind when it jumps to the kernel entry
//! point, and the fixed physical layout both sides agree on.
//!
//! ## Boot path
//!
//! ```text
//! Firmware (BIOS)
//!     ↓
//! First-stage loader (MBR)
//!     ↓
//! Second-stage loader
//!     • E820 memory map query   (real mode, firmware services available)
//!     • flat GDT, CR0.PE        → protected mode
//!     • CR4.PAE, CR3, EFER.LME, CR0.PG → long mode
//!     ↓
//! _start(boot_info)             (kernel, never returns)
//! ```
//!
//! The stages are one-way: once the loader leaves real mode the firmware is
//! gone, which is why the memory map must be collected first and handed over
//! as data.
//!
//! ## Modules
//!
//! ### Boot Information ([`boot`])
//! * [`KernelBootInfo`](boot::KernelBootInfo): the `#[repr(C)]` structure passed by pointer
//! * [`BootHandOff`](boot::BootHandOff): the borrowed, validated view the kernel works with
//! * [`CpuMode`](boot::CpuMode): the processor mode guaranteed at entry
//!
//! ### Memory Map ([`mmap`])
//! * [`MemoryRegion`](mmap::MemoryRegion) / [`MemoryKind`](mmap::MemoryKind): tagged physical ranges
//! * [`MemoryMap`](mmap::MemoryMap): read-only view with usable-RAM accounting
//!
//! ### Memory Layout ([`memory`])
//! Compile-time constants shared by the loader, `build.rs` and the kernel.
//!
//! ## Physical Memory Layout
//!
//! ```text
//! 0x0000_0000 ┌─────────────────────────────────┐
//!             │  Real-mode IVT, BDA, loader     │
//! 0x000B_8000 ├─────────────────────────────────┤ VGA_TEXT_BASE
//!             │  VGA text buffer (80x25x2)      │
//!             ├─────────────────────────────────┤
//!             │  BIOS ROM shadow                │
//! 0x0020_0000 ├─────────────────────────────────┤ KERNEL_BASE
//!             │  Kernel image (identity mapped) │
//!             ├─────────────────────────────────┤
//!             │  Usable RAM per memory map      │
//!             └─────────────────────────────────┘
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod boot;
pub mod memory;
pub mod mmap;
