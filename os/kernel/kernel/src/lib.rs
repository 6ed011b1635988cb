//! # Kernel Runtime
//!
//! Everything the freestanding image needs between the loader's jump and a
//! steady state, kept in a library so it can be driven on the host:
//!
//! * [`rt`]: the trap policy. Any unrecoverable condition ends up in
//!   [`rt::trap`], which reports what it can and halts forever. There is no
//!   unwinding; the image is built with `panic = "abort"`.
//! * [`entry`]: the kernel body behind `_start`. It runs exactly once, checks
//!   the hand-off state against the live processor, prints `OK` in the top
//!   left corner of the text screen and idles.
//! * [`machine`]: the real processor behind the [`entry::Machine`] seam.
//! * [`tracing`]: log helpers for the boot state.
//! * [`bios`]: the bootloader's memory map in kernel terms.
//!
//! The `_start` symbol itself lives in the `kernel` binary (feature
//! `baremetal`), which only builds for `target_os = "none"`.
//!
//! ## Building the image
//!
//! bootloader 0.9 expects a static, non-PIE kernel with `panic = "abort"`,
//! which `targets/x86_64-kernel.json` describes. From the workspace root, on
//! a nightly toolchain with `cargo-bootimage` and `llvm-tools-preview`:
//!
//! ```bash
//! cargo bootimage -p kernel --features baremetal \
//!     --target targets/x86_64-kernel.json \
//!     -Z build-std=core,compiler_builtins \
//!     -Z build-std-features=compiler-builtins-mem
//! qemu-system-x86_64 -drive format=raw,file=target/x86_64-kernel/debug/bootimage-kernel.bin \
//!     -debugcon stdio
//! ```
//!
//! Host builds (`cargo test`) need none of this: the binary is skipped
//! without `baremetal`.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod bios;
pub mod entry;
pub mod machine;
pub mod rt;
pub mod tracing;
