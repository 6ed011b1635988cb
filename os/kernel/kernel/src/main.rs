//! # Kernel Entry Point
//!
//! The BIOS bootloader (bootloader 0.9, packaged by `bootimage`) switches to
//! long mode, identity maps the kernel at `KERNEL_BASE`, sets up a stack and
//! jumps to [`_start`] with a pointer to its `BootInfo`.

#![no_std]
#![no_main]
#![allow(unsafe_code)]

#[cfg(not(panic = "abort"))]
compile_error!("the kernel image must be built with panic = \"abort\": there is no unwinder below it");

use kernel::bios;
use kernel::entry::kernel_entry;
use kernel::machine::BareMetal;
use kernel::rt::halt_forever;
use kernel_info::boot::{BootHandOff, CpuMode};
use kernel_info::mmap::MemoryMap;
use kernel_vga::TextBuffer;
use log::error;

#[cfg(feature = "qemu")]
static LOGGER: kernel_qemu::QemuLogger = kernel_qemu::QemuLogger::new(log::LevelFilter::Debug);

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    kernel::rt::trap(info)
}

/// The kernel entry point
///
/// # Loader Interaction
/// The bootloader jumps here in long mode, with interrupts disabled and the
/// kernel stack already set up. Returning is impossible; there is no caller.
///
/// # ABI
/// `extern "C"`: the `BootInfo` pointer arrives in `RDI`.
#[unsafe(no_mangle)]
pub extern "C" fn _start(boot_info: &'static bootloader::BootInfo) -> ! {
    #[cfg(feature = "qemu")]
    {
        kernel_qemu::qemu_trace!("Kernel reporting to QEMU!\n");
        if LOGGER.init().is_err() {
            kernel_qemu::qemu_trace!("Logger was already installed\n");
        }
    }

    let regions = match bios::memory_regions(boot_info.memory_map.iter()) {
        Ok(regions) => regions,
        Err(e) => {
            error!("Unusable memory map from the bootloader: {e}");
            halt_forever(&mut BareMetal)
        }
    };

    let Some(screen) = TextBuffer::take() else {
        error!("VGA text buffer already taken");
        halt_forever(&mut BareMetal)
    };

    // bootloader 0.9 only ever enters the kernel in long mode; `kernel_entry`
    // checks this claim against the control registers.
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
    kernel_entry(BareMetal, hand_off, screen)
}
