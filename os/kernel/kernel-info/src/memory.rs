//! # Memory Layout

/// Where the kernel image is linked and loaded. The loader identity maps this
/// region, so virtual and physical addresses coincide.
///
/// # Kernel Build
/// This information is sourced in the kernel's `build.rs` to configure
/// the linker.
pub const KERNEL_BASE: u64 = 0x0020_0000; // 2 MiB

/// Physical base of the VGA text-mode buffer.
pub const VGA_TEXT_BASE: u64 = 0x000B_8000;

/// Bytes occupied by the 80x25 text-mode buffer.
pub const VGA_TEXT_SIZE: u64 = 80 * 25 * 2;

/// Capacity the kernel reserves for the memory map it receives.
pub const MAX_MEMORY_REGIONS: usize = 64;

const _: () = {
    assert!(KERNEL_BASE.is_multiple_of(2 * 1024 * 1024));
    assert!(VGA_TEXT_BASE + VGA_TEXT_SIZE <= 0x000C_0000);
    assert!(VGA_TEXT_BASE + VGA_TEXT_SIZE < KERNEL_BASE);
};
