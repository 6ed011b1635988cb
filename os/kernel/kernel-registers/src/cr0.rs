use crate::LoadRegisterUnsafe;
use bitfield_struct::bitfield;

/// `CR0`, as seen in 64-bit mode.
///
/// `PE` and `PG` are the two bits the boot path toggles; the remaining flags
/// are modeled so a loaded value can be written back unchanged.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Cr0 {
    /// Bit 0 — Protection Enable. Clear means real mode.
    pub pe: bool,
    /// Bit 1 — Monitor Coprocessor.
    pub mp: bool,
    /// Bit 2 — x87 Emulation.
    pub em: bool,
    /// Bit 3 — Task Switched.
    pub ts: bool,
    /// Bit 4 — Extension Type, hardwired to 1 on modern parts.
    pub et: bool,
    /// Bit 5 — Numeric Error.
    pub ne: bool,
    #[bits(10)]
    _reserved_6_15: u16,
    /// Bit 16 — Write Protect.
    pub wp: bool,
    _reserved_17: bool,
    /// Bit 18 — Alignment Mask.
    pub am: bool,
    #[bits(10)]
    _reserved_19_28: u16,
    /// Bit 29 — Not Write-through.
    pub nw: bool,
    /// Bit 30 — Cache Disable.
    pub cd: bool,
    /// Bit 31 — Paging. Requires `PE`.
    pub pg: bool,
    #[bits(32)]
    _reserved_32_63: u32,
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for Cr0 {
    unsafe fn load_unsafe() -> Self {
        let cr0: u64;
        unsafe {
            core::arch::asm!("mov {}, cr0", out(reg) cr0, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(cr0)
    }
}
