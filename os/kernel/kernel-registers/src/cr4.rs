use crate::LoadRegisterUnsafe;
use bitfield_struct::bitfield;

/// `CR4`, low architectural bits only.
///
/// Long mode requires `PAE` to be set before `CR0.PG` is turned on.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Cr4 {
    /// Bit 0 — Virtual-8086 Mode Extensions.
    pub vme: bool,
    /// Bit 1 — Protected-Mode Virtual Interrupts.
    pub pvi: bool,
    /// Bit 2 — Time Stamp Disable.
    pub tsd: bool,
    /// Bit 3 — Debugging Extensions.
    pub de: bool,
    /// Bit 4 — Page Size Extensions.
    pub pse: bool,
    /// Bit 5 — Physical Address Extension.
    pub pae: bool,
    /// Bit 6 — Machine-Check Enable.
    pub mce: bool,
    /// Bit 7 — Page Global Enable.
    pub pge: bool,
    /// Bit 8 — Performance-Monitoring Counter Enable.
    pub pce: bool,
    /// Bit 9 — OS supports `FXSAVE`/`FXRSTOR`.
    pub osfxsr: bool,
    /// Bit 10 — OS supports unmasked SIMD floating point exceptions.
    pub osxmmexcpt: bool,
    /// Bit 11 — User-Mode Instruction Prevention.
    pub umip: bool,
    /// Bit 12 — 5-level paging.
    pub la57: bool,
    #[bits(51)]
    _reserved_13_63: u64,
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for Cr4 {
    unsafe fn load_unsafe() -> Self {
        let cr4: u64;
        unsafe {
            core::arch::asm!("mov {}, cr4", out(reg) cr4, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(cr4)
    }
}
