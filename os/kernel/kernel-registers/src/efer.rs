use crate::LoadRegisterUnsafe;
use bitfield_struct::bitfield;

/// `IA32_EFER` (MSR `0xC000_0080`).
///
/// `LME` requests long mode; the processor reports it in `LMA` once paging is
/// enabled on top of it.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct Efer {
    /// Bit 0 — System Call Extensions (`SYSCALL`/`SYSRET`).
    pub sce: bool,
    #[bits(7)]
    _reserved_1_7: u8,
    /// Bit 8 — Long Mode Enable.
    pub lme: bool,
    _reserved_9: bool,
    /// Bit 10 — Long Mode Active. Set by the processor.
    pub lma: bool,
    /// Bit 11 — No-Execute Enable.
    pub nxe: bool,
    #[bits(52)]
    _reserved_12_63: u64,
}

impl Efer {
    /// MSR index for `IA32_EFER`.
    pub const MSR_EFER: u32 = 0xC000_0080;
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for Efer {
    unsafe fn load_unsafe() -> Self {
        let (lo, hi): (u32, u32);
        unsafe {
            core::arch::asm!(
                "rdmsr",
                in("ecx") Self::MSR_EFER,
                out("eax") lo,
                out("edx") hi,
                options(nomem, nostack, preserves_flags)
            );
        }
        Self::from_bits((u64::from(hi) << 32) | u64::from(lo))
    }
}
