use crate::{Cr0, Cr4, Efer, LoadRegisterUnsafe};

/// Snapshot of the registers that together define the processor mode.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct ControlRegisters {
    pub cr0: Cr0,
    pub cr4: Cr4,
    pub efer: Efer,
}

impl ControlRegisters {
    /// The state the processor comes out of reset with: everything clear
    /// except `CR0.ET`.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            cr0: Cr0::new().with_et(true),
            cr4: Cr4::new(),
            efer: Efer::new(),
        }
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegisterUnsafe for ControlRegisters {
    unsafe fn load_unsafe() -> Self {
        unsafe {
            Self {
                cr0: Cr0::load_unsafe(),
                cr4: Cr4::load_unsafe(),
                efer: Efer::load_unsafe(),
            }
        }
    }
}
