//! # Processor Mode Classification

use kernel_info::boot::CpuMode;
use kernel_registers::ControlRegisters;

/// Control register combinations no processor can be in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent control registers: CR0={cr0:#x} CR4={cr4:#x} EFER={efer:#x}")]
pub struct ModeError {
    pub cr0: u64,
    pub cr4: u64,
    pub efer: u64,
}

impl From<&ControlRegisters> for ModeError {
    fn from(regs: &ControlRegisters) -> Self {
        Self {
            cr0: regs.cr0.into_bits(),
            cr4: regs.cr4.into_bits(),
            efer: regs.efer.into_bits(),
        }
    }
}

/// Derives the operating mode from a register snapshot.
///
/// * `CR0.PE` clear: real mode. Paging or an active long mode without
///   protection is rejected.
/// * `CR0.PE` set, `EFER.LMA` clear: protected mode (paged or not).
/// * `EFER.LMA` set: long mode, which requires `CR0.PG` and `CR4.PAE`.
///
/// # Errors
/// Returns [`ModeError`] for combinations the architecture does not allow.
pub fn classify(regs: &ControlRegisters) -> Result<CpuMode, ModeError> {
    let pe = regs.cr0.pe();
    let pg = regs.cr0.pg();
    let pae = regs.cr4.pae();
    let lma = regs.efer.lma();

    match (pe, lma) {
        (false, false) if !pg => Ok(CpuMode::Real),
        (true, false) => Ok(CpuMode::Protected),
        (true, true) if pg && pae => Ok(CpuMode::Long),
        _ => Err(ModeError::from(regs)),
    }
}
