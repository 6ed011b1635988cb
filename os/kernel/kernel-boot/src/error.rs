use crate::firmware::FirmwareError;
use crate::mode::ModeError;
use kernel_info::boot::CpuMode;

/// Conditions that stop the boot sequence. None of them can be recovered
/// from; the loader halts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    #[error("memory map query failed: {0}")]
    Firmware(#[from] FirmwareError),
    #[error("memory map does not fit into {capacity} entries")]
    MemoryMapOverflow { capacity: usize },
    #[error("firmware reported no memory regions")]
    EmptyMemoryMap,
    #[error("expected {expected}, processor reports {observed}")]
    ModeTransition { expected: CpuMode, observed: CpuMode },
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("page table root {0:#x} is not 4 KiB aligned")]
    MisalignedPageTable(u64),
    #[error("page table root {0:#x} is not addressable from protected mode")]
    PageTableOutOfReach(u64),
}
