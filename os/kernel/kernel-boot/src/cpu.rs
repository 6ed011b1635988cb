use crate::BootError;
use crate::gdt::FlatGdt;
use kernel_registers::ControlRegisters;

/// Privileged operations the loader performs to change processor mode.
///
/// On hardware these are single instructions (`lgdt`, `mov crN`, `wrmsr`)
/// issued from the loader's own assembly. The sequencer only decides the order
/// and the values.
pub trait ModeControl {
    /// Reads `CR0`, `CR4` and `EFER`.
    fn control_registers(&self) -> ControlRegisters;

    /// # Safety
    /// The table must stay mapped and unchanged while any selector refers to it.
    unsafe fn load_gdt(&mut self, gdt: &'static FlatGdt);

    /// Writes `CR4`, `EFER` and `CR0`, in that order.
    ///
    /// # Safety
    /// The new values must be valid for the code currently executing; enabling
    /// paging requires a loaded page table root that maps it.
    unsafe fn write_control_registers(&mut self, regs: ControlRegisters);

    /// Loads `CR3`.
    ///
    /// # Safety
    /// `root` must point at a PML4 that identity maps the loader and kernel.
    unsafe fn load_page_table_root(&mut self, root: PageTableRoot);
}

/// Physical address of the PML4 the loader built.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PageTableRoot(u64);

impl PageTableRoot {
    /// `CR3` is loaded from 32-bit protected mode, so the table must be below
    /// 4 GiB and page aligned.
    ///
    /// # Errors
    /// [`BootError::MisalignedPageTable`] or [`BootError::PageTableOutOfReach`].
    pub const fn new(phys: u64) -> Result<Self, BootError> {
        if phys & 0xfff != 0 {
            return Err(BootError::MisalignedPageTable(phys));
        }
        if phys > u32::MAX as u64 {
            return Err(BootError::PageTableOutOfReach(phys));
        }
        Ok(Self(phys))
    }

    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}
