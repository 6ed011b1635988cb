//! # Boot Stages
//!
//! One type per stage. Transitions take `self` by value and return the next
//! stage, so an earlier stage cannot be observed again once left.

use crate::cpu::{ModeControl, PageTableRoot};
use core::convert::Infallible;
use crate::error::BootError;
use crate::firmware::{E820_CALL_LIMIT, Firmware, FirmwareError};
use crate::gdt::FLAT_GDT;
use crate::mode;
use kernel_info::boot::{BootHandOff, CpuMode, KernelBootInfo};
use kernel_info::mmap::{MemoryMap, MemoryRegion};
use log::{debug, info, trace};

/// Position in the linear boot sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum BootStage {
    Real,
    Protected,
    Long,
    /// Control has been transferred to the kernel.
    HandedOff,
}

impl BootStage {
    /// The stage that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Real => Some(Self::Protected),
            Self::Protected => Some(Self::Long),
            Self::Long => Some(Self::HandedOff),
            Self::HandedOff => None,
        }
    }

    /// Only single steps forward are allowed.
    #[must_use]
    pub fn can_advance_to(self, other: Self) -> bool {
        self.next() == Some(other)
    }
}

/// Checks that the processor reports `expected` after a transition.
fn expect_mode<C: ModeControl>(cpu: &C, expected: CpuMode) -> Result<(), BootError> {
    let observed = mode::classify(&cpu.control_registers())?;
    if observed == expected {
        Ok(())
    } else {
        Err(BootError::ModeTransition { expected, observed })
    }
}

/// Power-on state: 16-bit real mode with BIOS services available.
pub struct RealMode<F, C> {
    firmware: F,
    cpu: C,
}

impl<F: Firmware, C: ModeControl> RealMode<F, C> {
    /// Takes over from the first-stage loader.
    ///
    /// # Errors
    /// [`BootError::ModeTransition`] if the processor is not in real mode.
    pub fn power_on(firmware: F, cpu: C) -> Result<Self, BootError> {
        expect_mode(&cpu, CpuMode::Real)?;
        info!("boot: real mode");
        Ok(Self { firmware, cpu })
    }

    #[must_use]
    pub const fn stage(&self) -> BootStage {
        BootStage::Real
    }

    /// Collects the E820 memory map into `storage`, sorted by base address.
    ///
    /// This is the last point at which firmware services exist; the firmware
    /// handle is dropped here.
    ///
    /// # Errors
    /// Any firmware failure, more entries than `storage` holds, or an empty map.
    pub fn survey_memory(
        mut self,
        storage: &mut [MemoryRegion],
    ) -> Result<Surveyed<'_, C>, BootError> {
        let capacity = storage.len();
        let mut count = 0;
        let mut continuation = 0;
        let mut calls = 0;

        loop {
            if calls == E820_CALL_LIMIT {
                return Err(FirmwareError::Unterminated.into());
            }
            calls += 1;

            let reply = self.firmware.e820(continuation)?;
            let entry = reply.entry;
            if entry.is_ignored() {
                trace!(
                    "e820: skipping {:#x}+{:#x} type {}",
                    entry.base, entry.length, entry.kind
                );
            } else {
                let slot = storage
                    .get_mut(count)
                    .ok_or(BootError::MemoryMapOverflow { capacity })?;
                *slot = entry.to_region();
                debug!("e820: {slot}");
                count += 1;
            }

            continuation = reply.continuation;
            if continuation == 0 {
                break;
            }
        }

        if count == 0 {
            return Err(BootError::EmptyMemoryMap);
        }

        let (regions, _) = storage.split_at_mut(count);
        regions.sort_unstable_by_key(|r| r.start);
        let regions: &[MemoryRegion] = regions;

        let map = MemoryMap::new(regions);
        info!(
            "boot: memory map has {} regions, {} KiB usable",
            map.len(),
            map.usable_bytes() / 1024
        );

        Ok(Surveyed {
            cpu: self.cpu,
            regions,
        })
    }
}

/// Still in real mode, memory map collected, firmware released.
pub struct Surveyed<'m, C> {
    cpu: C,
    regions: &'m [MemoryRegion],
}

impl<'m, C: ModeControl> Surveyed<'m, C> {
    #[must_use]
    pub const fn stage(&self) -> BootStage {
        BootStage::Real
    }

    #[must_use]
    pub const fn memory_map(&self) -> MemoryMap<'m> {
        MemoryMap::new(self.regions)
    }

    /// Loads the flat GDT and sets `CR0.PE`.
    ///
    /// # Errors
    /// [`BootError::ModeTransition`] if the processor does not report
    /// protected mode afterwards.
    pub fn enter_protected_mode(mut self) -> Result<ProtectedMode<'m, C>, BootError> {
        let mut regs = self.cpu.control_registers();
        regs.cr0.set_pe(true);

        // SAFETY: FLAT_GDT is static and the flat segments cover the
        // identity-mapped loader.
        unsafe {
            self.cpu.load_gdt(&FLAT_GDT);
            self.cpu.write_control_registers(regs);
        }
        expect_mode(&self.cpu, CpuMode::Protected)?;
        info!("boot: protected mode");

        Ok(ProtectedMode {
            cpu: self.cpu,
            regions: self.regions,
        })
    }
}

/// 32-bit protected mode with flat segmentation.
pub struct ProtectedMode<'m, C> {
    cpu: C,
    regions: &'m [MemoryRegion],
}

impl<'m, C: ModeControl> ProtectedMode<'m, C> {
    #[must_use]
    pub const fn stage(&self) -> BootStage {
        BootStage::Protected
    }

    #[must_use]
    pub const fn memory_map(&self) -> MemoryMap<'m> {
        MemoryMap::new(self.regions)
    }

    /// Enables `CR4.PAE`, loads `root` into `CR3`, sets `EFER.LME` and finally
    /// `CR0.PG`, which activates long mode.
    ///
    /// # Errors
    /// [`BootError::ModeTransition`] if the processor does not report long
    /// mode afterwards.
    pub fn enter_long_mode(mut self, root: PageTableRoot) -> Result<LongMode<'m, C>, BootError> {
        let mut regs = self.cpu.control_registers();

        // SAFETY: each step only adds a bit the architecture requires before
        // the next one; paging is enabled last, with `root` loaded.
        unsafe {
            regs.cr4.set_pae(true);
            self.cpu.write_control_registers(regs);

            self.cpu.load_page_table_root(root);

            regs.efer.set_lme(true);
            self.cpu.write_control_registers(regs);

            regs.cr0.set_pg(true);
            self.cpu.write_control_registers(regs);
        }
        expect_mode(&self.cpu, CpuMode::Long)?;
        info!("boot: long mode, CR3={:#x}", root.as_u64());

        Ok(LongMode {
            cpu: self.cpu,
            regions: self.regions,
        })
    }
}

/// 64-bit long mode, paging on. The only remaining step is the jump into the
/// kernel.
pub struct LongMode<'m, C> {
    cpu: C,
    regions: &'m [MemoryRegion],
}

impl<'m, C: ModeControl> LongMode<'m, C> {
    #[must_use]
    pub const fn stage(&self) -> BootStage {
        BootStage::Long
    }

    #[must_use]
    pub const fn hand_off_state(&self) -> BootHandOff<'m> {
        BootHandOff::new(MemoryMap::new(self.regions), CpuMode::Long)
    }

    /// The processor this stage drives. Only long mode exposes it, since
    /// nothing may undo the earlier transitions.
    #[must_use]
    pub const fn cpu(&self) -> &C {
        &self.cpu
    }

    /// Transfers control to the kernel. The sequencer is never re-entered.
    ///
    /// `entry` diverges; a body ending in a `-> !` call satisfies the
    /// `Infallible` return.
    pub fn hand_off<E>(self, entry: E) -> !
    where
        E: FnOnce(&KernelBootInfo) -> Infallible,
    {
        let boot_info = KernelBootInfo::new(&self.hand_off_state());
        info!(
            "boot: handing off, {} regions at {:#x}",
            boot_info.mmap.regions_len, boot_info.mmap.regions_ptr
        );
        match entry(&boot_info) {}
    }
}
