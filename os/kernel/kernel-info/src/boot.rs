//! # Kernel Boot Information

use crate::mmap::{MemoryMap, MemoryRegion};
use core::fmt;

/// Processor operating mode. Ordered from least to most capable; the boot path
/// only ever moves forward through this order.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CpuMode {
    /// 16-bit real mode, 1 MiB addressable, firmware services available.
    Real = 0,
    /// 32-bit protected mode with flat segmentation.
    Protected = 1,
    /// 64-bit long mode with paging.
    Long = 2,
}

impl fmt::Display for CpuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Real => "real mode",
            Self::Protected => "protected mode",
            Self::Long => "long mode",
        })
    }
}

/// Information the kernel receives at its entry point.
/// Keep this `#[repr(C)]` and prefer fixed-size integers at the ABI boundary.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct KernelBootInfo {
    /// Memory map information.
    pub mmap: MemoryMapInfo,

    /// The mode the loader left the processor in.
    pub cpu_mode: CpuMode,
}

#[repr(C)]
#[derive(Debug, Clone)]
pub struct MemoryMapInfo {
    /// Pointer to the first [`MemoryRegion`].
    pub regions_ptr: u64,

    /// Number of regions (not bytes).
    pub regions_len: u64,
}

impl KernelBootInfo {
    /// Describes `hand_off` in the raw ABI form. The result borrows nothing, so
    /// the regions must outlive every use of the returned value.
    #[must_use]
    pub fn new(hand_off: &BootHandOff<'_>) -> Self {
        let regions = hand_off.memory_map.regions();
        Self {
            mmap: MemoryMapInfo {
                regions_ptr: regions.as_ptr() as u64,
                regions_len: regions.len() as u64,
            },
            cpu_mode: hand_off.cpu_mode,
        }
    }

    /// Reinterprets the raw structure as a borrowed hand-off.
    ///
    /// # Safety
    /// `mmap.regions_ptr` must point to `mmap.regions_len` initialized regions
    /// that stay valid and unmodified for the lifetime of `self`.
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn hand_off(&self) -> BootHandOff<'_> {
        let regions: &[MemoryRegion] = if self.mmap.regions_len == 0 || self.mmap.regions_ptr == 0
        {
            &[]
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let len = self.mmap.regions_len as usize;
            unsafe { core::slice::from_raw_parts(self.mmap.regions_ptr as *const MemoryRegion, len) }
        };
        BootHandOff::new(MemoryMap::new(regions), self.cpu_mode)
    }
}

/// The boot hand-off state: produced once by the loader, read-only afterwards.
#[derive(Debug, Copy, Clone)]
pub struct BootHandOff<'a> {
    memory_map: MemoryMap<'a>,
    cpu_mode: CpuMode,
}

impl<'a> BootHandOff<'a> {
    #[must_use]
    pub const fn new(memory_map: MemoryMap<'a>, cpu_mode: CpuMode) -> Self {
        Self {
            memory_map,
            cpu_mode,
        }
    }

    #[must_use]
    pub const fn memory_map(&self) -> MemoryMap<'a> {
        self.memory_map
    }

    #[must_use]
    pub const fn cpu_mode(&self) -> CpuMode {
        self.cpu_mode
    }

    /// Checks the guarantees the kernel relies on at entry.
    ///
    /// # Errors
    /// See [`HandOffError`].
    pub fn validate(&self) -> Result<(), HandOffError> {
        if self.cpu_mode != CpuMode::Long {
            return Err(HandOffError::NotLongMode(self.cpu_mode));
        }
        if self.memory_map.is_empty() {
            return Err(HandOffError::EmptyMemoryMap);
        }
        if self.memory_map.usable_bytes() == 0 {
            return Err(HandOffError::NoUsableMemory);
        }
        Ok(())
    }
}

/// Reasons a hand-off cannot be used.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandOffError {
    #[error("loader handed over an empty memory map")]
    EmptyMemoryMap,
    #[error("memory map has no usable RAM")]
    NoUsableMemory,
    #[error("kernel entered in {0}, expected long mode")]
    NotLongMode(CpuMode),
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::mmap::MemoryKind;

    fn regions() -> [MemoryRegion; 2] {
        [
            MemoryRegion::from_base_len(0x10_0000, 0x100_0000, MemoryKind::Usable),
            MemoryRegion::from_base_len(0xb_8000, 0x8000, MemoryKind::Reserved),
        ]
    }

    #[test]
    fn raw_round_trip_preserves_map_and_mode() {
        let regions = regions();
        let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
        let raw = KernelBootInfo::new(&hand_off);
        assert_eq!(raw.mmap.regions_len, 2);

        let back = unsafe { raw.hand_off() };
        assert_eq!(back.cpu_mode(), CpuMode::Long);
        assert_eq!(back.memory_map().regions(), &regions);
    }

    #[test]
    fn null_pointer_yields_empty_map() {
        let raw = KernelBootInfo {
            mmap: MemoryMapInfo {
                regions_ptr: 0,
                regions_len: 3,
            },
            cpu_mode: CpuMode::Long,
        };
        let hand_off = unsafe { raw.hand_off() };
        assert!(hand_off.memory_map().is_empty());
        assert_eq!(hand_off.validate(), Err(HandOffError::EmptyMemoryMap));
    }

    #[test]
    fn validation() {
        let regions = regions();
        let good = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
        assert_eq!(good.validate(), Ok(()));

        let protected = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Protected);
        assert_eq!(
            protected.validate(),
            Err(HandOffError::NotLongMode(CpuMode::Protected))
        );

        let reserved_only = [regions[1]];
        let starved = BootHandOff::new(MemoryMap::new(&reserved_only), CpuMode::Long);
        assert_eq!(starved.validate(), Err(HandOffError::NoUsableMemory));
    }

    #[test]
    fn modes_are_ordered() {
        assert!(CpuMode::Real < CpuMode::Protected);
        assert!(CpuMode::Protected < CpuMode::Long);
    }
}
