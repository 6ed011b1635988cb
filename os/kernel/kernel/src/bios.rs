//! # Bootloader Memory Map
//!
//! Translates the frame ranges bootloader 0.9 leaves in its `BootInfo` into
//! the kernel's [`MemoryRegion`]s.

use arrayvec::ArrayVec;
use bootloader::bootinfo::{MemoryRegion as LoaderRegion, MemoryRegionType};
use kernel_boot::BootError;
use kernel_info::memory::MAX_MEMORY_REGIONS;
use kernel_info::mmap::{MemoryKind, MemoryRegion};

/// The memory map in kernel terms, in the order the bootloader reported it.
pub type Regions = ArrayVec<MemoryRegion, MAX_MEMORY_REGIONS>;

/// How the kernel sees a bootloader region type; `None` for unused slots.
///
/// Ranges the bootloader carved out for itself, the kernel image, its stack
/// and page tables all count as [`MemoryKind::Bootloader`]. Anything the
/// kernel does not recognize is [`MemoryKind::Reserved`].
#[must_use]
pub const fn kind_of(region_type: MemoryRegionType) -> Option<MemoryKind> {
    Some(match region_type {
        MemoryRegionType::Empty => return None,
        MemoryRegionType::Usable => MemoryKind::Usable,
        MemoryRegionType::AcpiReclaimable => MemoryKind::AcpiReclaimable,
        MemoryRegionType::AcpiNvs => MemoryKind::AcpiNvs,
        MemoryRegionType::BadMemory => MemoryKind::BadMemory,
        MemoryRegionType::InUse
        | MemoryRegionType::Kernel
        | MemoryRegionType::KernelStack
        | MemoryRegionType::PageTable
        | MemoryRegionType::Bootloader
        | MemoryRegionType::FrameZero
        | MemoryRegionType::BootInfo
        | MemoryRegionType::Package => MemoryKind::Bootloader,
        _ => MemoryKind::Reserved,
    })
}

/// Converts the bootloader's regions, dropping empty slots.
///
/// # Errors
/// [`BootError::MemoryMapOverflow`] if more than [`MAX_MEMORY_REGIONS`]
/// regions remain.
pub fn memory_regions<'r, I>(loader_regions: I) -> Result<Regions, BootError>
where
    I: IntoIterator<Item = &'r LoaderRegion>,
{
    let mut regions = Regions::new();
    for region in loader_regions {
        let Some(kind) = kind_of(region.region_type) else {
            continue;
        };
        let region = MemoryRegion {
            start: region.range.start_addr(),
            end: region.range.end_addr(),
            kind,
        };
        regions
            .try_push(region)
            .map_err(|_| BootError::MemoryMapOverflow {
                capacity: MAX_MEMORY_REGIONS,
            })?;
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootloader::bootinfo::FrameRange;

    fn loader_region(start: u64, end: u64, region_type: MemoryRegionType) -> LoaderRegion {
        LoaderRegion {
            range: FrameRange::new(start, end),
            region_type,
        }
    }

    #[test]
    fn empty_slots_are_dropped() {
        let loader = [
            loader_region(0, 0x1000, MemoryRegionType::FrameZero),
            loader_region(0, 0, MemoryRegionType::Empty),
            loader_region(0x1000, 0x9_f000, MemoryRegionType::Usable),
            loader_region(0, 0, MemoryRegionType::Empty),
        ];
        let regions = memory_regions(&loader).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].start, 0x1000);
        assert_eq!(regions[1].end, 0x9_f000);
        assert_eq!(regions[1].kind, MemoryKind::Usable);
    }

    #[test]
    fn kinds_follow_the_kernel_view() {
        assert_eq!(kind_of(MemoryRegionType::Usable), Some(MemoryKind::Usable));
        assert_eq!(kind_of(MemoryRegionType::Reserved), Some(MemoryKind::Reserved));
        assert_eq!(
            kind_of(MemoryRegionType::AcpiReclaimable),
            Some(MemoryKind::AcpiReclaimable)
        );
        assert_eq!(kind_of(MemoryRegionType::AcpiNvs), Some(MemoryKind::AcpiNvs));
        assert_eq!(kind_of(MemoryRegionType::BadMemory), Some(MemoryKind::BadMemory));
        for loader_owned in [
            MemoryRegionType::InUse,
            MemoryRegionType::Kernel,
            MemoryRegionType::KernelStack,
            MemoryRegionType::PageTable,
            MemoryRegionType::Bootloader,
            MemoryRegionType::FrameZero,
            MemoryRegionType::BootInfo,
            MemoryRegionType::Package,
        ] {
            assert_eq!(kind_of(loader_owned), Some(MemoryKind::Bootloader));
        }
        assert_eq!(kind_of(MemoryRegionType::UnknownBios(7)), Some(MemoryKind::Reserved));
        assert_eq!(kind_of(MemoryRegionType::Empty), None);
    }

    #[test]
    fn too_many_regions_overflow() {
        let loader: Vec<_> = (0..=MAX_MEMORY_REGIONS as u64)
            .map(|i| loader_region(i * 0x1000, (i + 1) * 0x1000, MemoryRegionType::Usable))
            .collect();
        let err = memory_regions(&loader).unwrap_err();
        assert!(matches!(
            err,
            BootError::MemoryMapOverflow {
                capacity: MAX_MEMORY_REGIONS
            }
        ));

        let fits = memory_regions(&loader[..MAX_MEMORY_REGIONS]).unwrap();
        assert!(fits.is_full());
    }
}
