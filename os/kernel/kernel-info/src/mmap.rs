//! # Physical Memory Map
//!
//! The loader asks the firmware which physical ranges exist before it leaves
//! real mode. The answer reaches the kernel as a slice of [`MemoryRegion`]s.

use core::fmt;

/// What a physical range may be used for.
///
/// The first five values are the BIOS E820 type codes.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MemoryKind {
    /// Free RAM.
    Usable = 1,
    /// Reserved by the firmware or hardware (ROM, MMIO, ...).
    Reserved = 2,
    /// ACPI tables; usable once they have been parsed.
    AcpiReclaimable = 3,
    /// ACPI non-volatile storage; must be preserved.
    AcpiNvs = 4,
    /// RAM reported as defective.
    BadMemory = 5,
    /// Occupied by the loader, the kernel image, page tables or this boot
    /// information itself.
    Bootloader = 0x1000,
}

impl MemoryKind {
    /// Maps an E820 type code. Codes the kernel does not know are treated as
    /// reserved.
    #[must_use]
    pub const fn from_e820(code: u32) -> Self {
        match code {
            1 => Self::Usable,
            3 => Self::AcpiReclaimable,
            4 => Self::AcpiNvs,
            5 => Self::BadMemory,
            _ => Self::Reserved,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usable => "usable",
            Self::Reserved => "reserved",
            Self::AcpiReclaimable => "acpi-reclaimable",
            Self::AcpiNvs => "acpi-nvs",
            Self::BadMemory => "bad",
            Self::Bootloader => "bootloader",
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A half-open physical range `[start, end)` with its usage tag.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MemoryRegion {
    pub start: u64,
    pub end: u64,
    pub kind: MemoryKind,
}

impl MemoryRegion {
    /// Placeholder used to pre-fill region storage.
    pub const EMPTY: Self = Self {
        start: 0,
        end: 0,
        kind: MemoryKind::Reserved,
    };

    /// Builds a region from a base and a length, saturating at the top of the
    /// address space.
    #[must_use]
    pub const fn from_base_len(base: u64, len: u64, kind: MemoryKind) -> Self {
        Self {
            start: base,
            end: base.saturating_add(len),
            kind,
        }
    }

    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub const fn is_usable(&self) -> bool {
        matches!(self.kind, MemoryKind::Usable)
    }

    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#012x}..{:#012x} {}", self.start, self.end, self.kind)
    }
}

/// Read-only view over the regions handed over by the loader.
#[derive(Debug, Copy, Clone)]
pub struct MemoryMap<'a> {
    regions: &'a [MemoryRegion],
}

impl<'a> MemoryMap<'a> {
    #[must_use]
    pub const fn new(regions: &'a [MemoryRegion]) -> Self {
        Self { regions }
    }

    #[must_use]
    pub const fn regions(&self) -> &'a [MemoryRegion] {
        self.regions
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'a, MemoryRegion> {
        self.regions.iter()
    }

    /// Regions tagged [`MemoryKind::Usable`].
    pub fn usable(&self) -> impl Iterator<Item = &'a MemoryRegion> + 'a {
        self.regions.iter().filter(|r| r.is_usable())
    }

    /// Total bytes of usable RAM.
    #[must_use]
    pub fn usable_bytes(&self) -> u64 {
        self.usable().map(MemoryRegion::len).sum()
    }

    /// The first region covering `addr`.
    #[must_use]
    pub fn find(&self, addr: u64) -> Option<&'a MemoryRegion> {
        self.regions.iter().find(|r| r.contains(addr))
    }
}

impl<'a> IntoIterator for MemoryMap<'a> {
    type Item = &'a MemoryRegion;
    type IntoIter = core::slice::Iter<'a, MemoryRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: [MemoryRegion; 4] = [
        MemoryRegion::from_base_len(0, 0x9_fc00, MemoryKind::Usable),
        MemoryRegion::from_base_len(0x9_fc00, 0x400, MemoryKind::Reserved),
        MemoryRegion::from_base_len(0x10_0000, 0x7ee_0000, MemoryKind::Usable),
        MemoryRegion::from_base_len(0xfffc_0000, 0x4_0000, MemoryKind::Reserved),
    ];

    #[test]
    fn usable_bytes_sums_usable_regions_only() {
        let map = MemoryMap::new(&MAP);
        assert_eq!(map.usable().count(), 2);
        assert_eq!(map.usable_bytes(), 0x9_fc00 + 0x7ee_0000);
    }

    #[test]
    fn find_respects_half_open_ranges() {
        let map = MemoryMap::new(&MAP);
        assert_eq!(map.find(0x9_fbff).map(|r| r.kind), Some(MemoryKind::Usable));
        assert_eq!(map.find(0x9_fc00).map(|r| r.kind), Some(MemoryKind::Reserved));
        assert!(map.find(0xa_0000).is_none());
    }

    #[test]
    fn unknown_e820_codes_are_reserved() {
        assert_eq!(MemoryKind::from_e820(1), MemoryKind::Usable);
        assert_eq!(MemoryKind::from_e820(5), MemoryKind::BadMemory);
        assert_eq!(MemoryKind::from_e820(12), MemoryKind::Reserved);
        assert_eq!(MemoryKind::from_e820(0), MemoryKind::Reserved);
    }

    #[test]
    fn length_saturates() {
        let r = MemoryRegion::from_base_len(u64::MAX - 1, 16, MemoryKind::Usable);
        assert_eq!(r.end, u64::MAX);
        assert_eq!(r.len(), 1);
        assert!(MemoryRegion::EMPTY.is_empty());
    }
}
