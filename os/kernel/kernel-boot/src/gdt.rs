//! # Flat Global Descriptor Table
//!
//! Protected mode needs a GDT before `CR0.PE` is set. The loader uses a flat
//! model: every segment spans the full 4 GiB from base 0, so segmentation is
//! effectively disabled and paging does the real work later on.
//!
//! Index | Selector | Descriptor
//! ------|----------|-----------
//! 0     | 0x00     | Null
//! 1     | 0x08     | 32-bit code, execute/read
//! 2     | 0x10     | Data, read/write (used for DS/ES/SS in both modes)
//! 3     | 0x18     | 64-bit code (`L=1`, `DB=0`)

use bitfield_struct::bitfield;

/// Bit layout shared by code and data segment descriptors.
#[bitfield(u64)]
#[derive(Eq, PartialEq)]
pub struct SegmentDescriptor {
    pub limit_lo: u16, // [15:0]
    pub base_lo: u16,  // [31:16]
    pub base_mid: u8,  // [39:32]
    #[bits(4)]
    pub typ: u8, // [43:40]
    pub s: bool, // [44]     code/data
    #[bits(2)]
    pub dpl: u8, // [46:45]
    pub p: bool, // [47]     present
    #[bits(4)]
    pub limit_hi: u8, // [51:48]
    pub avl: bool,    // [52]
    pub l: bool,      // [53]     64-bit code
    pub db: bool,     // [54]     32-bit default operand size
    pub g: bool,      // [55]     4 KiB granularity
    pub base_hi: u8,  // [63:56]
}

const TYPE_CODE_EXEC_READ: u8 = 0b1010;
const TYPE_DATA_READ_WRITE: u8 = 0b0010;

impl SegmentDescriptor {
    /// Ring-0 segment at base 0 with a 4 GiB limit.
    const fn flat(typ: u8) -> Self {
        Self::new()
            .with_limit_lo(0xffff)
            .with_limit_hi(0xf)
            .with_typ(typ)
            .with_s(true)
            .with_p(true)
            .with_g(true)
    }

    #[must_use]
    pub const fn code32() -> Self {
        Self::flat(TYPE_CODE_EXEC_READ).with_db(true)
    }

    #[must_use]
    pub const fn data() -> Self {
        Self::flat(TYPE_DATA_READ_WRITE).with_db(true)
    }

    /// `DB` must be clear when `L` is set.
    #[must_use]
    pub const fn code64() -> Self {
        Self::flat(TYPE_CODE_EXEC_READ).with_l(true)
    }
}

pub const CODE32_SELECTOR: u16 = 0x08;
pub const DATA_SELECTOR: u16 = 0x10;
pub const CODE64_SELECTOR: u16 = 0x18;

#[repr(C, align(8))]
#[derive(Debug)]
pub struct FlatGdt {
    entries: [SegmentDescriptor; 4],
}

/// The table every loader stage uses.
pub static FLAT_GDT: FlatGdt = FlatGdt::new();

impl Default for FlatGdt {
    fn default() -> Self {
        Self::new()
    }
}

impl FlatGdt {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: [
                SegmentDescriptor::new(),
                SegmentDescriptor::code32(),
                SegmentDescriptor::data(),
                SegmentDescriptor::code64(),
            ],
        }
    }

    #[must_use]
    pub const fn entries(&self) -> &[SegmentDescriptor; 4] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_descriptor_encodings() {
        let raw = FLAT_GDT.entries().map(SegmentDescriptor::into_bits);
        assert_eq!(
            raw,
            [
                0,
                0x00cf_9a00_0000_ffff,
                0x00cf_9200_0000_ffff,
                0x00af_9a00_0000_ffff,
            ]
        );
    }

    #[test]
    fn selectors_index_the_table() {
        let entries = FLAT_GDT.entries();
        assert!(entries[usize::from(CODE32_SELECTOR >> 3)].db());
        assert!(!entries[usize::from(DATA_SELECTOR >> 3)].l());
        assert!(entries[usize::from(CODE64_SELECTOR >> 3)].l());
    }
}
