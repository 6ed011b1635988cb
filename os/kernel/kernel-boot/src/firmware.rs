//! # Firmware Memory Map Query
//!
//! The BIOS reports physical memory through `INT 15h, EAX=E820h`. Each call
//! returns one entry and a continuation value; a continuation of zero marks the
//! last entry. The call only works in real mode, which is why the sequencer
//! performs it before the first mode switch.

use kernel_info::mmap::{MemoryKind, MemoryRegion};

/// Upper bound on E820 calls before the firmware is considered stuck.
pub const E820_CALL_LIMIT: usize = 1024;

/// One E820 descriptor as the BIOS writes it (24-byte ACPI 3.0 form).
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct E820Entry {
    pub base: u64,
    pub length: u64,
    pub kind: u32,
    /// ACPI 3.0 extended attributes. Bit 0 clear means "ignore this entry".
    /// Firmware that returns the 20-byte form leaves this at `1`.
    pub ext_attributes: u32,
}

impl E820Entry {
    const EXT_ENABLED: u32 = 1;

    #[must_use]
    pub const fn new(base: u64, length: u64, kind: u32) -> Self {
        Self {
            base,
            length,
            kind,
            ext_attributes: Self::EXT_ENABLED,
        }
    }

    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ext_attributes & Self::EXT_ENABLED == 0 || self.length == 0
    }

    #[must_use]
    pub const fn to_region(&self) -> MemoryRegion {
        MemoryRegion::from_base_len(self.base, self.length, MemoryKind::from_e820(self.kind))
    }
}

/// Result of a single E820 call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct E820Reply {
    pub entry: E820Entry,
    /// Value to pass to the next call; `0` when this was the last entry.
    pub continuation: u32,
}

/// Failures reported by the firmware query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FirmwareError {
    /// `EAX` did not come back as the `'SMAP'` signature.
    #[error("E820 is not supported by this BIOS")]
    Unsupported,
    /// The carry flag was set on a call after the first one.
    #[error("E820 call failed at continuation {continuation:#x}")]
    CallFailed { continuation: u32 },
    /// The continuation value never reached zero.
    #[error("E820 did not terminate after {limit} calls", limit = E820_CALL_LIMIT)]
    Unterminated,
}

/// Access to real-mode BIOS services.
pub trait Firmware {
    /// Performs one `INT 15h, EAX=E820h` call.
    ///
    /// # Errors
    /// See [`FirmwareError`].
    fn e820(&mut self, continuation: u32) -> Result<E820Reply, FirmwareError>;
}

impl<F: Firmware + ?Sized> Firmware for &mut F {
    fn e820(&mut self, continuation: u32) -> Result<E820Reply, FirmwareError> {
        (**self).e820(continuation)
    }
}
