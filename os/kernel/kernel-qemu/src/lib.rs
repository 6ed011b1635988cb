//! # QEMU Debug Support
//!
//! QEMU's **debugcon** device (port `0x402`) forwards every byte written to it
//! to the host, see `-debugcon stdio`. It backs [`qemu_trace!`] and the
//! [`QemuLogger`].
//!
//! ```text
//! log::info!(..) ──▶ QemuLogger ──┐
//!                                 ├──▶ DebugPort(0x402) ──▶ host terminal
//! qemu_trace!(..) ────────────────┘
//! ```
//!
//! The channel is a plain `out` instruction: no allocation, no locking, and
//! usable from the first instruction of the kernel. On real hardware the port
//! is normally unclaimed and the writes vanish.
//!
//! Without the `enabled` feature [`qemu_trace!`] compiles to nothing.
//!
//! ```bash
//! qemu-system-x86_64 -drive format=raw,file=bootimage-kernel.bin -debugcon stdio
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;
mod port;

pub use logger::{QemuLogger, format_record};
pub use port::{DebugPort, QEMU_DEBUG_PORT};

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod qemu_fmt {
    use crate::port::DebugPort;
    use core::fmt::{self, Write};

    #[doc(hidden)]
    #[inline]
    pub fn qemu_write(args: fmt::Arguments) {
        // Best-effort debug output.
        let mut port = DebugPort::QEMU;
        let _ = port.write_fmt(args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt;

    #[doc(hidden)]
    #[allow(clippy::inline_always)]
    #[inline(always)]
    pub fn qemu_write(_: fmt::Arguments) {
        // no-op when feature disabled
    }
}

/// `print!`-style output on the QEMU debug console.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        // No allocation: `format_args!` builds a lightweight `Arguments`.
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
