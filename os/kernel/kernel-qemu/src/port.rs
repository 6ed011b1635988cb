use core::fmt;

/// The port number for QEMU's debug console.
pub const QEMU_DEBUG_PORT: u16 = 0x402;

/// Byte sink on an I/O port.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DebugPort {
    port: u16,
}

impl DebugPort {
    pub const QEMU: Self = Self::new(QEMU_DEBUG_PORT);

    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    #[inline]
    pub fn put(self, byte: u8) {
        // SAFETY: a byte written to an unclaimed port is discarded.
        unsafe { outb(self.port, byte) }
    }
}

impl fmt::Write for DebugPort {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            self.put(b);
        }
        Ok(())
    }
}

#[cfg(target_arch = "x86_64")]
#[allow(clippy::inline_always)]
#[inline(always)]
pub(crate) unsafe fn outb(port: u16, val: u8) {
    unsafe {
        core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") val,
            options(nomem, nostack, preserves_flags)
        );
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub(crate) const unsafe fn outb(_port: u16, _val: u8) {}

