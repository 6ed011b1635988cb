//! # Trap Policy
//!
//! The kernel has no unwinder and nothing to return to. Every unrecoverable
//! condition (a `panic!`, a failed boot check, a second entry) is routed into
//! [`trap`], which reports what it can without allocating and parks the
//! processor for good.

use core::fmt::{self, Write};
use core::panic::{Location, PanicInfo};
use core::sync::atomic::{AtomicBool, Ordering};
use kernel_vga::{Attribute, BUFFER_HEIGHT, BUFFER_WIDTH, Color, TextBuffer};

/// Something that can stop the processor until the next event.
pub trait Halt {
    /// Stops until the next interrupt arrives. May return.
    fn halt(&mut self);
}

/// The processor this code runs on: `cli; hlt`.
#[derive(Debug, Default, Copy, Clone)]
pub struct Cpu;

impl Halt for Cpu {
    #[inline]
    fn halt(&mut self) {
        #[cfg(target_arch = "x86_64")]
        unsafe {
            core::arch::asm!("cli", "hlt", options(nomem, nostack));
        }

        #[cfg(not(target_arch = "x86_64"))]
        core::hint::spin_loop();
    }
}

/// Parks the processor for good.
///
/// `hlt` still resumes on NMI and SMI, hence the loop.
pub fn halt_forever<H: Halt + ?Sized>(cpu: &mut H) -> ! {
    loop {
        cpu.halt();
    }
}

/// Set on the first entry into [`trap_on`].
static TRAPPED: AtomicBool = AtomicBool::new(false);

/// White on red.
pub const TRAP_ATTRIBUTE: Attribute = Attribute::new(Color::White, Color::Red);

/// The terminal failure path. The binary's `#[panic_handler]` delegates here.
///
/// With the `panic-screen` feature the location also goes to the last text
/// row of the hardware buffer.
pub fn trap(info: &PanicInfo) -> ! {
    #[cfg(feature = "panic-screen")]
    // SAFETY: nothing else runs once the trap has been entered, so the
    // regular writer is never used again.
    let screen = Some(unsafe { TextBuffer::steal() });
    #[cfg(not(feature = "panic-screen"))]
    let screen = None;

    trap_on(info, info.location(), screen, &mut Cpu)
}

/// Reports a failure once, then halts `cpu` for good.
///
/// The report is a log record (visible on debugcon once the QEMU logger is
/// installed) and, given a `screen`, the trap banner. A fault while
/// reporting re-enters here; the second entry skips the report and halts
/// directly.
pub fn trap_on<H: Halt + ?Sized>(
    report: &dyn fmt::Display,
    location: Option<&Location<'_>>,
    screen: Option<TextBuffer<'_>>,
    cpu: &mut H,
) -> ! {
    if TRAPPED.swap(true, Ordering::AcqRel) {
        halt_forever(cpu);
    }

    log::error!("kernel trap: {report}");
    if let Some(mut screen) = screen {
        write_trap_banner(&mut screen, location);
    }
    halt_forever(cpu)
}

/// Fills the last row with `PANIC at file:line:column`.
pub fn write_trap_banner(screen: &mut TextBuffer<'_>, location: Option<&Location<'_>>) {
    let Ok(mut row) = screen.row_writer(BUFFER_HEIGHT - 1, TRAP_ATTRIBUTE) else {
        return;
    };

    // RowWriter never fails; it truncates.
    let _ = match location {
        Some(at) => write!(row, "PANIC at {}:{}:{}", at.file(), at.line(), at.column()),
        None => row.write_str("PANIC"),
    };
    while row.column() < BUFFER_WIDTH {
        let _ = row.write_char(' ');
    }
}
