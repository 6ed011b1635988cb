//! # Kernel Entry
//!
//! [`kernel_entry`] is what `_start` turns into once the loader-specific
//! hand-off has been translated. It runs at most once per boot:
//!
//! 1. validate the [`BootHandOff`] (memory map present, long mode reported),
//! 2. read the control registers and check the processor really is in the
//!    reported mode,
//! 3. log the memory map,
//! 4. write `OK` in white on black to the top left text cell,
//! 5. idle forever.
//!
//! Any failure in 1-4 is logged and ends in [`halt_forever`].

use crate::rt::{Halt, halt_forever};
use crate::tracing::{trace_control_registers, trace_memory_map};
use core::sync::atomic::{AtomicBool, Ordering};
use kernel_boot::mode::{self, ModeError};
use kernel_info::boot::{BootHandOff, CpuMode, HandOffError};
use kernel_registers::ControlRegisters;
use kernel_vga::{Attribute, Position, TextBuffer};
use log::{error, info};

/// The processor as the kernel body needs it.
pub trait Machine: Halt {
    /// Current `CR0`, `CR4` and `EFER`.
    fn control_registers(&self) -> ControlRegisters;

    /// Waits for work. There is none yet, so this halts.
    fn idle(&mut self) {
        self.halt();
    }
}

/// Written to the top left corner once the kernel is up.
pub const PROOF_OF_LIFE: &[u8] = b"OK";

/// White on black.
pub const PROOF_OF_LIFE_ATTRIBUTE: Attribute = Attribute::from_bits(0x0f);

static ENTERED: AtomicBool = AtomicBool::new(false);

/// Why the kernel refused to start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error(transparent)]
    HandOff(#[from] HandOffError),
    #[error(transparent)]
    Mode(#[from] ModeError),
    #[error("loader reported {reported}, but the processor is in {observed}")]
    ModeMismatch { reported: CpuMode, observed: CpuMode },
}

/// The kernel body. Never returns.
///
/// # Panics
/// On a second invocation. The panic goes to the trap handler, which halts.
#[allow(clippy::needless_pass_by_value)]
pub fn kernel_entry<M: Machine>(
    mut machine: M,
    hand_off: BootHandOff<'_>,
    mut screen: TextBuffer<'_>,
) -> ! {
    assert!(
        !ENTERED.swap(true, Ordering::AcqRel),
        "kernel entry point invoked twice"
    );

    if let Err(e) = start(&machine, &hand_off, &mut screen) {
        error!("Kernel start aborted: {e}");
        halt_forever(&mut machine);
    }

    info!("Kernel up, idling");
    loop {
        machine.idle();
    }
}

/// Checks the boot state and shows the proof of life.
///
/// # Errors
/// * [`EntryError::HandOff`] if the hand-off is unusable,
/// * [`EntryError::Mode`] if the control registers contradict each other,
/// * [`EntryError::ModeMismatch`] if the processor is not in the mode the
///   loader reported.
pub fn start<M: Machine + ?Sized>(
    machine: &M,
    hand_off: &BootHandOff<'_>,
    screen: &mut TextBuffer<'_>,
) -> Result<(), EntryError> {
    hand_off.validate()?;

    let regs = machine.control_registers();
    trace_control_registers(&regs);

    let observed = mode::classify(&regs)?;
    let reported = hand_off.cpu_mode();
    if observed != reported {
        return Err(EntryError::ModeMismatch { reported, observed });
    }
    info!("Kernel running in {observed}");

    trace_memory_map(hand_off.memory_map());

    screen.write_bytes(Position::ORIGIN, PROOF_OF_LIFE, PROOF_OF_LIFE_ATTRIBUTE);
    Ok(())
}
