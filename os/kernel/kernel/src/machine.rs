//! # The Live Processor

use crate::rt::{Cpu, Halt};

/// The processor the kernel is running on.
#[derive(Debug, Default, Copy, Clone)]
pub struct BareMetal;

impl Halt for BareMetal {
    #[inline]
    fn halt(&mut self) {
        Cpu.halt();
    }
}

#[cfg(target_arch = "x86_64")]
impl crate::entry::Machine for BareMetal {
    fn control_registers(&self) -> kernel_registers::ControlRegisters {
        use kernel_registers::{ControlRegisters, LoadRegisterUnsafe};

        // SAFETY: the kernel runs in ring 0 and the reads have no side effects.
        unsafe { ControlRegisters::load_unsafe() }
    }
}
