#![allow(dead_code)]

use kernel::entry::Machine;
use kernel::rt::Halt;
use kernel_boot::gdt::FlatGdt;
use kernel_boot::mode::classify;
use kernel_boot::{E820Entry, E820Reply, Firmware, FirmwareError, ModeControl, PageTableRoot};
use kernel_info::mmap::{MemoryKind, MemoryRegion};
use kernel_registers::{ControlRegisters, Cr0, Cr4, Efer};
use kernel_vga::{BUFFER_HEIGHT, BUFFER_WIDTH, TextCells};
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Panic payload: the machine reached its idle loop.
pub struct Idled;

/// Panic payload: the machine was halted for good.
pub struct Halted;

#[derive(Clone, Default)]
pub struct Counters {
    pub halts: Arc<AtomicUsize>,
    pub idles: Arc<AtomicUsize>,
}

impl Counters {
    pub fn halts(&self) -> usize {
        self.halts.load(Ordering::SeqCst)
    }

    pub fn idles(&self) -> usize {
        self.idles.load(Ordering::SeqCst)
    }
}

/// A machine with fixed control registers that unwinds out of the first
/// halt or idle, so divergent code can be observed.
pub struct SimulatedMachine {
    pub regs: ControlRegisters,
    pub counters: Counters,
}

impl SimulatedMachine {
    pub fn new(regs: ControlRegisters) -> Self {
        Self {
            regs,
            counters: Counters::default(),
        }
    }
}

impl Halt for SimulatedMachine {
    fn halt(&mut self) {
        self.counters.halts.fetch_add(1, Ordering::SeqCst);
        panic::panic_any(Halted);
    }
}

impl Machine for SimulatedMachine {
    fn control_registers(&self) -> ControlRegisters {
        self.regs
    }

    fn idle(&mut self) {
        self.counters.idles.fetch_add(1, Ordering::SeqCst);
        panic::panic_any(Idled);
    }
}

pub fn long_mode() -> ControlRegisters {
    ControlRegisters {
        cr0: Cr0::new().with_pe(true).with_et(true).with_pg(true),
        cr4: Cr4::new().with_pae(true),
        efer: Efer::new().with_lme(true).with_lma(true),
    }
}

pub fn protected_mode() -> ControlRegisters {
    ControlRegisters {
        cr0: Cr0::new().with_pe(true).with_et(true),
        ..ControlRegisters::reset()
    }
}

/// 128 MiB machine, already sorted.
pub fn regions() -> [MemoryRegion; 4] {
    [
        MemoryRegion::from_base_len(0, 0x9_fc00, MemoryKind::Usable),
        MemoryRegion::from_base_len(0x9_fc00, 0x400, MemoryKind::Reserved),
        MemoryRegion::from_base_len(0xf_0000, 0x1_0000, MemoryKind::Reserved),
        MemoryRegion::from_base_len(0x10_0000, 0x7ee_0000, MemoryKind::Usable),
    ]
}

/// The text grid as one string per row.
pub fn screen_rows(cells: &TextCells) -> Vec<String> {
    cells
        .as_bytes()
        .chunks(BUFFER_WIDTH * 2)
        .take(BUFFER_HEIGHT)
        .map(|row| row.iter().step_by(2).map(|&b| char::from(b)).collect())
        .collect()
}

/// BIOS double answering E820 queries from a list.
pub struct Bios {
    pub entries: Vec<E820Entry>,
}

impl Firmware for Bios {
    fn e820(&mut self, continuation: u32) -> Result<E820Reply, FirmwareError> {
        let index = continuation as usize;
        let entry = *self.entries.get(index).ok_or(FirmwareError::Unsupported)?;
        let next = if index + 1 == self.entries.len() {
            0
        } else {
            u32::try_from(index + 1).unwrap()
        };
        Ok(E820Reply {
            entry,
            continuation: next,
        })
    }
}

pub fn bios() -> Bios {
    Bios {
        entries: vec![
            E820Entry::new(0x10_0000, 0x7ee_0000, 1),
            E820Entry::new(0, 0x9_fc00, 1),
            E820Entry::new(0x9_fc00, 0x400, 2),
            E820Entry::new(0xf_0000, 0x1_0000, 2),
        ],
    }
}

/// Processor double for the loader: derives `EFER.LMA` like hardware does.
pub struct LoaderCpu {
    pub regs: ControlRegisters,
}

impl LoaderCpu {
    pub fn new() -> Self {
        Self {
            regs: ControlRegisters::reset(),
        }
    }
}

impl ModeControl for LoaderCpu {
    fn control_registers(&self) -> ControlRegisters {
        self.regs
    }

    unsafe fn load_gdt(&mut self, _gdt: &'static FlatGdt) {}

    unsafe fn write_control_registers(&mut self, mut regs: ControlRegisters) {
        let lma = regs.cr0.pe() && regs.cr0.pg() && regs.cr4.pae() && regs.efer.lme();
        regs.efer.set_lma(lma);
        classify(&regs).expect("consistent registers");
        self.regs = regs;
    }

    unsafe fn load_page_table_root(&mut self, _root: PageTableRoot) {}
}
