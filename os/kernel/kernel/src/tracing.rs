//! # Kernel Tracing helpers

use kernel_info::mmap::MemoryMap;
use kernel_registers::ControlRegisters;
use log::{debug, info};

pub fn trace_memory_map(map: MemoryMap<'_>) {
    info!(
        "Memory map: {regions} regions, {usable} KiB usable",
        regions = map.len(),
        usable = map.usable_bytes() / 1024
    );
    for region in map {
        debug!("  {region}");
    }
}

pub fn trace_control_registers(regs: &ControlRegisters) {
    debug!(
        "CR0={:016x} (PE={} PG={}) CR4={:016x} (PAE={}) EFER={:016x} (LME={} LMA={} NXE={})",
        regs.cr0.into_bits(),
        u8::from(regs.cr0.pe()),
        u8::from(regs.cr0.pg()),
        regs.cr4.into_bits(),
        u8::from(regs.cr4.pae()),
        regs.efer.into_bits(),
        u8::from(regs.efer.lme()),
        u8::from(regs.efer.lma()),
        u8::from(regs.efer.nxe()),
    );
}
