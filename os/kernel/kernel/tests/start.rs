mod common;

use common::{SimulatedMachine, long_mode, protected_mode, regions, screen_rows};
use kernel::entry::{EntryError, PROOF_OF_LIFE_ATTRIBUTE, start};
use kernel_info::boot::{BootHandOff, CpuMode, HandOffError};
use kernel_info::mmap::{MemoryKind, MemoryMap, MemoryRegion};
use kernel_vga::{Attribute, Position, TextBuffer, TextCells};

#[test]
fn writes_ok_in_the_top_left_corner() {
    let regions = regions();
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
    let machine = SimulatedMachine::new(long_mode());
    let mut cells = TextCells::blank();

    {
        let mut screen = TextBuffer::new(&mut cells);
        start(&machine, &hand_off, &mut screen).unwrap();

        let o = screen.read(Position::ORIGIN);
        let k = screen.read_at(0, 1).unwrap();
        assert_eq!((o.ascii, k.ascii), (b'O', b'K'));
        assert_eq!(o.attribute, PROOF_OF_LIFE_ATTRIBUTE);
        assert_eq!(k.attribute.bits(), 0x0f);
    }

    let rows = screen_rows(&cells);
    assert_eq!(rows[0].trim_end(), "OK");
    assert!(rows[1..].iter().all(|row| row.trim().is_empty()));
    assert_eq!(&cells.as_bytes()[..4], &[b'O', 0x0f, b'K', 0x0f]);
    assert_eq!(machine.counters.idles(), 0, "start itself does not idle");
}

#[test]
fn empty_memory_map_is_rejected_before_touching_the_screen() {
    let hand_off = BootHandOff::new(MemoryMap::new(&[]), CpuMode::Long);
    let machine = SimulatedMachine::new(long_mode());
    let mut cells = TextCells::blank();
    let mut screen = TextBuffer::new(&mut cells);

    let err = start(&machine, &hand_off, &mut screen).unwrap_err();
    assert_eq!(err, EntryError::HandOff(HandOffError::EmptyMemoryMap));
    assert_eq!(screen.read(Position::ORIGIN).ascii, b' ');
}

#[test]
fn map_without_usable_ram_is_rejected() {
    let regions = [MemoryRegion::from_base_len(0, 0x10_0000, MemoryKind::Reserved)];
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
    let machine = SimulatedMachine::new(long_mode());
    let mut cells = TextCells::blank();
    let mut screen = TextBuffer::new(&mut cells);

    let err = start(&machine, &hand_off, &mut screen).unwrap_err();
    assert_eq!(err, EntryError::HandOff(HandOffError::NoUsableMemory));
}

#[test]
fn hand_off_outside_long_mode_is_rejected() {
    let regions = regions();
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Protected);
    let machine = SimulatedMachine::new(protected_mode());
    let mut cells = TextCells::blank();
    let mut screen = TextBuffer::new(&mut cells);

    let err = start(&machine, &hand_off, &mut screen).unwrap_err();
    assert_eq!(
        err,
        EntryError::HandOff(HandOffError::NotLongMode(CpuMode::Protected))
    );
}

#[test]
fn processor_must_agree_with_the_loader() {
    let regions = regions();
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
    let machine = SimulatedMachine::new(protected_mode());
    let mut cells = TextCells::blank();
    let mut screen = TextBuffer::new(&mut cells);

    let err = start(&machine, &hand_off, &mut screen).unwrap_err();
    assert_eq!(
        err,
        EntryError::ModeMismatch {
            reported: CpuMode::Long,
            observed: CpuMode::Protected,
        }
    );
    assert_eq!(screen.read(Position::ORIGIN).attribute, Attribute::DEFAULT);
    assert_eq!(screen.read(Position::ORIGIN).ascii, b' ');
}

#[test]
fn contradictory_registers_are_rejected() {
    let regions = regions();
    let hand_off = BootHandOff::new(MemoryMap::new(&regions), CpuMode::Long);
    let mut regs = long_mode();
    regs.cr4.set_pae(false);
    let machine = SimulatedMachine::new(regs);
    let mut cells = TextCells::blank();
    let mut screen = TextBuffer::new(&mut cells);

    let err = start(&machine, &hand_off, &mut screen).unwrap_err();
    assert!(matches!(err, EntryError::Mode(_)), "{err:?}");
    assert!(err.to_string().contains("inconsistent control registers"));
}
