use crate::buffer::{BUFFER_WIDTH, Position, TextBuffer};
use crate::color::Attribute;
use core::fmt;

/// Shown in place of bytes the code page cannot display as text.
const REPLACEMENT: u8 = 0xfe;

/// `fmt::Write` sink confined to one row. Text past the last column is
/// dropped; a newline ends the row.
pub struct RowWriter<'b, 'a> {
    buffer: &'b mut TextBuffer<'a>,
    row: usize,
    col: usize,
    attribute: Attribute,
}

impl<'b, 'a> RowWriter<'b, 'a> {
    pub(crate) fn new(buffer: &'b mut TextBuffer<'a>, start: Position, attribute: Attribute) -> Self {
        Self {
            buffer,
            row: start.row(),
            col: start.col(),
            attribute,
        }
    }

    /// Cells written so far on this row.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.col
    }

    fn put(&mut self, byte: u8) {
        if byte == b'\n' {
            self.col = BUFFER_WIDTH;
            return;
        }
        let Ok(pos) = Position::new(self.row, self.col) else {
            return;
        };
        let byte = match byte {
            0x20..=0x7e => byte,
            _ => REPLACEMENT,
        };
        self.buffer.write(pos, byte, self.attribute);
        self.col += 1;
    }
}

impl fmt::Write for RowWriter<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.put(byte);
        }
        Ok(())
    }
}
