use crate::color::Attribute;
use crate::writer::RowWriter;
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, Ordering};
use kernel_info::memory::{VGA_TEXT_BASE, VGA_TEXT_SIZE};

pub const BUFFER_WIDTH: usize = 80;
pub const BUFFER_HEIGHT: usize = 25;

const CELL_COUNT: usize = BUFFER_WIDTH * BUFFER_HEIGHT;
const BUFFER_BYTES: usize = CELL_COUNT * size_of::<ScreenChar>();

/// One character cell: code point, then attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    pub ascii: u8,
    pub attribute: Attribute,
}

impl ScreenChar {
    pub const BLANK: Self = Self::new(b' ', Attribute::DEFAULT);

    #[must_use]
    pub const fn new(ascii: u8, attribute: Attribute) -> Self {
        Self { ascii, attribute }
    }
}

/// The full 80x25 grid, with exactly the layout of video memory.
#[repr(transparent)]
pub struct TextCells([[ScreenChar; BUFFER_WIDTH]; BUFFER_HEIGHT]);

const _: () = {
    assert!(size_of::<ScreenChar>() == 2);
    assert!(size_of::<TextCells>() as u64 == VGA_TEXT_SIZE);
};

impl TextCells {
    /// A grid of spaces, white on black.
    #[must_use]
    pub const fn blank() -> Self {
        Self([[ScreenChar::BLANK; BUFFER_WIDTH]; BUFFER_HEIGHT])
    }

    /// The grid as the raw bytes the display controller reads.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; BUFFER_BYTES] {
        // SAFETY: `ScreenChar` is two `u8`-sized fields with no padding.
        unsafe { &*core::ptr::from_ref(self).cast::<[u8; BUFFER_BYTES]>() }
    }
}

impl Default for TextCells {
    fn default() -> Self {
        Self::blank()
    }
}

/// Requests that fall outside the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("cell ({row}, {col}) is outside the 25x80 text grid")]
    OutOfBounds { row: usize, col: usize },
}

/// A cell position known to be inside the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// # Errors
    /// [`TextError::OutOfBounds`] unless `row < 25` and `col < 80`.
    pub const fn new(row: usize, col: usize) -> Result<Self, TextError> {
        if row < BUFFER_HEIGHT && col < BUFFER_WIDTH {
            Ok(Self { row, col })
        } else {
            Err(TextError::OutOfBounds { row, col })
        }
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Byte offset of the cell from the start of the buffer.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.index() * size_of::<ScreenChar>()
    }

    const fn index(self) -> usize {
        self.row * BUFFER_WIDTH + self.col
    }

    const fn from_index(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self {
                row: index / BUFFER_WIDTH,
                col: index % BUFFER_WIDTH,
            })
        } else {
            None
        }
    }
}

static VGA_TAKEN: AtomicBool = AtomicBool::new(false);

/// Exclusive writer over a text grid.
pub struct TextBuffer<'a> {
    cells: NonNull<TextCells>,
    _owner: PhantomData<&'a mut TextCells>,
}

impl TextBuffer<'static> {
    /// Hands out the hardware buffer at `0xB8000`. Only the first call
    /// succeeds.
    #[must_use]
    pub fn take() -> Option<Self> {
        if VGA_TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }
        // SAFETY: the flag guarantees this is the only handle created here.
        Some(unsafe { Self::steal() })
    }

    /// Creates a handle to the hardware buffer regardless of earlier
    /// [`take`](Self::take) calls.
    ///
    /// # Safety
    /// No other handle may be used while this one is alive. The trap handler
    /// qualifies because nothing else runs once it has been entered.
    #[must_use]
    pub unsafe fn steal() -> Self {
        // SAFETY: the VGA text buffer is identity mapped and never null.
        let cells = unsafe { NonNull::new_unchecked(VGA_TEXT_BASE as usize as *mut TextCells) };
        Self {
            cells,
            _owner: PhantomData,
        }
    }
}

impl<'a> TextBuffer<'a> {
    /// Writes go to `cells` instead of video memory.
    pub fn new(cells: &'a mut TextCells) -> Self {
        Self {
            cells: NonNull::from(cells),
            _owner: PhantomData,
        }
    }

    fn cell(&self, pos: Position) -> *mut ScreenChar {
        // SAFETY: `Position` is always inside the grid, so the offset stays
        // inside the `TextCells` allocation.
        unsafe { self.cells.as_ptr().cast::<ScreenChar>().add(pos.index()) }
    }

    /// Stores one cell. Visible immediately.
    pub fn write(&mut self, pos: Position, ascii: u8, attribute: Attribute) {
        // SAFETY: in bounds (see `cell`) and we hold the only handle.
        unsafe { self.cell(pos).write_volatile(ScreenChar::new(ascii, attribute)) }
    }

    /// Stores one cell at a raw row/column.
    ///
    /// # Errors
    /// [`TextError::OutOfBounds`]; nothing is written in that case.
    pub fn write_at(
        &mut self,
        row: usize,
        col: usize,
        ascii: u8,
        attribute: Attribute,
    ) -> Result<(), TextError> {
        let pos = Position::new(row, col)?;
        self.write(pos, ascii, attribute);
        Ok(())
    }

    #[must_use]
    pub fn read(&self, pos: Position) -> ScreenChar {
        // SAFETY: in bounds (see `cell`).
        unsafe { self.cell(pos).read_volatile() }
    }

    /// # Errors
    /// [`TextError::OutOfBounds`].
    pub fn read_at(&self, row: usize, col: usize) -> Result<ScreenChar, TextError> {
        Ok(self.read(Position::new(row, col)?))
    }

    /// Writes `bytes` into consecutive cells starting at `pos`, continuing on
    /// the next row at the end of a line. Stops at the last cell of the grid
    /// and returns how many bytes were written.
    pub fn write_bytes(&mut self, pos: Position, bytes: &[u8], attribute: Attribute) -> usize {
        let mut written = 0;
        for (index, &byte) in (pos.index()..).zip(bytes) {
            let Some(cell) = Position::from_index(index) else {
                break;
            };
            self.write(cell, byte, attribute);
            written += 1;
        }
        written
    }

    /// Fills the grid with spaces in `attribute`.
    pub fn clear(&mut self, attribute: Attribute) {
        for index in 0..CELL_COUNT {
            if let Some(pos) = Position::from_index(index) {
                self.write(pos, b' ', attribute);
            }
        }
    }

    /// A formatter bounded to `row`.
    ///
    /// # Errors
    /// [`TextError::OutOfBounds`] if `row` is not on screen.
    pub fn row_writer(
        &mut self,
        row: usize,
        attribute: Attribute,
    ) -> Result<RowWriter<'_, 'a>, TextError> {
        let start = Position::new(row, 0)?;
        Ok(RowWriter::new(self, start, attribute))
    }
}
