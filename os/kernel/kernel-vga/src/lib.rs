//! # VGA Text-Mode Output
//!
//! The BIOS leaves the display in 80x25 text mode. Every character cell is two
//! bytes in a memory-mapped buffer at physical `0xB8000`, laid out row-major:
//!
//! ```text
//! offset = 2 * (row * 80 + column)
//!
//!  byte 0        byte 1
//! ┌────────────┬───────────────────────────────┐
//! │ code point │ bg (bits 4-7) │ fg (bits 0-3) │
//! └────────────┴───────────────────────────────┘
//! ```
//!
//! There is no cursor, no scrolling and no back buffer: every write lands in
//! video memory immediately. Positions are checked against the grid before
//! any memory is touched, so a write can never reach past the buffer.
//!
//! The buffer is a single-writer resource. [`TextBuffer::take`] hands it out
//! once; anything that needs it afterwards has to be given the owner.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod buffer;
mod color;
mod writer;

pub use buffer::{BUFFER_HEIGHT, BUFFER_WIDTH, Position, ScreenChar, TextBuffer, TextCells, TextError};
pub use color::{Attribute, Color};
pub use writer::RowWriter;
