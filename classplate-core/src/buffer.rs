//! Pixel buffers
//!
//! A [`ModuleBuffer`] mirrors the eight row registers of one chip: bit 7
//! of a row is the leftmost column. A [`ScrollBuffer`] is the scroll zone
//! seen as one 32-column strip.
//!
//! Columns are passed around as a single byte where bit `r` is the pixel
//! in row `r` (row 0 at the top), which is also how the scroll font is
//! stored.

use crate::chain::{MatrixWriter, Register};
use crate::layout::{ModuleIndex, Zone, ROWS, SCROLL_MODULES};

/// Row registers of one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleBuffer {
    rows: [u8; ROWS],
}

impl ModuleBuffer {
    pub const fn new() -> Self {
        Self { rows: [0; ROWS] }
    }

    pub const fn from_rows(rows: [u8; ROWS]) -> Self {
        Self { rows }
    }

    pub fn row(&self, row: usize) -> u8 {
        self.rows[row]
    }

    pub fn set_row(&mut self, row: usize, bits: u8) {
        self.rows[row] = bits;
    }

    pub fn rows(&self) -> &[u8; ROWS] {
        &self.rows
    }

    pub fn clear(&mut self) {
        self.rows = [0; ROWS];
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&row| row == 0)
    }

    /// Shift one row a column to the left
    ///
    /// `carry_in` enters at the rightmost column; the leftmost column that
    /// falls off is returned.
    pub fn shift_row_left(&mut self, row: usize, carry_in: bool) -> bool {
        let bits = self.rows[row];
        self.rows[row] = (bits << 1) | carry_in as u8;
        bits & 0x80 != 0
    }

    /// Column `col` (0 = leftmost) as a column byte
    pub fn column(&self, col: usize) -> u8 {
        let mask = 0x80 >> col;
        self.rows
            .iter()
            .enumerate()
            .fold(0, |acc, (r, &bits)| if bits & mask != 0 { acc | 1 << r } else { acc })
    }
}

/// Scroll zone strip, module 0 of the buffer being the leftmost
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollBuffer {
    modules: [ModuleBuffer; SCROLL_MODULES],
}

impl ScrollBuffer {
    /// Width of the strip in columns
    pub const WIDTH: usize = SCROLL_MODULES * 8;

    pub const fn new() -> Self {
        Self {
            modules: [ModuleBuffer::new(); SCROLL_MODULES],
        }
    }

    /// Buffer of the `n`th scroll module (0 = leftmost)
    pub fn module(&self, n: usize) -> &ModuleBuffer {
        &self.modules[n]
    }

    pub fn clear(&mut self) {
        self.modules.iter_mut().for_each(ModuleBuffer::clear);
    }

    pub fn is_blank(&self) -> bool {
        self.modules.iter().all(ModuleBuffer::is_blank)
    }

    /// Column `x` of the strip (0 = leftmost)
    pub fn column(&self, x: usize) -> u8 {
        self.modules[x / 8].column(x % 8)
    }

    /// Shift the whole strip one column left and append `column` on the right
    ///
    /// The leftmost column of each module carries into the rightmost
    /// column of its left neighbour. Only the last module receives new
    /// content. Returns the column pushed out of the strip.
    pub fn push_column(&mut self, column: u8) -> u8 {
        let mut ejected = 0;
        for row in 0..ROWS {
            let mut carry = column & (1 << row) != 0;
            for module in self.modules.iter_mut().rev() {
                carry = module.shift_row_left(row, carry);
            }
            if carry {
                ejected |= 1 << row;
            }
        }
        ejected
    }

    /// Send every row of every scroll module to the chain
    pub fn transmit<W: MatrixWriter>(&self, writer: &mut W) -> Result<(), W::Error> {
        for (module, buffer) in Zone::Scroll.modules().zip(self.modules.iter()) {
            write_rows(writer, module, buffer)?;
        }
        Ok(())
    }
}

/// Write all rows of a buffer to one module
pub fn write_rows<W: MatrixWriter>(
    writer: &mut W,
    module: ModuleIndex,
    buffer: &ModuleBuffer,
) -> Result<(), W::Error> {
    for (row, &bits) in buffer.rows().iter().enumerate() {
        writer.write_one(module, Register::row(row), bits)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::FrameRecorder;
    use proptest::prelude::*;

    fn strip_from(rows: &[[u8; ROWS]; SCROLL_MODULES]) -> ScrollBuffer {
        let mut strip = ScrollBuffer::new();
        for (module, rows) in strip.modules.iter_mut().zip(rows) {
            *module = ModuleBuffer::from_rows(*rows);
        }
        strip
    }

    #[test]
    fn test_column_readback() {
        let buffer = ModuleBuffer::from_rows([0x80, 0, 0x80, 0, 0, 0, 0, 0x01]);
        assert_eq!(buffer.column(0), 0b0000_0101);
        assert_eq!(buffer.column(7), 0b1000_0000);
    }

    #[test]
    fn test_push_crosses_module_boundary() {
        let mut strip = ScrollBuffer::new();
        strip.push_column(0x01);
        assert_eq!(strip.column(ScrollBuffer::WIDTH - 1), 0x01);

        // Eight more pushes move it into the previous module
        for _ in 0..8 {
            strip.push_column(0);
        }
        assert_eq!(strip.column(ScrollBuffer::WIDTH - 9), 0x01);
        assert_eq!(strip.module(SCROLL_MODULES - 2).row(0), 0x01);
        assert!(strip.module(SCROLL_MODULES - 1).is_blank());
    }

    #[test]
    fn test_column_leaves_after_full_width() {
        let mut strip = ScrollBuffer::new();
        strip.push_column(0xFF);
        for _ in 0..ScrollBuffer::WIDTH - 1 {
            assert_eq!(strip.push_column(0), 0);
        }
        assert_eq!(strip.push_column(0), 0xFF);
        assert!(strip.is_blank());
    }

    #[test]
    fn test_transmit_writes_scroll_zone_rows() {
        let mut strip = ScrollBuffer::new();
        strip.push_column(0x81);
        let mut recorder = FrameRecorder::new();

        strip.transmit(&mut recorder).unwrap();

        assert_eq!(recorder.frames.len(), SCROLL_MODULES * ROWS);
        let last = Zone::Scroll.modules().last().unwrap();
        assert_eq!(recorder.rows(last), [0x01, 0, 0, 0, 0, 0, 0, 0x01]);
        for module in Zone::Fixed.modules() {
            assert_eq!(recorder.rows(module), [0; ROWS]);
        }
    }

    proptest! {
        #[test]
        fn prop_push_preserves_adjacency(
            rows in any::<[[u8; ROWS]; SCROLL_MODULES]>(),
            column in any::<u8>(),
        ) {
            let before = strip_from(&rows);
            let mut after = before.clone();
            let ejected = after.push_column(column);

            // Leading edge leaves the strip
            prop_assert_eq!(ejected, before.column(0));
            // Every other column moves one step left, across module edges too
            for x in 1..ScrollBuffer::WIDTH {
                prop_assert_eq!(after.column(x - 1), before.column(x));
            }
            // New column lands on the right of the last module
            prop_assert_eq!(after.column(ScrollBuffer::WIDTH - 1), column);
        }
    }
}
