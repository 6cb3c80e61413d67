//! Glyph compositor
//!
//! Renders characters and digit pairs into module rows and writes them
//! through a [`MatrixWriter`]. A missing glyph is never an error: the
//! render is skipped and the module keeps whatever it showed before.
//! Functions that can skip return `Ok(false)` in that case.

use crate::buffer::{write_rows, ModuleBuffer};
use crate::chain::{MatrixWriter, Register};
use crate::glyph::{GlyphDictionary, QUADRANT_ROWS};
use crate::layout::{ModuleIndex, Zone, ROWS};

/// Quarter of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    /// Fill order used for 4x4 text
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Quadrant::TopLeft),
            1 => Some(Quadrant::TopRight),
            2 => Some(Quadrant::BottomLeft),
            3 => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// First row covered by the quadrant
    pub const fn row_offset(self) -> usize {
        match self {
            Quadrant::TopLeft | Quadrant::TopRight => 0,
            Quadrant::BottomLeft | Quadrant::BottomRight => 4,
        }
    }

    /// Left shift that moves a low-nibble row into this quadrant's half
    pub const fn shift(self) -> u32 {
        match self {
            Quadrant::TopLeft | Quadrant::BottomLeft => 4,
            Quadrant::TopRight | Quadrant::BottomRight => 0,
        }
    }

    fn place(self, glyph: &[u8; QUADRANT_ROWS]) -> [u8; QUADRANT_ROWS] {
        glyph.map(|row| (row & 0x0F) << self.shift())
    }
}

/// Pack two 3-bit digit rows into one module row
///
/// `left` lands in bits 7-5 and `right` in bits 3-1; bits 4 and 0 stay
/// dark as separator and margin.
pub const fn pack_digit_row(left: u8, right: u8) -> u8 {
    ((left & 0b111) << 5) | ((right & 0b111) << 1)
}

/// Rows showing `tens` and `ones` side by side in one module
pub fn compose_digit_pair<G: GlyphDictionary>(
    glyphs: &G,
    tens: u8,
    ones: u8,
) -> Option<[u8; ROWS]> {
    let left = glyphs.digit(tens)?;
    let right = glyphs.digit(ones)?;
    let mut rows = [0u8; ROWS];
    for (row, (l, r)) in rows.iter_mut().zip(left.iter().zip(right.iter())) {
        *row = pack_digit_row(*l, *r);
    }
    Some(rows)
}

/// Write a full 8-row pattern to one module
pub fn write_pattern<W: MatrixWriter>(
    writer: &mut W,
    module: ModuleIndex,
    rows: &[u8; ROWS],
) -> Result<(), W::Error> {
    write_rows(writer, module, &ModuleBuffer::from_rows(*rows))
}

/// Blank one module
pub fn clear_module<W: MatrixWriter>(writer: &mut W, module: ModuleIndex) -> Result<(), W::Error> {
    write_pattern(writer, module, &[0; ROWS])
}

/// Blank the rows of one quadrant
///
/// Rows are written whole, so the other half of those rows is blanked
/// as well.
pub fn clear_quadrant<W: MatrixWriter>(
    writer: &mut W,
    module: ModuleIndex,
    quadrant: Quadrant,
) -> Result<(), W::Error> {
    let offset = quadrant.row_offset();
    for row in offset..offset + QUADRANT_ROWS {
        writer.write_one(module, Register::row(row), 0)?;
    }
    Ok(())
}

/// Draw a full-module character
pub fn render_char_8x8<W: MatrixWriter, G: GlyphDictionary>(
    writer: &mut W,
    glyphs: &G,
    module: ModuleIndex,
    c: char,
) -> Result<bool, W::Error> {
    match glyphs.glyph_8x8(c) {
        Some(rows) => write_pattern(writer, module, &rows).map(|()| true),
        None => Ok(false),
    }
}

/// Draw a quarter-module character
///
/// Each of the quadrant's four rows is written whole: pixels in the other
/// half of those rows are cleared, not merged.
pub fn render_char_4x4<W: MatrixWriter, G: GlyphDictionary>(
    writer: &mut W,
    glyphs: &G,
    module: ModuleIndex,
    c: char,
    quadrant: Quadrant,
) -> Result<bool, W::Error> {
    let Some(glyph) = glyphs.glyph_4x4(c) else {
        return Ok(false);
    };
    let offset = quadrant.row_offset();
    for (i, &bits) in quadrant.place(&glyph).iter().enumerate() {
        writer.write_one(module, Register::row(offset + i), bits)?;
    }
    Ok(true)
}

/// Draw two narrow digits side by side in one module
pub fn render_digit_pair<W: MatrixWriter, G: GlyphDictionary>(
    writer: &mut W,
    glyphs: &G,
    module: ModuleIndex,
    tens: u8,
    ones: u8,
) -> Result<bool, W::Error> {
    match compose_digit_pair(glyphs, tens, ones) {
        Some(rows) => write_pattern(writer, module, &rows).map(|()| true),
        None => Ok(false),
    }
}

/// One character per module across a zone, left to right
///
/// Stops at the end of the zone. Returns the number of characters drawn.
pub fn render_text_8x8<W: MatrixWriter, G: GlyphDictionary>(
    writer: &mut W,
    glyphs: &G,
    zone: Zone,
    text: &str,
) -> Result<usize, W::Error> {
    let mut drawn = 0;
    for (module, c) in zone.modules().zip(text.chars()) {
        if render_char_8x8(writer, glyphs, module, c)? {
            drawn += 1;
        }
    }
    Ok(drawn)
}

/// Four characters per module over `modules`, in [`Quadrant::ALL`] order
///
/// Quadrants are combined before writing so neighbours in the same rows
/// survive. Unmapped characters leave their quadrant blank. Modules past
/// the end of the text are not written. Returns the number of characters
/// drawn.
pub fn render_text_4x4<W, G, I>(
    writer: &mut W,
    glyphs: &G,
    modules: I,
    text: &str,
) -> Result<usize, W::Error>
where
    W: MatrixWriter,
    G: GlyphDictionary,
    I: IntoIterator<Item = ModuleIndex>,
{
    let mut chars = text.chars();
    let mut drawn = 0;
    for module in modules {
        let mut buffer = ModuleBuffer::new();
        let mut used = false;
        for quadrant in Quadrant::ALL {
            let Some(c) = chars.next() else {
                break;
            };
            used = true;
            if let Some(glyph) = glyphs.glyph_4x4(c) {
                let offset = quadrant.row_offset();
                for (i, bits) in quadrant.place(&glyph).into_iter().enumerate() {
                    buffer.set_row(offset + i, buffer.row(offset + i) | bits);
                }
                drawn += 1;
            }
        }
        if !used {
            break;
        }
        write_rows(writer, module, &buffer)?;
    }
    Ok(drawn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::FrameRecorder;
    use crate::glyph::BuiltinFont;
    use proptest::prelude::*;

    fn module(index: usize) -> ModuleIndex {
        ModuleIndex::new(index).unwrap()
    }

    #[test]
    fn test_pack_three_and_seven() {
        let row = pack_digit_row(3, 7);
        assert_eq!((row >> 5) & 0b111, 3);
        assert_eq!((row >> 1) & 0b111, 7);
        assert_eq!(row & 0b0001_0001, 0);
    }

    #[test]
    fn test_digit_pair_rows() {
        let rows = compose_digit_pair(&BuiltinFont, 0, 9).unwrap();
        let zero = BuiltinFont.digit(0).unwrap();
        let nine = BuiltinFont.digit(9).unwrap();
        for r in 0..ROWS {
            assert_eq!(rows[r], pack_digit_row(zero[r], nine[r]));
        }
    }

    #[test]
    fn test_unmapped_char_leaves_module_untouched() {
        let mut recorder = FrameRecorder::new();
        render_char_8x8(&mut recorder, &BuiltinFont, module(2), 'A').unwrap();
        let before = recorder.rows(module(2));
        let frames = recorder.frames.len();

        let drawn = render_char_8x8(&mut recorder, &BuiltinFont, module(2), '@').unwrap();

        assert!(!drawn);
        assert_eq!(recorder.frames.len(), frames);
        assert_eq!(recorder.rows(module(2)), before);
    }

    #[test]
    fn test_quadrant_write_overwrites_whole_rows() {
        let mut recorder = FrameRecorder::new();
        render_char_4x4(&mut recorder, &BuiltinFont, module(1), 'I', Quadrant::TopLeft).unwrap();
        render_char_4x4(&mut recorder, &BuiltinFont, module(1), 'L', Quadrant::TopRight).unwrap();

        // 'L' in the right half, the 'I' in the same rows is gone
        assert_eq!(recorder.rows(module(1)), [0x8, 0x8, 0x8, 0xE, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bottom_left_quadrant_placement() {
        let mut recorder = FrameRecorder::new();
        render_char_4x4(&mut recorder, &BuiltinFont, module(0), 'T', Quadrant::BottomLeft).unwrap();
        assert_eq!(recorder.rows(module(0)), [0, 0, 0, 0, 0xE0, 0x40, 0x40, 0x40]);
    }

    #[test]
    fn test_text_4x4_combines_quadrants() {
        let mut recorder = FrameRecorder::new();
        let drawn =
            render_text_4x4(&mut recorder, &BuiltinFont, Zone::Fixed.modules(), "SYNC").unwrap();

        assert_eq!(drawn, 4);
        let rows = recorder.rows(module(0));
        // 'S' top-left, 'Y' top-right
        assert_eq!(rows[0], 0x6A);
        // 'N' bottom-left, 'C' bottom-right
        assert_eq!(rows[4], 0xCE);
        // Only the first module was needed
        assert_eq!(recorder.frames.len(), ROWS);
    }

    #[test]
    fn test_text_4x4_spills_into_next_listed_module() {
        let mut recorder = FrameRecorder::new();
        let targets = [module(2), module(3)];
        let drawn = render_text_4x4(&mut recorder, &BuiltinFont, targets, "SYNCED").unwrap();

        assert_eq!(drawn, 6);
        // 'E' top-left, 'D' top-right of the second module
        assert_eq!(recorder.rows(module(3))[0] & 0xF0, 0xE0);
        assert_ne!(recorder.rows(module(3))[0] & 0x0F, 0);
        assert_eq!(recorder.rows(module(3))[4], 0);
        for m in [0, 1] {
            assert_eq!(recorder.rows(module(m)), [0; ROWS]);
        }
    }

    #[test]
    fn test_text_8x8_stops_at_zone_end() {
        let mut recorder = FrameRecorder::new();
        let drawn = render_text_8x8(&mut recorder, &BuiltinFont, Zone::Fixed, "HELLO").unwrap();
        assert_eq!(drawn, Zone::Fixed.len());
        for m in Zone::Scroll.modules() {
            assert_eq!(recorder.rows(m), [0; ROWS]);
        }
    }

    #[test]
    fn test_clear_quadrant_blanks_its_rows() {
        let mut recorder = FrameRecorder::new();
        write_pattern(&mut recorder, module(3), &[0xFF; ROWS]).unwrap();
        clear_quadrant(&mut recorder, module(3), Quadrant::BottomRight).unwrap();
        assert_eq!(
            recorder.rows(module(3)),
            [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]
        );
    }

    proptest! {
        #[test]
        fn prop_packing_reads_back(left in 0u8..8, right in 0u8..8) {
            let row = pack_digit_row(left, right);
            prop_assert_eq!(row >> 5, left);
            prop_assert_eq!((row >> 1) & 0b111, right);
            prop_assert_eq!(row & 0b0001_0001, 0);
        }
    }
}
