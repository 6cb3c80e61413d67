//! Glyph dictionary
//!
//! Read-only bitmap lookup used by the compositor and the scroll engine.
//! Every lookup returns `None` for a character the table does not cover,
//! so callers can tell "no glyph" apart from a blank glyph.
//!
//! Formats:
//! - 8x8: eight rows, bit 7 = leftmost column
//! - 4x4: four rows in the low nibble, bit 3 = leftmost column
//! - scroll: five column bytes, bit 0 = top row
//! - digit: seven rows of a 3-pixel-wide digit in the low 3 bits, the
//!   eighth row blank

/// Columns per scroll-font character
pub const GLYPH_COLUMNS: usize = 5;

/// Rows of a quadrant glyph
pub const QUADRANT_ROWS: usize = 4;

/// Substitute for characters the scroll font does not cover (hollow box)
pub const UNKNOWN_GLYPH: [u8; GLYPH_COLUMNS] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

/// Character bitmap lookup
pub trait GlyphDictionary {
    /// Full-module glyph
    fn glyph_8x8(&self, c: char) -> Option<[u8; 8]>;

    /// Quarter-module glyph
    fn glyph_4x4(&self, c: char) -> Option<[u8; QUADRANT_ROWS]>;

    /// Scroll-font columns
    fn scroll_glyph(&self, c: char) -> Option<[u8; GLYPH_COLUMNS]>;

    /// Narrow decimal digit for two-up packing
    fn digit(&self, value: u8) -> Option<[u8; 8]>;

    /// Temperature unit marker
    fn unit_glyph(&self) -> [u8; 8];
}

impl<G: GlyphDictionary + ?Sized> GlyphDictionary for &G {
    fn glyph_8x8(&self, c: char) -> Option<[u8; 8]> {
        G::glyph_8x8(self, c)
    }

    fn glyph_4x4(&self, c: char) -> Option<[u8; QUADRANT_ROWS]> {
        G::glyph_4x4(self, c)
    }

    fn scroll_glyph(&self, c: char) -> Option<[u8; GLYPH_COLUMNS]> {
        G::scroll_glyph(self, c)
    }

    fn digit(&self, value: u8) -> Option<[u8; 8]> {
        G::digit(self, value)
    }

    fn unit_glyph(&self) -> [u8; 8] {
        G::unit_glyph(self)
    }
}

/// Scroll columns for a message character
///
/// Lowercase letters are folded to uppercase; anything else the
/// dictionary lacks becomes [`UNKNOWN_GLYPH`].
pub fn scroll_columns<G: GlyphDictionary>(glyphs: &G, c: char) -> [u8; GLYPH_COLUMNS] {
    glyphs
        .scroll_glyph(c)
        .or_else(|| glyphs.scroll_glyph(c.to_ascii_uppercase()))
        .unwrap_or(UNKNOWN_GLYPH)
}

/// Fonts compiled into the firmware
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

impl GlyphDictionary for BuiltinFont {
    fn glyph_8x8(&self, c: char) -> Option<[u8; 8]> {
        column_index(c).map(|i| FONT_8X8[i])
    }

    fn glyph_4x4(&self, c: char) -> Option<[u8; QUADRANT_ROWS]> {
        let index = match c {
            ' ' => 0,
            '0'..='9' => 1 + (c as usize - '0' as usize),
            'A'..='Z' => 11 + (c as usize - 'A' as usize),
            _ => return None,
        };
        Some(FONT_4X4[index])
    }

    fn scroll_glyph(&self, c: char) -> Option<[u8; GLYPH_COLUMNS]> {
        match c {
            ' ' | '!' | '.' | 'A'..='Z' => column_index(c).map(|i| COLUMN_FONT[i]),
            _ => None,
        }
    }

    fn digit(&self, value: u8) -> Option<[u8; 8]> {
        let rows = DIGITS_3X7.get(value as usize)?;
        let mut glyph = [0u8; 8];
        glyph[..7].copy_from_slice(rows);
        Some(glyph)
    }

    fn unit_glyph(&self) -> [u8; 8] {
        DEGREES_C
    }
}

fn column_index(c: char) -> Option<usize> {
    match c {
        ' ' => Some(0),
        '!' => Some(1),
        '.' => Some(2),
        '-' => Some(3),
        ':' => Some(4),
        '0'..='9' => Some(5 + (c as usize - '0' as usize)),
        'A'..='Z' => Some(15 + (c as usize - 'A' as usize)),
        _ => None,
    }
}

const COLUMN_GLYPHS: usize = 41;

/// 5x7 column font, bit 0 = top row
#[rustfmt::skip]
const COLUMN_FONT: [[u8; GLYPH_COLUMNS]; COLUMN_GLYPHS] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x7C, 0x12, 0x11, 0x12, 0x7C], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
];

/// Turn a column glyph into module rows with a one-column left margin
const fn widen(columns: &[u8; GLYPH_COLUMNS]) -> [u8; 8] {
    let mut rows = [0u8; 8];
    let mut col = 0;
    while col < GLYPH_COLUMNS {
        let mut row = 0;
        while row < 8 {
            if columns[col] & (1 << row) != 0 {
                rows[row] |= 0x40 >> col;
            }
            row += 1;
        }
        col += 1;
    }
    rows
}

const fn build_8x8() -> [[u8; 8]; COLUMN_GLYPHS] {
    let mut font = [[0u8; 8]; COLUMN_GLYPHS];
    let mut i = 0;
    while i < COLUMN_GLYPHS {
        font[i] = widen(&COLUMN_FONT[i]);
        i += 1;
    }
    font
}

static FONT_8X8: [[u8; 8]; COLUMN_GLYPHS] = build_8x8();

/// Quadrant font: ' ', '0'-'9', 'A'-'Z'
#[rustfmt::skip]
const FONT_4X4: [[u8; QUADRANT_ROWS]; 37] = [
    [0x0, 0x0, 0x0, 0x0], // ' '
    [0x4, 0xA, 0xA, 0x4], // '0'
    [0x4, 0xC, 0x4, 0xE], // '1'
    [0xC, 0x2, 0x4, 0xE], // '2'
    [0xE, 0x6, 0x2, 0xE], // '3'
    [0xA, 0xA, 0xE, 0x2], // '4'
    [0xE, 0xC, 0x2, 0xC], // '5'
    [0x8, 0xE, 0xA, 0xE], // '6'
    [0xE, 0x2, 0x4, 0x4], // '7'
    [0xE, 0xE, 0xA, 0xE], // '8'
    [0xE, 0xA, 0xE, 0x2], // '9'
    [0x4, 0xA, 0xE, 0xA], // 'A'
    [0xC, 0xE, 0xA, 0xE], // 'B'
    [0xE, 0x8, 0x8, 0xE], // 'C'
    [0xC, 0xA, 0xA, 0xC], // 'D'
    [0xE, 0xC, 0x8, 0xE], // 'E'
    [0xE, 0x8, 0xC, 0x8], // 'F'
    [0xE, 0x8, 0xA, 0xE], // 'G'
    [0xA, 0xA, 0xE, 0xA], // 'H'
    [0xE, 0x4, 0x4, 0xE], // 'I'
    [0x2, 0x2, 0xA, 0xE], // 'J'
    [0xA, 0xC, 0xC, 0xA], // 'K'
    [0x8, 0x8, 0x8, 0xE], // 'L'
    [0xE, 0xE, 0xA, 0xA], // 'M'
    [0xC, 0xA, 0xA, 0xA], // 'N'
    [0xE, 0xA, 0xA, 0xE], // 'O'
    [0xE, 0xA, 0xE, 0x8], // 'P'
    [0xE, 0xA, 0xE, 0x2], // 'Q'
    [0xE, 0xA, 0xC, 0xA], // 'R'
    [0x6, 0x8, 0x2, 0xC], // 'S'
    [0xE, 0x4, 0x4, 0x4], // 'T'
    [0xA, 0xA, 0xA, 0xE], // 'U'
    [0xA, 0xA, 0xA, 0x4], // 'V'
    [0xA, 0xA, 0xE, 0xE], // 'W'
    [0xA, 0x4, 0x4, 0xA], // 'X'
    [0xA, 0xA, 0x4, 0x4], // 'Y'
    [0xE, 0x6, 0xC, 0xE], // 'Z'
];

/// 3x7 digits for two-up packing
#[rustfmt::skip]
const DIGITS_3X7: [[u8; 7]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b001, 0b111, 0b100, 0b100, 0b111], // 2
    [0b111, 0b001, 0b001, 0b111, 0b001, 0b001, 0b111], // 3
    [0b101, 0b101, 0b101, 0b111, 0b001, 0b001, 0b001], // 4
    [0b111, 0b100, 0b100, 0b111, 0b001, 0b001, 0b111], // 5
    [0b111, 0b100, 0b100, 0b111, 0b101, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b101, 0b111, 0b101, 0b101, 0b111], // 8
    [0b111, 0b101, 0b101, 0b111, 0b001, 0b001, 0b111], // 9
];

/// Degree marker over a "C"
const DEGREES_C: [u8; 8] = [0xC0, 0xDE, 0x10, 0x10, 0x10, 0x10, 0x1E, 0x00];
