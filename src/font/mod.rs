//! Bitmap font tables.
//!
//! A font is an immutable byte blob:
//!
//! | offset | content                                                        |
//! |--------|----------------------------------------------------------------|
//! | 0      | glyph height in pixels                                         |
//! | 1      | first supported character                                      |
//! | 2      | number of supported characters                                 |
//! | 3..5   | big-endian length; `0` marks a fixed-width font                |
//! | 5      | fixed width (fixed fonts) or the per-glyph width table         |
//!
//! Glyph bitmaps follow. They are column-major: each glyph stores
//! `ceil(height / 8)` row-bytes per column, row-byte `i` of every column
//! contiguous, least significant bit on top.

mod tables;

pub use tables::{DIGITS_5X7, SYSTEM_5X7};

const FONT_HEIGHT: usize = 0;
const FONT_FIRST_CHAR: usize = 1;
const FONT_CHAR_COUNT: usize = 2;
const FONT_LENGTH: usize = 3;
const FONT_FIXED_WIDTH: usize = 5;
const FONT_WIDTH_TABLE: usize = 5;

/// Read-only view over a static font blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    data: &'static [u8],
}

impl Font {
    pub const fn from_bytes(data: &'static [u8]) -> Self {
        Self { data }
    }

    fn byte(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0)
    }

    pub fn height(&self) -> u8 {
        self.byte(FONT_HEIGHT)
    }

    pub fn first_char(&self) -> u8 {
        self.byte(FONT_FIRST_CHAR)
    }

    pub fn char_count(&self) -> u8 {
        self.byte(FONT_CHAR_COUNT)
    }

    /// A zero length field marks a fixed-width font without a width table.
    pub fn is_fixed_width(&self) -> bool {
        self.byte(FONT_LENGTH) == 0 && self.byte(FONT_LENGTH + 1) == 0
    }

    /// Row-bytes per glyph column.
    pub fn bytes_per_column(&self) -> usize {
        (self.height() as usize).div_ceil(8)
    }

    /// Position of `ch` inside the font, if it is supported.
    fn glyph_index(&self, ch: u8) -> Option<usize> {
        let first = self.first_char() as u16;
        let last = first + self.char_count() as u16;
        let code = ch as u16;
        if code < first || code >= last {
            return None;
        }
        Some((code - first) as usize)
    }

    pub fn contains(&self, ch: u8) -> bool {
        self.glyph_index(ch).is_some()
    }

    fn width_at(&self, index: usize) -> u8 {
        if self.is_fixed_width() {
            self.byte(FONT_FIXED_WIDTH)
        } else {
            self.byte(FONT_WIDTH_TABLE + index)
        }
    }

    /// Advance width of `ch` without spacing.
    ///
    /// Space is measured as `'n'` since many fonts leave it out. Unsupported
    /// characters measure 0.
    pub fn char_width(&self, ch: u8) -> u8 {
        let ch = if ch == b' ' { b'n' } else { ch };
        match self.glyph_index(ch) {
            Some(index) => self.width_at(index),
            None => 0,
        }
    }

    /// Bitmap of a supported character. Space is not special-cased here.
    pub fn glyph(&self, ch: u8) -> Option<Glyph> {
        let index = self.glyph_index(ch)?;
        let bytes = self.bytes_per_column();

        let (width, start) = if self.is_fixed_width() {
            let width = self.byte(FONT_FIXED_WIDTH);
            (width, index * bytes * width as usize + FONT_FIXED_WIDTH + 1)
        } else {
            let preceding: usize = (0..index)
                .map(|i| self.byte(FONT_WIDTH_TABLE + i) as usize)
                .sum();
            let start = preceding * bytes + self.char_count() as usize + FONT_WIDTH_TABLE;
            (self.byte(FONT_WIDTH_TABLE + index), start)
        };

        let blob: &'static [u8] = self.data;
        let end = start + width as usize * bytes;
        let data = blob.get(start..end.min(blob.len())).unwrap_or(&[]);

        Some(Glyph {
            width,
            height: self.height(),
            data,
        })
    }
}

/// Column-major bitmap of a single character.
#[derive(Debug, Clone, Copy)]
pub struct Glyph {
    width: u8,
    height: u8,
    data: &'static [u8],
}

impl Glyph {
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Every pixel cell of the glyph, column by column.
    ///
    /// Yields `(column, row, set)`. Truncated bitmaps read as clear.
    pub fn pixels(&self) -> GlyphPixels {
        GlyphPixels {
            glyph: *self,
            column: 0,
            row_byte: 0,
            bit: 0,
        }
    }

    /// Screen row of bit 0 of row-byte `i`.
    ///
    /// The last row-byte of a tall glyph is bottom aligned; glyphs shorter
    /// than 8 rows start at `height - 7`.
    fn row_offset(&self, i: usize) -> i32 {
        let bytes = (self.height as usize).div_ceil(8);
        let height = self.height as i32;
        if i == bytes - 1 && bytes > 1 {
            height - 8
        } else if height < 8 {
            height - 7
        } else {
            i as i32 * 8
        }
    }
}

pub struct GlyphPixels {
    glyph: Glyph,
    column: usize,
    row_byte: usize,
    bit: u8,
}

impl Iterator for GlyphPixels {
    type Item = (u8, i32, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let width = self.glyph.width as usize;
        let bytes = (self.glyph.height as usize).div_ceil(8);
        let height = self.glyph.height as i32;

        while self.column < width && bytes > 0 {
            let (column, row_byte, bit) = (self.column, self.row_byte, self.bit);

            self.bit += 1;
            if self.bit == 8 {
                self.bit = 0;
                self.row_byte += 1;
                if self.row_byte == bytes {
                    self.row_byte = 0;
                    self.column += 1;
                }
            }

            let row = self.glyph.row_offset(row_byte) + bit as i32;
            if row < row_byte as i32 * 8 || row > height {
                continue;
            }

            let data = self
                .glyph
                .data
                .get(column + row_byte * width)
                .copied()
                .unwrap_or(0);
            return Some((column as u8, row, data & (1 << bit) != 0));
        }
        None
    }
}

/// Name to font lookup table.
///
/// The driver only ever borrows fonts out of a registry; nothing is global.
#[derive(Debug, Clone, Copy)]
pub struct FontRegistry<'a> {
    entries: &'a [(&'a str, Font)],
}

const BUILTIN_FONTS: &[(&str, Font)] = &[("System5x7", SYSTEM_5X7), ("Digits5x7", DIGITS_5X7)];

impl<'a> FontRegistry<'a> {
    pub const fn new(entries: &'a [(&'a str, Font)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<Font> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, font)| *font)
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl FontRegistry<'static> {
    /// Fonts shipped with the crate.
    pub const fn builtin() -> Self {
        Self::new(BUILTIN_FONTS)
    }
}

impl Default for FontRegistry<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}
