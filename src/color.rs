use embedded_graphics_core::pixelcolor::{Rgb565, raw::RawU16};
use embedded_graphics_core::prelude::RawData;

/// Packed 16-bit panel color.
///
/// Values built with [`Color::rgb`] take channels that are already reduced to
/// 5/6/5 bits; 8-bit components are masked, not scaled. Raw values are passed
/// to the panel untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);

    /// Packs red (5 bits), green (6 bits) and blue (5 bits).
    ///
    /// `((((r & 0x1F) << 6) | (g & 0x3F)) << 5) | (b & 0x1F)`, truncated to 16 bits.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        let mut packed = (r & 0x1F) as u32;
        packed <<= 6;
        packed |= (g & 0x3F) as u32;
        packed <<= 5;
        packed |= (b & 0x1F) as u32;
        Color(packed as u16)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Color(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        Color(RawU16::from(color).into_inner())
    }
}
