use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;

use crate::color::Color;
use crate::display::Ili9341;
use crate::{Error, Timer};

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Ili9341",),
    async(feature = "async", keep_self)
)]
impl<SPI, DC, RST, E, TIMER> Ili9341<SPI, DC, RST, TIMER>
where
    SPI: SpiDevice<Error = E>,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    /// Width of `ch` in the active font, without spacing.
    pub fn char_width(&self, ch: u8) -> u8 {
        self.font.char_width(ch)
    }

    /// Draws `ch` at the cursor without moving it and returns its width.
    ///
    /// Glyphs are painted as opaque boxes: set bits in the foreground color,
    /// clear bits in the background color.
    pub async fn draw_char(&mut self, ch: u8) -> Result<u8, Error<E>> {
        let width = self.render_char(ch).await;
        self.settle()?;
        Ok(width)
    }

    /// Moves the cursor (unchecked) and sets the foreground color, then draws `ch`.
    pub async fn draw_char_at(&mut self, ch: u8, x: i32, y: i32, color: Color) -> Result<u8, Error<E>> {
        self.cursor_x = x;
        self.cursor_y = y;
        self.color = color;
        self.draw_char(ch).await
    }

    /// Draws `text` byte by byte from the cursor, wrapping to the next line
    /// when a character would cross the right edge.
    ///
    /// Without room for another line the cursor stays put and the following
    /// characters are drawn over the same spot.
    pub async fn write_str(&mut self, text: &str) -> Result<(), Error<E>> {
        let line_height = self.font.height() as i32 + self.char_spacing as i32;

        for ch in text.bytes() {
            let advance = self.font.char_width(ch) as i32 + self.char_spacing as i32;
            self.render_char(ch).await;

            // i64: the cursor is unchecked and may sit near i32::MAX
            if i64::from(self.cursor_x) + i64::from(advance) <= i64::from(self.width) {
                self.cursor_x += advance;
            } else if i64::from(self.cursor_y) + i64::from(line_height) <= i64::from(self.height) {
                self.cursor_x = 0;
                self.cursor_y += line_height;
            }
        }
        self.settle()
    }

    /// Moves the cursor (unchecked) and sets the foreground color, then writes `text`.
    pub async fn write_str_at(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<(), Error<E>> {
        self.cursor_x = x;
        self.cursor_y = y;
        self.color = color;
        self.write_str(text).await
    }

    async fn render_char(&mut self, ch: u8) -> u8 {
        let (x, y) = (self.cursor_x, self.cursor_y);
        if x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }

        let font = self.font;
        let height = font.height() as i32;

        if ch == b' ' {
            let width = font.char_width(b' ');
            let bg_color = self.bg_color;
            self.draw_fill_rect(x.into(), y.into(), width.into(), height.into(), bg_color)
                .await;
            return width;
        }

        let Some(glyph) = font.glyph(ch) else {
            return 0;
        };
        let width = glyph.width();

        // Entirely above or left of the panel
        if x < -(width as i32) || y < -height {
            return width;
        }

        let (fg_color, bg_color) = (self.color, self.bg_color);
        for (column, row, set) in glyph.pixels() {
            let color = if set { fg_color } else { bg_color };
            self.plot(x + column as i32, y + row, color).await;
        }
        width
    }
}
