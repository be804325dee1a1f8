use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
#[cfg(not(feature = "async"))]
use embedded_hal::spi::SpiDevice;
#[cfg(feature = "async")]
use embedded_hal_async::spi::SpiDevice;
use log::{debug, warn};

use crate::color::Color;
use crate::font::{Font, FontRegistry};
use crate::instruction::{INIT_SEQUENCE, Instruction};
use crate::rotation::Rotation;
use crate::{Config, Error, Timer};

/// One physical ILI9341 panel.
///
/// Owns the bus and both control lines. Drawing state (colors, cursor, font)
/// lives here and is read by the rasterizer and text renderer.
pub struct Ili9341<SPI, DC, RST, TIMER>
where
    SPI: SpiDevice,
    DC: OutputPin<Error = Infallible>,
    RST: OutputPin<Error = Infallible>,
    TIMER: Timer,
{
    spi: SPI,
    dc: DC,
    rst: RST,
    config: Config,
    pub(crate) width: u16,
    pub(crate) height: u16,
    rotation: Rotation,
    pub(crate) color: Color,
    pub(crate) bg_color: Color,
    pub(crate) cursor_x: i32,
    pub(crate) cursor_y: i32,
    pub(crate) font: Font,
    pub(crate) char_spacing: u8,
    /// First pixel write failure of the drawing call in progress.
    deferred: Option<Error<SPI::Error>>,
    dropped_writes: u32,
    _timer: core::marker::PhantomData<TIMER>,
}

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
    /// Takes ownership of the bus and lines. Call [`init`](Self::init) before drawing.
    pub fn new(config: Config, spi: SPI, dc: DC, rst: RST) -> Self {
        Self {
            spi,
            dc,
            rst,
            config,
            width: config.width,
            height: config.height,
            rotation: Rotation::Deg0,
            color: config.color,
            bg_color: config.bg_color,
            cursor_x: 0,
            cursor_y: 0,
            font: config.font,
            char_spacing: config.char_spacing,
            deferred: None,
            dropped_writes: 0,
            _timer: core::marker::PhantomData,
        }
    }

    /// Hardware reset followed by the power-up register script.
    ///
    /// Any transfer failure aborts bring-up.
    pub async fn init(&mut self) -> Result<(), Error<E>> {
        debug!("ili9341: init");
        self.dc.set_high().map_err(Error::Pin)?;
        self.reset().await?;

        for (instruction, params) in INIT_SEQUENCE {
            self.write_command(*instruction, params).await?;
        }

        self.send_command(Instruction::SleepOut as u8).await?;
        TIMER::delay_ms(self.config.sleep_out_settle_ms).await;

        self.send_command(Instruction::DisplayOn as u8).await?;
        self.send_command(Instruction::MemoryWrite as u8).await?;

        self.rotation = Rotation::Deg0;
        self.width = self.config.width;
        self.height = self.config.height;
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        self.rst.set_low().map_err(Error::Pin)?;
        TIMER::delay_ms(self.config.reset_hold_ms).await;
        self.rst.set_high().map_err(Error::Pin)?;
        if self.config.reset_recovery_ms > 0 {
            TIMER::delay_ms(self.config.reset_recovery_ms).await;
        }

        Ok(())
    }

    /// One blocking single-byte transfer.
    pub async fn send_byte(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.spi.write(&[byte]).await.map_err(Error::Comm)
    }

    /// D/C low, then the command byte.
    pub async fn send_command(&mut self, index: u8) -> Result<(), Error<E>> {
        self.dc.set_low().map_err(Error::Pin)?;
        self.send_byte(index).await
    }

    /// D/C high, then one parameter byte.
    pub async fn send_data(&mut self, byte: u8) -> Result<(), Error<E>> {
        self.dc.set_high().map_err(Error::Pin)?;
        self.send_byte(byte).await
    }

    /// D/C high, then `value` big-endian.
    pub async fn send_word(&mut self, value: u16) -> Result<(), Error<E>> {
        self.dc.set_high().map_err(Error::Pin)?;
        let [high, low] = value.to_be_bytes();
        self.send_byte(high).await?;
        self.send_byte(low).await
    }

    /// Write command with optional parameters
    async fn write_command(&mut self, instruction: Instruction, params: &[u8]) -> Result<(), Error<E>> {
        self.send_command(instruction as u8).await?;
        for byte in params {
            self.send_data(*byte).await?;
        }
        Ok(())
    }

    pub async fn set_column_window(&mut self, start: u16, end: u16) -> Result<(), Error<E>> {
        self.send_command(Instruction::ColumnAddressSet as u8).await?;
        self.send_word(start).await?;
        self.send_word(end).await
    }

    pub async fn set_page_window(&mut self, start: u16, end: u16) -> Result<(), Error<E>> {
        self.send_command(Instruction::PageAddressSet as u8).await?;
        self.send_word(start).await?;
        self.send_word(end).await
    }

    /// Narrows the window to one pixel and opens memory write.
    ///
    /// Coordinates are truncated to the controller's 16-bit registers, there
    /// is no clipping.
    pub async fn set_pixel_address(&mut self, x: i32, y: i32) -> Result<(), Error<E>> {
        self.set_column_window(x as u16, x as u16).await?;
        self.set_page_window(y as u16, y as u16).await?;
        self.send_command(Instruction::MemoryWrite as u8).await
    }

    pub async fn write_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), Error<E>> {
        self.set_pixel_address(x, y).await?;
        self.send_word(color.raw()).await
    }

    /// Best-effort pixel write used by the rasterizer.
    ///
    /// A failed write is logged and remembered; drawing goes on.
    pub(crate) async fn plot(&mut self, x: i32, y: i32, color: Color) {
        if let Err(err) = self.write_pixel(x, y, color).await {
            self.dropped_writes = self.dropped_writes.saturating_add(1);
            if self.deferred.is_none() {
                warn!("ili9341: pixel write at ({}, {}) failed", x, y);
                self.deferred = Some(err);
            }
        }
    }

    /// Reports the first failure collected by [`plot`](Self::plot) since the last call.
    pub(crate) fn settle(&mut self) -> Result<(), Error<E>> {
        match self.deferred.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Writes black over the whole panel, one word per physical pixel.
    pub async fn clear(&mut self) -> Result<(), Error<E>> {
        self.set_column_window(0, self.width).await?;
        self.set_page_window(0, self.height).await?;
        self.send_command(Instruction::MemoryWrite as u8).await?;

        self.dc.set_high().map_err(Error::Pin)?;
        let total_pixels = self.config.width as u32 * self.config.height as u32;
        for _ in 0..total_pixels {
            self.send_word(Color::BLACK.raw()).await?;
        }
        Ok(())
    }

    pub async fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<E>> {
        self.send_command(Instruction::MemoryAccessControl as u8).await?;
        self.send_data(rotation.madctl()).await?;

        let (width, height) = rotation.dimensions(self.config.width, self.config.height);
        self.rotation = rotation;
        self.width = width;
        self.height = height;
        debug!("ili9341: rotation {} ({}x{})", rotation.degrees(), width, height);
        Ok(())
    }

    pub async fn invert(&mut self, inverted: bool) -> Result<(), Error<E>> {
        let instruction = if inverted {
            Instruction::DisplayInversionOn
        } else {
            Instruction::DisplayInversionOff
        };
        self.send_command(instruction as u8).await
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.bg_color = color;
    }

    /// Moves the text cursor. Each axis is only updated when it lies within
    /// `0..=width` / `0..=height`.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        if (0..=self.width as i32).contains(&x) {
            self.cursor_x = x;
        }
        if (0..=self.height as i32).contains(&y) {
            self.cursor_y = y;
        }
    }

    /// Selects a font by name and sets the spacing between characters.
    ///
    /// An unknown name keeps the current font; the spacing applies either way.
    pub fn set_font(&mut self, registry: &FontRegistry<'_>, name: &str, spacing: u8) -> bool {
        self.char_spacing = spacing;
        match registry.lookup(name) {
            Some(font) => {
                debug!("ili9341: font {}", name);
                self.font = font;
                true
            }
            None => {
                warn!("ili9341: unknown font {}, keeping current", name);
                false
            }
        }
    }

    pub fn use_font(&mut self, font: Font, spacing: u8) {
        self.font = font;
        self.char_spacing = spacing;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn bg_color(&self) -> Color {
        self.bg_color
    }

    pub fn cursor_x(&self) -> i32 {
        self.cursor_x
    }

    pub fn cursor_y(&self) -> i32 {
        self.cursor_y
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn char_spacing(&self) -> u8 {
        self.char_spacing
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pixel writes that failed since construction.
    pub fn dropped_writes(&self) -> u32 {
        self.dropped_writes
    }

    /// Gives back the bus and both lines.
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }
}

#[cfg(not(feature = "async"))]
mod graphics {
    use core::convert::Infallible;

    use embedded_graphics_core::Pixel;
    use embedded_graphics_core::draw_target::DrawTarget;
    use embedded_graphics_core::geometry::{OriginDimensions, Size};
    use embedded_graphics_core::pixelcolor::Rgb565;
    use embedded_hal::digital::OutputPin;
    use embedded_hal::spi::SpiDevice;

    use super::Ili9341;
    use crate::color::Color;
    use crate::{Error, Timer};

    impl<SPI, DC, RST, E, TIMER> OriginDimensions for Ili9341<SPI, DC, RST, TIMER>
    where
        SPI: SpiDevice<Error = E>,
        DC: OutputPin<Error = Infallible>,
        RST: OutputPin<Error = Infallible>,
        TIMER: Timer,
    {
        fn size(&self) -> Size {
            Size::new(self.width as u32, self.height as u32)
        }
    }

    impl<SPI, DC, RST, E, TIMER> DrawTarget for Ili9341<SPI, DC, RST, TIMER>
    where
        SPI: SpiDevice<Error = E>,
        DC: OutputPin<Error = Infallible>,
        RST: OutputPin<Error = Infallible>,
        TIMER: Timer,
    {
        type Color = Rgb565;
        type Error = Error<E>;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.plot(point.x, point.y, Color::from(color));
            }
            self.settle()
        }
    }
}
