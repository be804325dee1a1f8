#![no_std]

//! ILI9341 TFT driver over SPI with a primitive rasterizer and bitmap fonts.
//!
//! The bus is any `embedded-hal` [`SpiDevice`](embedded_hal::spi::SpiDevice)
//! (or the async variant with the `async` feature), the D/C and reset lines
//! are infallible [`OutputPin`](embedded_hal::digital::OutputPin)s. Wrap
//! fallible lines in [`TolerantLine`]. Every pixel is addressed and written
//! individually; nothing is buffered.
//!
//! With the `linux` feature, [`linux::open`] builds a driver on top of
//! `/dev/spidevB.C` and sysfs GPIO lines.

#[cfg(any(test, feature = "linux"))]
extern crate std;

use core::convert::Infallible;

mod color;
mod display;
pub mod font;
mod instruction;
mod line;
#[cfg(all(test, not(feature = "async")))]
mod mock;
mod primitives;
mod rotation;
mod text;

#[cfg(all(feature = "linux", not(feature = "async")))]
pub mod linux;

pub use color::Color;
pub use display::Ili9341;
pub use font::{Font, FontRegistry};
pub use instruction::Instruction;
pub use line::TolerantLine;
pub use rotation::Rotation;

// Physical panel size at rotation 0
pub const SCREEN_WIDTH: u16 = 240; // Short edge
pub const SCREEN_HEIGHT: u16 = 320; // Long edge

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Panel width at rotation 0.
    pub width: u16,
    /// Panel height at rotation 0.
    pub height: u16,
    /// How long reset is held low.
    pub reset_hold_ms: u64,
    /// Wait after releasing reset before the first command.
    ///
    /// 0 leaves the reset hold and the sleep-out settle as the only waits.
    pub reset_recovery_ms: u64,
    /// Wait after sleep-out before display-on.
    pub sleep_out_settle_ms: u64,
    pub color: Color,
    pub bg_color: Color,
    pub char_spacing: u8,
    pub font: Font,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            reset_hold_ms: 10,
            reset_recovery_ms: 5,
            sleep_out_settle_ms: 120,
            color: Color::WHITE,
            bg_color: Color::BLACK,
            char_spacing: 1,
            font: font::SYSTEM_5X7,
        }
    }
}

#[derive(Debug)]
pub enum Error<E = ()> {
    /// Communication error
    Comm(E),
    /// Pin setting error
    Pin(Infallible),
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Timer",),
    async(feature = "async", keep_self)
)]
/// Simplified timer trait for delay operations.
pub trait Timer {
    /// Delay for the specified number of milliseconds.
    async fn delay_ms(milliseconds: u64);
}
