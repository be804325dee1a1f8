//! Draws a few primitives and a line of text on a panel wired to a
//! Raspberry Pi style header: `/dev/spidev0.0`, D/C on GPIO 24, reset on GPIO 25.
//!
//! `RUST_LOG=debug cargo run --example linux-hello --features linux`

use std::thread;
use std::time::Duration;

use ili9341_spi::linux::{self, LinuxConfig, LinuxError};
use ili9341_spi::{Color, FontRegistry, Rotation};
use log::info;

const RED: Color = Color::rgb(31, 0, 0);
const GREEN: Color = Color::rgb(0, 63, 0);
const BLUE: Color = Color::rgb(0, 0, 31);
const YELLOW: Color = Color::rgb(31, 63, 0);

fn main() -> Result<(), LinuxError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut display = linux::open(&LinuxConfig::default())?;
    info!("Display initialized ({}x{})", display.width(), display.height());

    let fonts = FontRegistry::builtin();
    let mut rotation = Rotation::Deg0;

    for _ in 0..4 {
        display.set_rotation(rotation).map_err(LinuxError::Init)?;
        display.clear().map_err(LinuxError::Init)?;

        let (width, height) = (display.width() as i32, display.height() as i32);
        display.rect(0, 0, width, height, BLUE).map_err(LinuxError::Init)?;
        display.rect_filled(10, 10, 40, 20, RED).map_err(LinuxError::Init)?;
        display.circle(width / 2, height / 2, 30, GREEN).map_err(LinuxError::Init)?;
        display
            .triangle(10, height - 10, 50, height - 60, 90, height - 10, YELLOW)
            .map_err(LinuxError::Init)?;

        display.set_font(&fonts, "System5x7", 1);
        display
            .write_str_at("Hello, ILI9341!", 10, 40, Color::WHITE)
            .map_err(LinuxError::Init)?;

        if display.set_font(&fonts, "Digits5x7", 2) {
            display.write_str_at("0123456789", 10, 60, YELLOW).map_err(LinuxError::Init)?;
        }

        info!("Rotation {} done, {} dropped writes", rotation.degrees(), display.dropped_writes());
        thread::sleep(Duration::from_secs(2));
        rotation = rotation.next();
    }
    Ok(())
}
