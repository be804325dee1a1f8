//! Driver construction on a Linux host: `/dev/spidevB.C` for the bus and
//! sysfs GPIO for the D/C and reset lines.

use std::fmt;
use std::format;
use std::string::{String, ToString};
use std::thread;
use std::time::Duration;

use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{SPIError, SpidevDevice, SysfsPin};
use log::{debug, warn};

use crate::line::TolerantLine;
use crate::{Config, Error, Ili9341, Timer};

/// Blocking timer backed by `std::thread::sleep`.
pub struct StdTimer;

impl Timer for StdTimer {
    fn delay_ms(milliseconds: u64) {
        thread::sleep(Duration::from_millis(milliseconds));
    }
}

pub type LinuxDisplay = Ili9341<SpidevDevice, TolerantLine<SysfsPin>, TolerantLine<SysfsPin>, StdTimer>;

#[derive(Clone, Copy, Debug)]
pub struct LinuxConfig {
    pub bus: u8,
    pub chip_select: u8,
    /// sysfs GPIO number of the D/C line.
    pub dc: u64,
    /// sysfs GPIO number of the reset line.
    pub reset: u64,
    pub max_speed_hz: u32,
    pub display: Config,
}

impl Default for LinuxConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            chip_select: 0,
            dc: 24,
            reset: 25,
            max_speed_hz: 16_000_000,
            display: Config::default(),
        }
    }
}

impl LinuxConfig {
    pub fn device_path(&self) -> String {
        format!("/dev/spidev{}.{}", self.bus, self.chip_select)
    }
}

#[derive(Debug)]
pub enum LinuxError {
    /// The SPI device node could not be opened or configured
    DeviceOpen { path: String, reason: String },
    /// The panel did not accept the power-up script
    Init(Error<SPIError>),
}

impl fmt::Display for LinuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinuxError::DeviceOpen { path, reason } => write!(f, "cannot open {}: {}", path, reason),
            LinuxError::Init(Error::Comm(err)) => write!(f, "panel init failed: {:?}", err),
            LinuxError::Init(Error::Pin(never)) => match *never {},
        }
    }
}

impl std::error::Error for LinuxError {}

/// Opens the bus, claims the lines and runs the init sequence.
///
/// Lines that cannot be exported are logged and left detached; the bus is
/// required.
pub fn open(config: &LinuxConfig) -> Result<LinuxDisplay, LinuxError> {
    let path = config.device_path();
    let device_error = |reason: String| LinuxError::DeviceOpen {
        path: path.clone(),
        reason,
    };

    let mut spi = SpidevDevice::open(&path).map_err(|err| device_error(err.to_string()))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(config.max_speed_hz)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options)
        .map_err(|err| device_error(err.to_string()))?;
    debug!("ili9341: {} at {} Hz", path, config.max_speed_hz);

    let dc = output_line("dc", config.dc);
    let rst = output_line("reset", config.reset);

    let mut display = Ili9341::new(config.display, spi, dc, rst);
    display.init().map_err(LinuxError::Init)?;
    Ok(display)
}

fn output_line(name: &'static str, number: u64) -> TolerantLine<SysfsPin> {
    let pin = SysfsPin::new(number);
    let claimed = pin
        .export()
        .and_then(|()| pin.set_direction(Direction::Out));
    match claimed {
        Ok(()) => TolerantLine::new(name, pin),
        Err(err) => {
            warn!("{}: gpio{} unavailable: {}", name, number, err);
            TolerantLine::detached(name)
        }
    }
}
