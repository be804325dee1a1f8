//! Recording bus, lines and timer for driver tests.

use core::cell::RefCell;
use core::convert::Infallible;
use core::ops::Range;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use crate::{Config, Ili9341, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Dc(bool),
    Reset(bool),
    Byte(u8),
    Delay(u64),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

std::thread_local! {
    static TIMER_LOG: RefCell<Option<Log>> = const { RefCell::new(None) };
    static FAILING: RefCell<Option<Range<usize>>> = const { RefCell::new(None) };
}

/// Byte transfers with these indices (counted from construction) fail.
pub fn fail_transfers(range: Range<usize>) {
    FAILING.with(|failing| *failing.borrow_mut() = Some(range));
}

pub fn fail_after(count: usize) {
    fail_transfers(count..usize::MAX);
}

pub struct MockSpi {
    log: Log,
    attempts: usize,
}

impl ErrorType for MockSpi {
    type Error = ErrorKind;
}

impl MockSpi {
    fn transfer(&mut self, byte: u8) -> Result<(), ErrorKind> {
        let index = self.attempts;
        self.attempts += 1;
        let failing = FAILING.with(|failing| {
            failing
                .borrow()
                .as_ref()
                .is_some_and(|range| range.contains(&index))
        });
        if failing {
            return Err(ErrorKind::Other);
        }
        self.log.borrow_mut().push(Event::Byte(byte));
        Ok(())
    }
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    for byte in bytes.iter() {
                        self.transfer(*byte)?;
                    }
                }
                Operation::Transfer(_, bytes) => {
                    for byte in bytes.iter() {
                        self.transfer(*byte)?;
                    }
                }
                Operation::TransferInPlace(bytes) => {
                    for byte in bytes.iter() {
                        self.transfer(*byte)?;
                    }
                }
                Operation::Read(_) | Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

pub struct MockLine {
    log: Log,
    event: fn(bool) -> Event,
}

impl PinErrorType for MockLine {
    type Error = Infallible;
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.event)(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push((self.event)(true));
        Ok(())
    }
}

pub struct MockTimer;

impl Timer for MockTimer {
    fn delay_ms(milliseconds: u64) {
        TIMER_LOG.with(|log| {
            if let Some(log) = log.borrow().as_ref() {
                log.borrow_mut().push(Event::Delay(milliseconds));
            }
        });
    }
}

pub type MockDisplay = Ili9341<MockSpi, MockLine, MockLine, MockTimer>;

/// A driver on recording peripherals, not yet initialized.
pub fn display() -> (MockDisplay, Log) {
    display_with(Config::default())
}

pub fn display_with(config: Config) -> (MockDisplay, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    TIMER_LOG.with(|timer| *timer.borrow_mut() = Some(log.clone()));
    FAILING.with(|failing| *failing.borrow_mut() = None);

    let spi = MockSpi {
        log: log.clone(),
        attempts: 0,
    };
    let dc = MockLine {
        log: log.clone(),
        event: Event::Dc,
    };
    let rst = MockLine {
        log: log.clone(),
        event: Event::Reset,
    };
    (Ili9341::new(config, spi, dc, rst), log)
}

/// A command byte and the data bytes that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: u8,
    pub params: Vec<u8>,
}

pub fn frames(log: &Log) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut data_mode = false;
    for event in log.borrow().iter() {
        match *event {
            Event::Dc(level) => data_mode = level,
            Event::Byte(byte) if !data_mode => frames.push(Frame {
                command: byte,
                params: Vec::new(),
            }),
            Event::Byte(byte) => {
                if let Some(frame) = frames.last_mut() {
                    frame.params.push(byte);
                }
            }
            Event::Reset(_) | Event::Delay(_) => {}
        }
    }
    frames
}

fn first_word(params: &[u8]) -> i32 {
    match params {
        [high, low, ..] => u16::from_be_bytes([*high, *low]) as i16 as i32,
        _ => 0,
    }
}

/// Pixels written through single-pixel windows, in order.
pub fn pixels(log: &Log) -> Vec<(i32, i32, u16)> {
    let mut pixels = Vec::new();
    let (mut column, mut page) = (0, 0);
    for frame in frames(log) {
        match frame.command {
            0x2A => column = first_word(&frame.params),
            0x2B => page = first_word(&frame.params),
            0x2C => {
                for word in frame.params.chunks_exact(2) {
                    pixels.push((column, page, u16::from_be_bytes([word[0], word[1]])));
                }
            }
            _ => {}
        }
    }
    pixels
}

/// Distinct coordinates touched, sorted.
pub fn coverage(log: &Log) -> Vec<(i32, i32)> {
    let mut points: Vec<(i32, i32)> = pixels(log).iter().map(|&(x, y, _)| (x, y)).collect();
    points.sort_unstable();
    points.dedup();
    points
}
