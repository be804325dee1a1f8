use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::warn;

/// Output line that never fails from the driver's point of view.
///
/// Errors from the wrapped pin are logged once and then swallowed, so a panel
/// with a broken D/C or reset line keeps accepting draw calls. A line that is
/// absent altogether (`None`) turns every write into a no-op.
pub struct TolerantLine<P> {
    name: &'static str,
    pin: Option<P>,
    failures: u32,
}

impl<P: OutputPin> TolerantLine<P> {
    pub fn new(name: &'static str, pin: P) -> Self {
        Self {
            name,
            pin: Some(pin),
            failures: 0,
        }
    }

    /// A line that could not be acquired.
    pub fn detached(name: &'static str) -> Self {
        warn!("{}: line unavailable, writes are ignored", name);
        Self {
            name,
            pin: None,
            failures: 0,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.pin.is_some()
    }

    /// Number of writes the underlying pin rejected.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn into_inner(self) -> Option<P> {
        self.pin
    }

    fn drive(&mut self, high: bool) {
        let Some(pin) = self.pin.as_mut() else {
            return;
        };
        let result = if high { pin.set_high() } else { pin.set_low() };
        if result.is_err() {
            if self.failures == 0 {
                warn!("{}: write failed, continuing without line control", self.name);
            }
            self.failures = self.failures.saturating_add(1);
        }
    }
}

impl<P> ErrorType for TolerantLine<P> {
    type Error = Infallible;
}

impl<P: OutputPin> OutputPin for TolerantLine<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}
