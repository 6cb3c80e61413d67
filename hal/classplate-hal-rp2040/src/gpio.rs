//! Chain select output
//!
//! The MAX7219 latches on the rising edge of LOAD/CS, so the line is
//! driven manually rather than by the SPI peripheral.

/// Manually driven chip-select line
pub struct SelectPin<P> {
    pin: P,
    high: bool,
}

impl<P: embedded_hal::digital::OutputPin> SelectPin<P> {
    /// Wrap an output pin and deselect the chain
    pub fn new(pin: P) -> Self {
        let mut select = Self { pin, high: false };
        classplate_hal::OutputPin::set_high(&mut select);
        select
    }
}

impl<P: embedded_hal::digital::OutputPin> classplate_hal::OutputPin for SelectPin<P> {
    fn set_high(&mut self) {
        // RP2040 GPIO writes are infallible
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
