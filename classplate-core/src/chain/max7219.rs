//! Bus driver for a cascaded MAX7219 chain

use classplate_hal::{DelayUs, OutputPin, SpiBus};

use super::{ChainError, Frame, MatrixWriter, Register};
use crate::layout::ModuleIndex;

/// Settle time after LOAD/CS rises before the next burst
pub const LATCH_DELAY_US: u32 = 2;

/// Chain transport over a write-only SPI bus and a manual select line
pub struct MatrixChain<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
    bursts: u32,
}

impl<SPI, CS, D> MatrixChain<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayUs,
{
    /// Take ownership of the bus and deselect the chain
    pub fn new(spi: SPI, mut cs: CS, delay: D) -> Self {
        cs.set_high();
        Self {
            spi,
            cs,
            delay,
            bursts: 0,
        }
    }

    /// Number of bursts attempted since creation
    pub fn bursts(&self) -> u32 {
        self.bursts
    }

    /// Send one frame as a single select-framed burst
    ///
    /// CS is released even when the bus fails so the chain never stays
    /// selected; the chips then latch whatever arrived, which is why a
    /// failed burst is reported rather than retried.
    pub fn transmit(&mut self, frame: &Frame) -> Result<(), ChainError<SPI::Error>> {
        let bytes = frame.to_bytes();
        self.bursts = self.bursts.wrapping_add(1);

        self.cs.set_low();
        let result = self.spi.write(&bytes).and_then(|()| self.spi.flush());
        self.cs.set_high();
        self.delay.delay_us(LATCH_DELAY_US);

        result.map_err(ChainError::Bus)
    }

    /// Release the peripherals
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }
}

impl<SPI, CS, D> MatrixWriter for MatrixChain<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayUs,
{
    type Error = ChainError<SPI::Error>;

    fn write_all(&mut self, register: Register, data: u8) -> Result<(), Self::Error> {
        self.transmit(&Frame::broadcast(register, data))
    }

    fn write_one(
        &mut self,
        module: ModuleIndex,
        register: Register,
        data: u8,
    ) -> Result<(), Self::Error> {
        self.transmit(&Frame::addressed(module, register, data))
    }
}
