//! SPI master adapter
//!
//! Wraps any `embedded-hal` 1.0 SPI bus (the embassy-rp blocking SPI in
//! practice) so it satisfies [`classplate_hal::SpiBus`].

use classplate_hal::spi::{Phase, Polarity};
use classplate_hal::SpiConfig;

/// Write-only SPI master for the MAX7219 chain
pub struct ChainSpi<S> {
    bus: S,
}

impl<S> ChainSpi<S> {
    /// Wrap an initialized SPI bus
    pub fn new(bus: S) -> Self {
        Self { bus }
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> S {
        self.bus
    }
}

impl<S> classplate_hal::SpiBus for ChainSpi<S>
where
    S: embedded_hal::spi::SpiBus<u8>,
{
    type Error = S::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.bus.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.bus.flush()
    }
}

/// Translate a HAL SPI configuration into the embassy-rp configuration
pub fn rp_spi_config(config: &SpiConfig) -> embassy_rp::spi::Config {
    let mut rp = embassy_rp::spi::Config::default();
    rp.frequency = config.frequency;
    rp.polarity = match config.polarity {
        Polarity::IdleLow => embassy_rp::spi::Polarity::IdleLow,
        Polarity::IdleHigh => embassy_rp::spi::Polarity::IdleHigh,
    };
    rp.phase = match config.phase {
        Phase::CaptureOnFirstTransition => embassy_rp::spi::Phase::CaptureOnFirstTransition,
        Phase::CaptureOnSecondTransition => embassy_rp::spi::Phase::CaptureOnSecondTransition,
    };
    rp
}
