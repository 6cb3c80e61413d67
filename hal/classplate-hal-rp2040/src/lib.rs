//! RP2040-specific HAL for the Classplate firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `classplate-hal` traits:
//!
//! - SPI master adapter for the matrix chain (`spi::ChainSpi`)
//! - Chain select output (`gpio::SelectPin`)
//! - Busy-wait latch delay (`delay::BusyWait`)

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod spi;

pub use delay::BusyWait;
pub use gpio::SelectPin;
pub use spi::{rp_spi_config, ChainSpi};

// Re-export shared traits from classplate-hal for convenience
pub use classplate_hal::{DelayUs, OutputPin, SpiBus, SpiConfig};
