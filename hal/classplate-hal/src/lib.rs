//! Classplate Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the display engine
//! is written against. Chip-specific crates implement them so the same
//! engine runs on the RP2040 board and in host tests with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  classplate-core (matrix chain, engine) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  classplate-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ classplate-   │       │  host mocks   │
//! │  hal-rp2040   │       │  (unit tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (chain select line)
//! - [`spi::SpiBus`] - Write-only SPI master
//! - [`delay::DelayUs`] - Short blocking delays (latch settle time)

#![no_std]
#![deny(unsafe_code)]

pub mod delay;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use delay::DelayUs;
pub use gpio::OutputPin;
pub use spi::{SpiBus, SpiConfig};
