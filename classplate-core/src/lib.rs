//! Board-agnostic display engine for the Classplate nameplate
//!
//! This crate contains everything that does not depend on a specific
//! board:
//!
//! - Chain geometry and zone partitioning
//! - MAX7219 chain transport (no-op filled frames, transport lock)
//! - Module and scroll buffers
//! - Glyph dictionary and compositor
//! - Display facade (clock, temperature, brightness)
//! - Scroll engine and the shared display state it reads
//! - Wall clock and temperature cache
//! - Configuration types and the TOML subset parser
//!
//! # Data flow
//!
//! ```text
//! inbound link ──► SharedDisplayState ──► ScrollEngine ──► ScrollBuffer ─┐
//!                     (state lock)                                      │
//! WallClock / TemperatureCache ──► Display ──► compositor ──────────────┤
//!                                                                       ▼
//!                                                   SharedChain (transport lock)
//!                                                                       │
//!                                                                       ▼
//!                                                        MatrixChain ──► SPI
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod chain;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod display;
pub mod glyph;
pub mod layout;
pub mod scroll;
pub mod state;

pub use buffer::{ModuleBuffer, ScrollBuffer};
pub use chain::{ChainError, Frame, FrameWord, MatrixChain, MatrixWriter, Register, SharedChain};
pub use clock::{ClockTime, TemperatureCache, TemperatureSource, TimeSource, WallClock};
pub use config::{parse_config, ClockConfig, ConfigError, DisplayConfig, ParseError};
pub use display::{Display, DisplayError, FixedZoneRefresh, RenderOutcome};
pub use glyph::{BuiltinFont, GlyphDictionary};
pub use layout::{ModuleIndex, Zone, NUM_MODULES};
pub use scroll::{PassSummary, ScrollEngine, ScrollSettings};
pub use state::{Brightness, DisplaySnapshot, MessageText, SharedDisplayState};
