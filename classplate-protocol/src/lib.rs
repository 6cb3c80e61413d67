//! Classplate Bridge Link Protocol
//!
//! This crate defines the UART protocol between the nameplate controller
//! and its bridge host. The bridge owns the network side (broker
//! subscription, time sync, weather lookup) and forwards content updates
//! to the plate; the plate answers with acknowledgements and a periodic
//! online heartbeat.
//!
//! # Frame Format
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The plate never initiates content changes; it only renders what the
//! bridge delivers.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{DeviceMessage, HostCommand, TEMPERATURE_UNKNOWN};
