//! Configuration types
//!
//! Loaded at boot from the TOML file embedded in the firmware. Every
//! field has a default so a missing section or key keeps working values.

mod parse;

pub use parse::{parse_config, ParseError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scroll::ScrollSettings;
use crate::state::{truncate_message, Brightness, MessageText, MAX_BRIGHTNESS};

/// Message shown until the bridge sends one
pub const DEFAULT_MESSAGE: &str = "HELLO LPU! WE ARE CIRCUIT CRAFTERS.";

/// Scroll zone settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScrollConfig {
    /// Delay per column step
    pub cadence_ms: u32,
    /// Boot message
    pub default_message: MessageText,
    /// Blank columns between characters
    pub char_gap_columns: u8,
    /// Blank columns after the message
    pub end_gap_columns: u8,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            cadence_ms: 80,
            default_message: truncate_message(DEFAULT_MESSAGE),
            char_gap_columns: 2,
            end_gap_columns: 16,
        }
    }
}

impl ScrollConfig {
    pub fn settings(&self) -> ScrollSettings {
        ScrollSettings {
            cadence_ms: self.cadence_ms,
            char_gap_columns: self.char_gap_columns,
            end_gap_columns: self.end_gap_columns,
        }
    }
}

/// Panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Boot intensity (0-15)
    pub brightness: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            brightness: MAX_BRIGHTNESS,
        }
    }
}

/// Clock path settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// Fixed zone refresh period
    pub refresh_ms: u32,
    /// Temperature older than this is treated as unknown
    pub temperature_max_age_s: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 1000,
            temperature_max_age_s: 900,
        }
    }
}

/// Bridge link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Period of the online status report
    pub heartbeat_interval_s: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_s: 10,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub scroll: ScrollConfig,
    pub display: PanelConfig,
    pub clock: ClockConfig,
    pub link: LinkConfig,
}

/// Out-of-range configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Cadence must be 1-1000 ms
    InvalidCadence(u32),
    /// Brightness must be 0-15
    InvalidBrightness(u8),
    /// Character gap must be at most 8 columns
    InvalidCharGap(u8),
    /// End gap must be 1-64 columns
    InvalidEndGap(u8),
    /// Refresh period must be 100-60000 ms
    InvalidRefresh(u32),
    /// Heartbeat interval must be nonzero
    InvalidHeartbeat,
    /// Default message must not be empty
    EmptyMessage,
}

impl DisplayConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scroll = &self.scroll;
        if !(1..=1000).contains(&scroll.cadence_ms) {
            return Err(ConfigError::InvalidCadence(scroll.cadence_ms));
        }
        if scroll.char_gap_columns > 8 {
            return Err(ConfigError::InvalidCharGap(scroll.char_gap_columns));
        }
        if !(1..=64).contains(&scroll.end_gap_columns) {
            return Err(ConfigError::InvalidEndGap(scroll.end_gap_columns));
        }
        if scroll.default_message.is_empty() {
            return Err(ConfigError::EmptyMessage);
        }
        if self.display.brightness > MAX_BRIGHTNESS {
            return Err(ConfigError::InvalidBrightness(self.display.brightness));
        }
        if !(100..=60_000).contains(&self.clock.refresh_ms) {
            return Err(ConfigError::InvalidRefresh(self.clock.refresh_ms));
        }
        if self.link.heartbeat_interval_s == 0 {
            return Err(ConfigError::InvalidHeartbeat);
        }
        Ok(())
    }

    /// Boot brightness, clamped to the valid range
    pub fn brightness(&self) -> Brightness {
        Brightness::new(self.display.brightness).unwrap_or(Brightness::MAX)
    }
}
