//! Time and temperature sources
//!
//! The clock path pulls both values once per tick. Either source may have
//! nothing valid to offer (time never synced, weather lookup failed or
//! too old); the display then keeps what it last showed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Temperature value meaning "unknown"
pub const TEMPERATURE_SENTINEL: i16 = -1;

/// 24-hour wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockTime {
    /// Validated time
    pub const fn new(hours: u8, minutes: u8, seconds: u8) -> Option<Self> {
        let time = Self {
            hours,
            minutes,
            seconds,
        };
        if time.is_valid() {
            Some(time)
        } else {
            None
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.hours < 24 && self.minutes < 60 && self.seconds < 60
    }

    /// Advance by one second, wrapping at midnight
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds < 60 {
            return;
        }
        self.seconds = 0;
        self.minutes += 1;
        if self.minutes < 60 {
            return;
        }
        self.minutes = 0;
        self.hours = (self.hours + 1) % 24;
    }
}

/// Something that knows the time of day
pub trait TimeSource {
    /// Current time, `None` when not synchronized
    fn now(&self) -> Option<ClockTime>;
}

/// Something that knows the outdoor temperature
pub trait TemperatureSource {
    /// Whole °C, [`TEMPERATURE_SENTINEL`] when unknown
    fn temperature(&self) -> i16;
}

/// Locally kept time, synchronized by the bridge and advanced every second
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock {
    time: Option<ClockTime>,
}

impl WallClock {
    pub const fn new() -> Self {
        Self { time: None }
    }

    /// Synchronize to an externally supplied time
    pub fn set(&mut self, time: ClockTime) {
        self.time = Some(time);
    }

    /// Advance one second (no-op until synchronized)
    pub fn tick(&mut self) {
        if let Some(time) = self.time.as_mut() {
            time.tick();
        }
    }

    pub fn is_synced(&self) -> bool {
        self.time.is_some()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Option<ClockTime> {
        self.time
    }
}

/// Last reported temperature with an age limit
#[derive(Debug, Clone, Copy)]
pub struct TemperatureCache {
    value: i16,
    age_s: u32,
    max_age_s: u32,
}

impl TemperatureCache {
    pub const fn new(max_age_s: u32) -> Self {
        Self {
            value: TEMPERATURE_SENTINEL,
            age_s: 0,
            max_age_s,
        }
    }

    /// Record a fresh reading (the sentinel is stored as-is)
    pub fn report(&mut self, value: i16) {
        self.value = value;
        self.age_s = 0;
    }

    /// Age the reading by one second
    pub fn tick(&mut self) {
        self.age_s = self.age_s.saturating_add(1);
    }

    pub fn is_stale(&self) -> bool {
        self.age_s > self.max_age_s
    }
}

impl TemperatureSource for TemperatureCache {
    fn temperature(&self) -> i16 {
        if self.is_stale() {
            TEMPERATURE_SENTINEL
        } else {
            self.value
        }
    }
}
