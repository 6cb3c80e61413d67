//! Busy-wait delay backed by the embassy time driver

use embassy_time::{block_for, Duration};

/// Blocking microsecond delay
///
/// Spins on the time driver; only suitable for the few microseconds of
/// latch time after a chain burst.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyWait;

impl classplate_hal::DelayUs for BusyWait {
    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }
}
