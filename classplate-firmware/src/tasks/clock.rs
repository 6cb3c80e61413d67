//! Fixed zone task
//!
//! Keeps the local wall clock and temperature reading, applies updates
//! from the bridge and redraws the left half of the chain every tick.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use classplate_core::{
    Brightness, BuiltinFont, ClockConfig, Display, RenderOutcome, TemperatureCache, WallClock,
};

use crate::channels::{TEMPERATURE_UPDATE, TIME_UPDATE};
use crate::Chain;

/// Clock task - refreshes time and temperature on the fixed zone
#[embassy_executor::task]
pub async fn clock_task(chain: &'static Chain, brightness: Brightness, config: ClockConfig) {
    info!("Clock task started ({}ms refresh)", config.refresh_ms);

    let mut display = Display::new(chain, BuiltinFont, brightness);
    let mut clock = WallClock::new();
    let mut temperature = TemperatureCache::new(config.temperature_max_age_s);

    let mut ticker = Ticker::every(Duration::from_millis(config.refresh_ms as u64));
    let mut last_second = Instant::now();

    loop {
        ticker.next().await;

        // Advance local time by whole elapsed seconds
        let elapsed = last_second.elapsed().as_secs();
        for _ in 0..elapsed {
            clock.tick();
            temperature.tick();
        }
        last_second += Duration::from_secs(elapsed);

        if let Some(time) = TIME_UPDATE.try_take() {
            let first_sync = !clock.is_synced();
            clock.set(time);
            last_second = Instant::now();
            if first_sync {
                // The clock render below replaces the SYNC banner
                info!("Clock synchronized");
            }
        }

        if let Some(value) = TEMPERATURE_UPDATE.try_take() {
            temperature.report(value);
        }

        match display.refresh_fixed_zone(&clock, &temperature) {
            Ok(refresh) => {
                if refresh.clock == RenderOutcome::Skipped && clock.is_synced() {
                    trace!("Clock render skipped");
                }
                if refresh.temperature == RenderOutcome::Skipped {
                    trace!("Temperature unavailable, keeping last reading");
                }
            }
            Err(e) => {
                warn!("Fixed zone refresh failed: {:?}", Debug2Format(&e));
            }
        }
    }
}
