//! Scroll zone task
//!
//! Runs the scroll engine forever on the right half of the chain.

use defmt::*;
use embassy_time::Delay;

use classplate_core::{BuiltinFont, ScrollEngine, ScrollSettings};

use crate::{Chain, DisplayStateCell};

/// Scroll task - one column per cadence tick, message swaps between passes
#[embassy_executor::task]
pub async fn scroll_task(
    state: &'static DisplayStateCell,
    chain: &'static Chain,
    settings: ScrollSettings,
) {
    info!(
        "Scroll task started ({}ms cadence, {} column end gap)",
        settings.cadence_ms, settings.end_gap_columns
    );

    let mut engine = ScrollEngine::new(BuiltinFont, settings);
    let mut writer = chain;
    engine.run(state, &mut writer, &mut Delay).await
}
