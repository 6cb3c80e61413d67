//! Bridge UART transmit task
//!
//! Sends command replies and the periodic online heartbeat to the bridge.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use classplate_protocol::DeviceMessage;

use crate::channels::REPLY_CHANNEL;
use crate::DisplayStateCell;

/// Link TX task - sends frames to the bridge
#[embassy_executor::task]
pub async fn link_tx_task(
    mut tx: BufferedUartTx,
    state: &'static DisplayStateCell,
    heartbeat_interval_s: u32,
) {
    info!("Link TX task started");

    let mut heartbeat = Ticker::every(Duration::from_secs(heartbeat_interval_s as u64));

    // Announce ourselves right away so the bridge sees us online after a reset
    send_message(&mut tx, status(state)).await;

    loop {
        let msg = match select(REPLY_CHANNEL.receive(), heartbeat.next()).await {
            Either::First(reply) => reply,
            Either::Second(()) => status(state),
        };
        send_message(&mut tx, msg).await;
    }
}

fn status(state: &DisplayStateCell) -> DeviceMessage {
    DeviceMessage::Status {
        online: true,
        brightness: state.brightness().value(),
    }
}

/// Encode and write one message
async fn send_message(tx: &mut BufferedUartTx, msg: DeviceMessage) {
    let bytes = match msg.to_frame().and_then(|frame| frame.encode_to_vec()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to encode {:?}: {:?}", msg, e);
            return;
        }
    };

    if let Err(e) = tx.write_all(&bytes).await {
        warn!("Failed to send {:?}: {:?}", msg, e);
    } else {
        trace!("Sent {:?}", msg);
    }
}
