//! Bridge UART receive task
//!
//! Receives frames from the bridge and applies content updates.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use classplate_core::{BuiltinFont, Brightness, ClockTime, Display};
use classplate_protocol::{DeviceMessage, FrameError, FrameParser, HostCommand};

use crate::channels::{REPLY_CHANNEL, TEMPERATURE_UPDATE, TIME_UPDATE};
use crate::{Chain, DisplayStateCell};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn link_rx_task(
    mut rx: BufferedUartRx,
    state: &'static DisplayStateCell,
    chain: &'static Chain,
) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];
    let mut display = Display::new(chain, BuiltinFont, state.brightness());

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match HostCommand::from_frame(&frame) {
                            Ok(cmd) => {
                                let reply = handle_command(cmd, state, &mut display);
                                reply_to_bridge(reply);
                            }
                            Err(e) => {
                                warn!("Failed to parse host command: {:?}", e);
                                reply_to_bridge(DeviceMessage::Nack {
                                    msg_type: frame.msg_type,
                                });
                            }
                        },
                        Ok(None) => {
                            // Need more bytes
                        }
                        Err(FrameError::UnknownType(msg_type)) => {
                            warn!("Unknown message type 0x{:02x}", msg_type);
                            reply_to_bridge(DeviceMessage::Nack { msg_type });
                        }
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Apply one command and build the reply
fn handle_command(
    cmd: HostCommand,
    state: &DisplayStateCell,
    display: &mut Display<&'static Chain, BuiltinFont>,
) -> DeviceMessage {
    let msg_type = cmd.msg_type();
    let ack = DeviceMessage::Ack { msg_type };
    let nack = DeviceMessage::Nack { msg_type };

    match cmd {
        HostCommand::Ping => {
            trace!("PING received");
            DeviceMessage::Pong
        }
        HostCommand::SetMessage(text) => {
            debug!("New message: {} bytes", text.len());
            // Picked up by the scroll task at its next pass
            state.set_message(&text);
            ack
        }
        HostCommand::SetBrightness(level) => {
            let Some(brightness) = Brightness::new(level) else {
                warn!("Brightness {} out of range", level);
                return nack;
            };
            state.set_brightness(brightness);
            if let Err(e) = display.apply_brightness(brightness) {
                warn!("Failed to apply brightness: {:?}", Debug2Format(&e));
            }
            ack
        }
        HostCommand::SetTime {
            hours,
            minutes,
            seconds,
        } => match ClockTime::new(hours, minutes, seconds) {
            Some(time) => {
                debug!("Time sync {:02}:{:02}:{:02}", hours, minutes, seconds);
                TIME_UPDATE.signal(time);
                ack
            }
            None => {
                warn!("Invalid time {}:{}:{}", hours, minutes, seconds);
                nack
            }
        },
        HostCommand::SetTemperature(value) => {
            debug!("Temperature report: {}", value);
            TEMPERATURE_UPDATE.signal(value);
            ack
        }
    }
}

/// Queue a reply for the TX task, dropping if full
fn reply_to_bridge(reply: DeviceMessage) {
    if REPLY_CHANNEL.try_send(reply).is_err() {
        warn!("Reply channel full, dropping reply");
    }
}
