//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Display content itself travels through the shared display state; these
//! carry clock inputs and link replies.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use classplate_core::ClockTime;
use classplate_protocol::DeviceMessage;

/// Channel capacity for replies to the bridge
const REPLY_CHANNEL_SIZE: usize = 8;

/// Replies (Pong/Ack/Nack) queued by the RX task for the TX task
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, DeviceMessage, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Time received from the bridge (latest wins)
pub static TIME_UPDATE: Signal<CriticalSectionRawMutex, ClockTime> = Signal::new();

/// Outdoor temperature received from the bridge, whole °C or -1 when unknown
pub static TEMPERATURE_UPDATE: Signal<CriticalSectionRawMutex, i16> = Signal::new();
