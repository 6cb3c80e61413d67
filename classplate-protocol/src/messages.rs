//! Message types for the bridge link
//!
//! Message types are divided into two categories:
//! - Bridge → Plate: content updates, heartbeat requests
//! - Plate → Bridge: acknowledgements, heartbeat responses, status

use heapless::String;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Bridge → Plate
pub const MSG_PING: u8 = 0x01;
pub const MSG_SET_MESSAGE: u8 = 0x10;
pub const MSG_SET_BRIGHTNESS: u8 = 0x11;
pub const MSG_SET_TIME: u8 = 0x12;
pub const MSG_SET_TEMPERATURE: u8 = 0x13;

// Message type IDs: Plate → Bridge
pub const MSG_PONG: u8 = 0x81;
pub const MSG_STATUS: u8 = 0x82;
pub const MSG_ACK: u8 = 0x83;
pub const MSG_NACK: u8 = 0x84;

/// Whether a TYPE byte names a message of this link, in either direction
pub const fn is_known_type(msg_type: u8) -> bool {
    matches!(
        msg_type,
        MSG_PING
            | MSG_SET_MESSAGE
            | MSG_SET_BRIGHTNESS
            | MSG_SET_TIME
            | MSG_SET_TEMPERATURE
            | MSG_PONG
            | MSG_STATUS
            | MSG_ACK
            | MSG_NACK
    )
}

/// Temperature value the bridge sends when the weather lookup failed
pub const TEMPERATURE_UNKNOWN: i16 = -1;

/// Commands sent by the bridge host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Heartbeat request
    Ping,
    /// Replace the scrolling message (UTF-8, not NUL terminated)
    SetMessage(String<MAX_PAYLOAD_SIZE>),
    /// Set display brightness (0-15)
    SetBrightness(u8),
    /// Set the wall clock (24-hour)
    SetTime { hours: u8, minutes: u8, seconds: u8 },
    /// Report outdoor temperature in whole °C, or [`TEMPERATURE_UNKNOWN`]
    SetTemperature(i16),
}

impl HostCommand {
    /// Parse a command from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let payload = frame.payload.as_slice();
        match frame.msg_type {
            MSG_PING => Ok(HostCommand::Ping),
            MSG_SET_MESSAGE => {
                let text = core::str::from_utf8(payload).map_err(|_| FrameError::InvalidFrame)?;
                let mut message = String::new();
                message
                    .push_str(text)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(HostCommand::SetMessage(message))
            }
            MSG_SET_BRIGHTNESS => match payload {
                [level] => Ok(HostCommand::SetBrightness(*level)),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_SET_TIME => match payload {
                [hours, minutes, seconds] => Ok(HostCommand::SetTime {
                    hours: *hours,
                    minutes: *minutes,
                    seconds: *seconds,
                }),
                _ => Err(FrameError::InvalidFrame),
            },
            MSG_SET_TEMPERATURE => match payload {
                [hi, lo] => Ok(HostCommand::SetTemperature(i16::from_be_bytes([*hi, *lo]))),
                _ => Err(FrameError::InvalidFrame),
            },
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this command into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostCommand::Ping => Ok(Frame::empty(MSG_PING)),
            HostCommand::SetMessage(text) => Frame::new(MSG_SET_MESSAGE, text.as_bytes()),
            HostCommand::SetBrightness(level) => Frame::new(MSG_SET_BRIGHTNESS, &[*level]),
            HostCommand::SetTime {
                hours,
                minutes,
                seconds,
            } => Frame::new(MSG_SET_TIME, &[*hours, *minutes, *seconds]),
            HostCommand::SetTemperature(value) => {
                Frame::new(MSG_SET_TEMPERATURE, &value.to_be_bytes())
            }
        }
    }

    /// Wire type of this command
    pub fn msg_type(&self) -> u8 {
        match self {
            HostCommand::Ping => MSG_PING,
            HostCommand::SetMessage(_) => MSG_SET_MESSAGE,
            HostCommand::SetBrightness(_) => MSG_SET_BRIGHTNESS,
            HostCommand::SetTime { .. } => MSG_SET_TIME,
            HostCommand::SetTemperature(_) => MSG_SET_TEMPERATURE,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HostCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            HostCommand::Ping => defmt::write!(f, "Ping"),
            HostCommand::SetMessage(text) => {
                defmt::write!(f, "SetMessage({=str})", text.as_str())
            }
            HostCommand::SetBrightness(level) => defmt::write!(f, "SetBrightness({})", level),
            HostCommand::SetTime {
                hours,
                minutes,
                seconds,
            } => defmt::write!(f, "SetTime({}:{}:{})", hours, minutes, seconds),
            HostCommand::SetTemperature(value) => defmt::write!(f, "SetTemperature({})", value),
        }
    }
}

/// Messages sent by the plate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Heartbeat response
    Pong,
    /// Periodic online report
    Status { online: bool, brightness: u8 },
    /// Command accepted
    Ack { msg_type: u8 },
    /// Command rejected (malformed or out of range)
    Nack { msg_type: u8 },
}

impl DeviceMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceMessage::Pong => Ok(Frame::empty(MSG_PONG)),
            DeviceMessage::Status { online, brightness } => {
                Frame::new(MSG_STATUS, &[*online as u8, *brightness])
            }
            DeviceMessage::Ack { msg_type } => Frame::new(MSG_ACK, &[*msg_type]),
            DeviceMessage::Nack { msg_type } => Frame::new(MSG_NACK, &[*msg_type]),
        }
    }

    /// Parse a message from a frame (bridge side, and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match (frame.msg_type, frame.payload.as_slice()) {
            (MSG_PONG, []) => Ok(DeviceMessage::Pong),
            (MSG_STATUS, [online, brightness]) => Ok(DeviceMessage::Status {
                online: *online != 0,
                brightness: *brightness,
            }),
            (MSG_ACK, [msg_type]) => Ok(DeviceMessage::Ack {
                msg_type: *msg_type,
            }),
            (MSG_NACK, [msg_type]) => Ok(DeviceMessage::Nack {
                msg_type: *msg_type,
            }),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_message_from_frame() {
        let frame = Frame::new(MSG_SET_MESSAGE, b"HELLO LPU!").unwrap();
        match HostCommand::from_frame(&frame).unwrap() {
            HostCommand::SetMessage(text) => assert_eq!(text.as_str(), "HELLO LPU!"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_set_message_rejects_invalid_utf8() {
        let frame = Frame::new(MSG_SET_MESSAGE, &[0xC3, 0x28]).unwrap();
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_set_brightness_requires_one_byte() {
        let frame = Frame::new(MSG_SET_BRIGHTNESS, &[9]).unwrap();
        assert_eq!(
            HostCommand::from_frame(&frame),
            Ok(HostCommand::SetBrightness(9))
        );

        let frame = Frame::new(MSG_SET_BRIGHTNESS, &[9, 9]).unwrap();
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_set_time_from_frame() {
        let frame = Frame::new(MSG_SET_TIME, &[9, 45, 30]).unwrap();
        assert_eq!(
            HostCommand::from_frame(&frame),
            Ok(HostCommand::SetTime {
                hours: 9,
                minutes: 45,
                seconds: 30
            })
        );
    }

    #[test]
    fn test_temperature_sentinel_survives_encoding() {
        let frame = HostCommand::SetTemperature(TEMPERATURE_UNKNOWN)
            .to_frame()
            .unwrap();
        assert_eq!(frame.payload.as_slice(), &[0xFF, 0xFF]);
        assert_eq!(
            HostCommand::from_frame(&frame),
            Ok(HostCommand::SetTemperature(-1))
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let frame = Frame::empty(0x7F);
        assert_eq!(
            HostCommand::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_status_frame_layout() {
        let frame = DeviceMessage::Status {
            online: true,
            brightness: 15,
        }
        .to_frame()
        .unwrap();
        assert_eq!(frame.msg_type, MSG_STATUS);
        assert_eq!(frame.payload.as_slice(), &[1, 15]);
    }

    #[test]
    fn test_device_message_roundtrip() {
        let original = DeviceMessage::Nack {
            msg_type: MSG_SET_BRIGHTNESS,
        };
        let frame = original.to_frame().unwrap();
        assert_eq!(DeviceMessage::from_frame(&frame), Ok(original));
    }
}
