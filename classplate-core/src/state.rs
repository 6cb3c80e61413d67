//! Shared display state
//!
//! The mailbox between the inbound link and the scroll engine. The link
//! writes a new message or brightness and sets the dirty flag; the scroll
//! engine takes the update at the start of its next pass. All access goes
//! through one blocking mutex, held only long enough to copy the fields.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum message length in bytes
pub const MAX_MESSAGE_LEN: usize = 128;

/// Highest intensity level of the MAX7219
pub const MAX_BRIGHTNESS: u8 = 15;

/// Bounded message text
pub type MessageText = String<MAX_MESSAGE_LEN>;

/// Copy `text` into a [`MessageText`], dropping whole characters that do
/// not fit
pub fn truncate_message(text: &str) -> MessageText {
    let mut message = MessageText::new();
    for c in text.chars() {
        if message.push(c).is_err() {
            break;
        }
    }
    message
}

/// Intensity level, `0..=15`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Brightness(u8);

impl Brightness {
    pub const MAX: Brightness = Brightness(MAX_BRIGHTNESS);

    pub const fn new(level: u8) -> Option<Self> {
        if level <= MAX_BRIGHTNESS {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

/// Contents of the mailbox
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub message: MessageText,
    pub brightness: Brightness,
    /// Set by writers, cleared when the scroll engine takes the update
    pub dirty: bool,
}

/// Copy of the state handed to the scroll engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub message: MessageText,
    pub brightness: Brightness,
}

/// Lock-protected display state shared between tasks
pub struct SharedDisplayState<M: RawMutex> {
    inner: Mutex<M, RefCell<DisplayState>>,
}

impl<M: RawMutex> SharedDisplayState<M> {
    /// Create the state with its boot content
    ///
    /// Starts dirty so the first pass picks the content up.
    pub fn new(message: &str, brightness: Brightness) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(DisplayState {
                message: truncate_message(message),
                brightness,
                dirty: true,
            })),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut DisplayState) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Replace message and brightness together
    pub fn post(&self, text: &str, brightness: Brightness) {
        self.update(|state| {
            state.message = truncate_message(text);
            state.brightness = brightness;
            state.dirty = true;
        });
    }

    /// Replace the message, keeping the brightness
    pub fn set_message(&self, text: &str) {
        self.update(|state| {
            state.message = truncate_message(text);
            state.dirty = true;
        });
    }

    /// Replace the brightness, keeping the message
    pub fn set_brightness(&self, brightness: Brightness) {
        self.update(|state| {
            state.brightness = brightness;
            state.dirty = true;
        });
    }

    /// Take the pending update, clearing the dirty flag
    pub fn take_update(&self) -> Option<DisplaySnapshot> {
        self.update(|state| {
            if !state.dirty {
                return None;
            }
            state.dirty = false;
            Some(DisplaySnapshot {
                message: state.message.clone(),
                brightness: state.brightness,
            })
        })
    }

    /// Current content, without touching the dirty flag
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.update(|state| DisplaySnapshot {
            message: state.message.clone(),
            brightness: state.brightness,
        })
    }

    pub fn brightness(&self) -> Brightness {
        self.update(|state| state.brightness)
    }

    pub fn is_dirty(&self) -> bool {
        self.update(|state| state.dirty)
    }
}
