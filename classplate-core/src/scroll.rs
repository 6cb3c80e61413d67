//! Scroll engine
//!
//! Runs the message across the scroll zone one column at a time. A pass
//! looks like this:
//!
//! ```text
//! start of pass ──► take pending update (short lock) ──► apply brightness
//!       ▲                                                    │
//!       │                                                    ▼
//!  trailing gap ◄── per char: 5 glyph columns + gap ◄── column loop
//! ```
//!
//! Each column is pushed into the [`ScrollBuffer`], the whole zone is
//! transmitted, and the engine waits one cadence. New content is only
//! picked up at the start of a pass.

use core::iter::Peekable;
use core::str::Chars;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::buffer::ScrollBuffer;
use crate::chain::{MatrixWriter, Register};
use crate::glyph::{scroll_columns, GlyphDictionary, GLYPH_COLUMNS};
use crate::state::{Brightness, MessageText, SharedDisplayState};

/// Column timing and spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScrollSettings {
    /// Delay after each column
    pub cadence_ms: u32,
    /// Blank columns between two characters
    pub char_gap_columns: u8,
    /// Blank columns after the last character
    pub end_gap_columns: u8,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            cadence_ms: 80,
            char_gap_columns: 2,
            end_gap_columns: 16,
        }
    }
}

/// What one pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PassSummary {
    /// Column pushes performed
    pub columns: u32,
    /// Characters in the message scrolled
    pub message_len: usize,
    /// A pending update was taken at the start of the pass
    pub updated: bool,
}

/// Column sequence of one pass
pub struct PassColumns<'a, G> {
    glyphs: &'a G,
    chars: Peekable<Chars<'a>>,
    glyph: [u8; GLYPH_COLUMNS],
    next_col: usize,
    gap: u8,
    trailing: u8,
    char_gap: u8,
}

impl<'a, G: GlyphDictionary> PassColumns<'a, G> {
    pub fn new(glyphs: &'a G, message: &'a str, settings: &ScrollSettings) -> Self {
        Self {
            glyphs,
            chars: message.chars().peekable(),
            glyph: [0; GLYPH_COLUMNS],
            next_col: GLYPH_COLUMNS,
            gap: 0,
            trailing: settings.end_gap_columns,
            char_gap: settings.char_gap_columns,
        }
    }
}

impl<G: GlyphDictionary> Iterator for PassColumns<'_, G> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if self.next_col < GLYPH_COLUMNS {
                let column = self.glyph[self.next_col];
                self.next_col += 1;
                if self.next_col == GLYPH_COLUMNS && self.chars.peek().is_some() {
                    self.gap = self.char_gap;
                }
                return Some(column);
            }
            if self.gap > 0 {
                self.gap -= 1;
                return Some(0);
            }
            if let Some(c) = self.chars.next() {
                self.glyph = scroll_columns(self.glyphs, c);
                self.next_col = 0;
                continue;
            }
            if self.trailing > 0 {
                self.trailing -= 1;
                return Some(0);
            }
            return None;
        }
    }
}

/// Scroll zone state machine
pub struct ScrollEngine<G> {
    glyphs: G,
    settings: ScrollSettings,
    buffer: ScrollBuffer,
    message: MessageText,
    brightness: Option<Brightness>,
    /// Taken from the state but not yet latched by the chain
    pending_brightness: Option<Brightness>,
}

impl<G: GlyphDictionary> ScrollEngine<G> {
    pub fn new(glyphs: G, settings: ScrollSettings) -> Self {
        Self {
            glyphs,
            settings,
            buffer: ScrollBuffer::new(),
            message: MessageText::new(),
            brightness: None,
            pending_brightness: None,
        }
    }

    /// Message of the current (or last) pass
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Brightness last latched by the chain, `None` before the first pass
    pub fn brightness(&self) -> Option<Brightness> {
        self.brightness
    }

    pub fn settings(&self) -> &ScrollSettings {
        &self.settings
    }

    pub fn buffer(&self) -> &ScrollBuffer {
        &self.buffer
    }

    /// Take a pending update from the shared state
    ///
    /// The state lock is released before the brightness broadcast, so the
    /// inbound writer is never blocked behind the chain. A brightness whose
    /// broadcast failed stays pending and is sent again at the start of
    /// every following pass until the chain accepts it. Returns whether an
    /// update was taken.
    pub fn begin_pass<M, W>(
        &mut self,
        state: &SharedDisplayState<M>,
        writer: &mut W,
    ) -> Result<bool, W::Error>
    where
        M: RawMutex,
        W: MatrixWriter,
    {
        let updated = match state.take_update() {
            Some(update) => {
                self.message = update.message;
                self.pending_brightness = Some(update.brightness);
                true
            }
            None => false,
        };

        if let Some(brightness) = self.pending_brightness {
            writer.write_all(Register::Intensity, brightness.value())?;
            self.pending_brightness = None;
            self.brightness = Some(brightness);
        }
        Ok(updated)
    }

    /// Columns of a pass over the working message
    pub fn columns(&self) -> PassColumns<'_, G> {
        PassColumns::new(&self.glyphs, &self.message, &self.settings)
    }

    /// Push one column and send the scroll zone
    pub fn step<W: MatrixWriter>(&mut self, column: u8, writer: &mut W) -> Result<(), W::Error> {
        self.buffer.push_column(column);
        self.buffer.transmit(writer)
    }

    /// Run one full pass
    pub async fn run_pass<M, W, D>(
        &mut self,
        state: &SharedDisplayState<M>,
        writer: &mut W,
        delay: &mut D,
    ) -> Result<PassSummary, W::Error>
    where
        M: RawMutex,
        W: MatrixWriter,
        D: DelayNs,
    {
        let updated = self.begin_pass(state, writer)?;
        let cadence_ms = self.settings.cadence_ms;
        let mut columns = 0;

        for column in PassColumns::new(&self.glyphs, &self.message, &self.settings) {
            self.buffer.push_column(column);
            self.buffer.transmit(writer)?;
            delay.delay_ms(cadence_ms).await;
            columns += 1;
        }

        Ok(PassSummary {
            columns,
            message_len: self.message.chars().count(),
            updated,
        })
    }

    /// Scroll forever
    ///
    /// A transport fault abandons the current pass; the engine waits one
    /// cadence and starts a new pass instead of spinning on the error.
    pub async fn run<M, W, D>(&mut self, state: &SharedDisplayState<M>, writer: &mut W, delay: &mut D) -> !
    where
        M: RawMutex,
        W: MatrixWriter,
        D: DelayNs,
    {
        loop {
            match self.run_pass(state, writer, delay).await {
                Ok(_summary) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!(
                        "Scroll pass done: {} columns, {} chars",
                        _summary.columns,
                        _summary.message_len
                    );
                }
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Chain fault during scroll pass, restarting");
                    delay.delay_ms(self.settings.cadence_ms).await;
                }
            }
        }
    }
}
