//! MAX7219 chain transport
//!
//! Every chip in the chain shifts its 16-bit input through to the next
//! chip, and all chips latch together on the rising edge of LOAD/CS. A
//! burst therefore always carries exactly one (register, data) word per
//! chip. Chips that should not change receive the no-op word.
//!
//! - [`Frame`] builds the per-chip words for one burst
//! - [`MatrixWriter`] is the seam every renderer writes through
//! - [`MatrixChain`] drives the bus, [`SharedChain`] serializes access

mod max7219;
mod shared;

pub use max7219::{MatrixChain, LATCH_DELAY_US};
pub use shared::SharedChain;

use crate::layout::{ModuleIndex, FRAME_BYTES, NUM_MODULES, ROWS};

/// MAX7219 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    NoOp = 0x00,
    Row0 = 0x01,
    Row1 = 0x02,
    Row2 = 0x03,
    Row3 = 0x04,
    Row4 = 0x05,
    Row5 = 0x06,
    Row6 = 0x07,
    Row7 = 0x08,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

impl Register {
    const ROWS: [Register; ROWS] = [
        Register::Row0,
        Register::Row1,
        Register::Row2,
        Register::Row3,
        Register::Row4,
        Register::Row5,
        Register::Row6,
        Register::Row7,
    ];

    /// Row-select register for a row index (0 = top)
    ///
    /// Indices past the last row wrap, callers iterate `0..ROWS`.
    pub const fn row(index: usize) -> Register {
        Self::ROWS[index % ROWS]
    }

    /// Register address on the wire
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// One (register, data) pair, as shifted into a single chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameWord {
    pub register: u8,
    pub data: u8,
}

impl FrameWord {
    /// Inert word for chips that are not addressed
    pub const NOOP: FrameWord = FrameWord {
        register: Register::NoOp as u8,
        data: 0,
    };

    pub const fn new(register: Register, data: u8) -> Self {
        Self {
            register: register.addr(),
            data,
        }
    }

    pub const fn is_noop(self) -> bool {
        self.register == Register::NoOp as u8
    }
}

/// One burst: a word for every chip in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    words: [FrameWord; NUM_MODULES],
}

impl Frame {
    /// Same word for every chip (global configuration)
    pub const fn broadcast(register: Register, data: u8) -> Self {
        Self {
            words: [FrameWord::new(register, data); NUM_MODULES],
        }
    }

    /// Real word for `module`, no-op for everyone else
    pub fn addressed(module: ModuleIndex, register: Register, data: u8) -> Self {
        let mut words = [FrameWord::NOOP; NUM_MODULES];
        words[module.index()] = FrameWord::new(register, data);
        Self { words }
    }

    /// Word destined for a chain position
    pub fn word(&self, module: ModuleIndex) -> FrameWord {
        self.words[module.index()]
    }

    pub fn words(&self) -> &[FrameWord; NUM_MODULES] {
        &self.words
    }

    /// Serialize for the bus: word `m` occupies bytes `2m` (register)
    /// and `2m + 1` (data), each sent MSB first
    pub fn to_bytes(&self) -> [u8; FRAME_BYTES] {
        let mut bytes = [0u8; FRAME_BYTES];
        for (pair, word) in bytes.chunks_exact_mut(2).zip(self.words.iter()) {
            pair[0] = word.register;
            pair[1] = word.data;
        }
        bytes
    }
}

/// Transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChainError<E> {
    /// The bus failed during a burst; the burst is lost
    Bus(E),
}

/// Something that can put register writes onto the chain
///
/// Both calls block until the burst has latched. A returned error means
/// the whole burst failed; implementations never retry.
pub trait MatrixWriter {
    type Error;

    /// Write the same register on every chip
    fn write_all(&mut self, register: Register, data: u8) -> Result<(), Self::Error>;

    /// Write a register on one chip, leaving the others untouched
    fn write_one(
        &mut self,
        module: ModuleIndex,
        register: Register,
        data: u8,
    ) -> Result<(), Self::Error>;
}

impl<T: MatrixWriter + ?Sized> MatrixWriter for &mut T {
    type Error = T::Error;

    fn write_all(&mut self, register: Register, data: u8) -> Result<(), Self::Error> {
        T::write_all(self, register, data)
    }

    fn write_one(
        &mut self,
        module: ModuleIndex,
        register: Register,
        data: u8,
    ) -> Result<(), Self::Error> {
        T::write_one(self, module, register, data)
    }
}

/// Host-side chain model for tests
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Register file of one simulated chip
    pub type ChipRegisters = [u8; 16];

    /// Records every frame and applies it to a simulated chain
    #[derive(Debug, Default)]
    pub struct FrameRecorder {
        pub frames: Vec<Frame>,
        pub chips: [ChipRegisters; NUM_MODULES],
        /// Fail every burst once this many frames were recorded
        pub fail_after: Option<usize>,
    }

    impl FrameRecorder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Rows currently latched in a chip
        pub fn rows(&self, module: ModuleIndex) -> [u8; ROWS] {
            let mut rows = [0u8; ROWS];
            rows.copy_from_slice(&self.chips[module.index()][1..=ROWS]);
            rows
        }

        pub fn register(&self, module: ModuleIndex, register: Register) -> u8 {
            self.chips[module.index()][register.addr() as usize]
        }

        fn apply(&mut self, frame: Frame) -> Result<(), ()> {
            if self.fail_after.is_some_and(|limit| self.frames.len() >= limit) {
                return Err(());
            }
            for (chip, word) in self.chips.iter_mut().zip(frame.words()) {
                if !word.is_noop() {
                    chip[word.register as usize] = word.data;
                }
            }
            self.frames.push(frame);
            Ok(())
        }
    }

    impl MatrixWriter for FrameRecorder {
        type Error = ();

        fn write_all(&mut self, register: Register, data: u8) -> Result<(), ()> {
            self.apply(Frame::broadcast(register, data))
        }

        fn write_one(&mut self, module: ModuleIndex, register: Register, data: u8) -> Result<(), ()> {
            self.apply(Frame::addressed(module, register, data))
        }
    }
}
