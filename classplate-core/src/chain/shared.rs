//! Transport lock
//!
//! The clock path and the scroll path both write to the same chain. A
//! burst must never be interleaved with another, so every writer goes
//! through one blocking mutex that is held for exactly one burst. This
//! lock is independent of the display state lock.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::{MatrixWriter, Register};
use crate::layout::ModuleIndex;

/// A chain writer shared between tasks
pub struct SharedChain<M: RawMutex, W> {
    inner: Mutex<M, RefCell<W>>,
}

impl<M: RawMutex, W> SharedChain<M, W> {
    pub const fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(writer)),
        }
    }

    /// Run `f` with exclusive access to the underlying writer
    ///
    /// Keep `f` short: every other writer waits for it.
    pub fn with<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<M: RawMutex, W: MatrixWriter> MatrixWriter for &SharedChain<M, W> {
    type Error = W::Error;

    fn write_all(&mut self, register: Register, data: u8) -> Result<(), Self::Error> {
        self.with(|writer| writer.write_all(register, data))
    }

    fn write_one(
        &mut self,
        module: ModuleIndex,
        register: Register,
        data: u8,
    ) -> Result<(), Self::Error> {
        self.with(|writer| writer.write_one(module, register, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::FrameRecorder;
    use crate::chain::Frame;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_handles_share_one_chain() {
        let shared = SharedChain::<NoopRawMutex, _>::new(FrameRecorder::new());
        let mut clock_path = &shared;
        let mut scroll_path = &shared;
        let module = ModuleIndex::new(6).unwrap();

        clock_path.write_all(Register::Intensity, 3).unwrap();
        scroll_path.write_one(module, Register::Row0, 0xFF).unwrap();

        shared.with(|recorder| {
            assert_eq!(
                recorder.frames,
                vec![
                    Frame::broadcast(Register::Intensity, 3),
                    Frame::addressed(module, Register::Row0, 0xFF),
                ]
            );
        });
    }
}
