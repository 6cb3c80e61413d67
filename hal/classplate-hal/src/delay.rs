//! Blocking delay abstraction
//!
//! Used for the microsecond-scale settle times between bus bursts.
//! Long waits belong in async tasks, not here.

/// Busy-wait delay provider
pub trait DelayUs {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: DelayUs + ?Sized> DelayUs for &mut T {
    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }
}
