//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals and
//! the shared display state.

pub mod clock;
pub mod link_rx;
pub mod link_tx;
pub mod scroll;

pub use clock::clock_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use scroll::scroll_task;
