//! Time subsystem.
//!
//! Frame timing and throughput reporting, decoupled from the runtime so both
//! can be driven from tests with synthetic instants.

mod frame_clock;
mod throughput;

pub use frame_clock::{FrameClock, FrameTime};
pub use throughput::{Throughput, ThroughputMeter};
