//! Accumulation history bookkeeping.
//!
//! The device keeps a per-pixel running sum of samples. This module decides,
//! once per frame, whether that history is still valid and which frame index
//! the kernel sees.

mod controller;

pub use controller::{AccumPhase, AccumulationController, FrameTick, ResetReason};
