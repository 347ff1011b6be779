//! Core engine-facing contracts.
//!
//! The stable interface between the runtime (platform loop) and the viewer:
//! an [`App`] receives one [`FrameCtx`] per redraw.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
