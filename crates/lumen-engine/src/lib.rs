//! Lumen engine crate.
//!
//! Host side of an interactive progressive path tracer: the orbit camera,
//! scene snapshot, accumulation state and per-frame dispatch live in the
//! device-independent modules; `device`, `render` and `window` realize them
//! on wgpu and winit.

pub mod math;
pub mod camera;
pub mod scene;
pub mod accum;
pub mod dispatch;
pub mod session;

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod render;
