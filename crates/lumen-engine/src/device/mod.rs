//! GPU device + surface management.
//!
//! Creates the wgpu Instance/Adapter/Device/Queue for the window, configures
//! the swapchain and hands out per-frame encoders. Compute work shares the
//! same device and queue.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
