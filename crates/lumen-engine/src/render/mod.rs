//! GPU side of the renderer.
//!
//! [`WgpuCompute`] is the wgpu implementation of
//! [`ComputeBackend`](crate::dispatch::ComputeBackend): it owns the device
//! buffers and the path-tracing pipeline. [`PresentRenderer`] draws the
//! presentation buffer to the swapchain while the display pipeline owns it.
//!
//! Each renderer owns its GPU resources and builds them lazily.

mod common;
mod compute;
mod ctx;
mod present;

pub use compute::{KernelSource, PresentationView, WgpuCompute, KERNEL_WORKGROUP_SIZE};
pub use ctx::{RenderCtx, RenderTarget};
pub use present::PresentRenderer;
