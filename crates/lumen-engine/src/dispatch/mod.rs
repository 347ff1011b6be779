//! Per-frame dispatch orchestration.
//!
//! The compute device is reached only through [`ComputeBackend`], a narrow
//! capability (upload, clear, set scalars, acquire/dispatch/release). The real
//! implementation lives in `render::WgpuCompute`; tests substitute a recorder.
//!
//! Each frame issues, in this fixed order:
//! 1. primitive upload
//! 2. accumulation clear, when the controller signals a reset
//! 3. camera record upload
//! 4. scalar parameters (frame index, seeds, mixed hash)
//! 5. acquire presentation buffer → dispatch → release

mod backend;
mod error;
mod orchestrator;
mod presentation;
mod seeds;
mod work_size;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::{
    kernel_args, BufferLayout, ComputeBackend, DeviceBuffer, FrameParams, KernelArg,
    KERNEL_ARG_COUNT,
};
pub use error::DeviceError;
pub use orchestrator::{FrameDispatcher, FrameReport};
pub use presentation::{Ownership, PresentationLease};
pub use seeds::{derive_frame_seeds, mix, FrameSeeds, SeedSource};
pub use work_size::{compute_work_size, WorkSize, MAX_GROUPS_PER_DIMENSION};
