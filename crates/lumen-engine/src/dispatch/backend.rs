use bytemuck::{Pod, Zeroable};

use crate::camera::Resolution;

use super::{DeviceError, WorkSize};

/// Device-resident buffers the kernel reads or writes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceBuffer {
    /// Read-only primitive array.
    Primitives,
    /// Read-only camera record.
    Camera,
    /// Per-pixel running sums, cleared (never reallocated) on reset.
    Accumulation,
    /// Resolved pixels, shared with the display pipeline.
    Presentation,
}

/// Sizes that determine device buffer allocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferLayout {
    pub resolution: Resolution,
    pub primitive_capacity: usize,
}

/// Scalar kernel parameters, uploaded as one 32-byte uniform block.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct FrameParams {
    pub width: u32,
    pub height: u32,
    pub primitive_count: u32,
    pub frame_index: u32,
    pub seed_a: u32,
    pub seed_b: u32,
    pub frame_hash: u32,
    pub _pad: u32,
}

/// One positional kernel argument.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KernelArg {
    Buffer(DeviceBuffer),
    Uint(u32),
}

pub const KERNEL_ARG_COUNT: usize = 11;

/// Kernel arguments in contract order.
pub fn kernel_args(params: &FrameParams) -> [KernelArg; KERNEL_ARG_COUNT] {
    [
        KernelArg::Buffer(DeviceBuffer::Primitives),
        KernelArg::Uint(params.width),
        KernelArg::Uint(params.height),
        KernelArg::Uint(params.primitive_count),
        KernelArg::Buffer(DeviceBuffer::Presentation),
        KernelArg::Uint(params.frame_index),
        KernelArg::Buffer(DeviceBuffer::Camera),
        KernelArg::Uint(params.seed_a),
        KernelArg::Uint(params.seed_b),
        KernelArg::Buffer(DeviceBuffer::Accumulation),
        KernelArg::Uint(params.frame_hash),
    ]
}

/// Narrow capability over the compute device.
///
/// Every method blocks until the device operation has completed, so each step
/// observes the state written by the previous one.
pub trait ComputeBackend {
    /// Workgroup size the kernel was compiled with.
    fn group_size(&self) -> u32;

    /// Per-dimension workgroup limit.
    fn max_groups_per_dimension(&self) -> u32 {
        super::MAX_GROUPS_PER_DIMENSION
    }

    /// (Re)allocates all device buffers for `layout`. Buffer contents are undefined afterwards.
    fn configure(&mut self, layout: BufferLayout) -> Result<(), DeviceError>;

    fn upload(&mut self, buffer: DeviceBuffer, bytes: &[u8]) -> Result<(), DeviceError>;

    /// Fills `buffer` with zeros.
    fn clear(&mut self, buffer: DeviceBuffer) -> Result<(), DeviceError>;

    /// Updates scalar parameters without touching buffer bindings.
    fn set_scalars(&mut self, params: &FrameParams) -> Result<(), DeviceError>;

    /// Takes the presentation buffer from the display pipeline, flushing pending reads.
    fn acquire_presentation(&mut self) -> Result<(), DeviceError>;

    /// Runs the kernel. Only valid while the presentation buffer is compute-owned.
    fn dispatch(&mut self, args: &[KernelArg], work: WorkSize) -> Result<(), DeviceError>;

    /// Hands the presentation buffer back to the display pipeline.
    fn release_presentation(&mut self) -> Result<(), DeviceError>;
}
