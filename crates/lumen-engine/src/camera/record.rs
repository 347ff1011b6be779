use bytemuck::{Pod, Zeroable};

/// Flattened camera snapshot uploaded to the device every frame.
///
/// Layout mirrors a WGSL/OpenCL struct of three 16-byte-aligned `vec3<f32>`
/// followed by packed scalars; total size is 80 bytes.
///
/// `fov` holds `[horizontal, vertical]` in radians.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DeviceCameraRecord {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub view: [f32; 3],
    pub _pad1: f32,
    pub up: [f32; 3],
    pub _pad2: f32,
    pub resolution: [f32; 2],
    pub fov: [f32; 2],
    pub aperture_radius: f32,
    pub focal_distance: f32,
    pub _pad3: [f32; 2],
}

impl DeviceCameraRecord {
    /// Raw bytes as uploaded.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
