use bytemuck::{Pod, Zeroable};

use crate::math::Vec3;

use super::SceneError;

/// Renderable sphere with a diffuse albedo and an emitted radiance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Primitive {
    pub radius: f32,
    pub position: Vec3,
    /// Diffuse reflectance, each component in `[0, 1]`.
    pub albedo: Vec3,
    /// Emitted radiance, each component `>= 0`.
    pub emission: Vec3,
}

impl Primitive {
    /// Non-emissive sphere.
    pub fn diffuse(radius: f32, position: Vec3, albedo: Vec3) -> Self {
        Self {
            radius,
            position,
            albedo,
            emission: Vec3::zero(),
        }
    }

    /// Emissive sphere with black albedo.
    pub fn light(radius: f32, position: Vec3, emission: Vec3) -> Self {
        Self {
            radius,
            position,
            albedo: Vec3::zero(),
            emission,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SceneError::Invalid("radius must be finite and positive"));
        }
        if !self.position.is_finite() {
            return Err(SceneError::Invalid("position must be finite"));
        }
        let a = self.albedo;
        if ![a.x, a.y, a.z].iter().all(|c| (0.0..=1.0).contains(c)) {
            return Err(SceneError::Invalid("albedo components must lie in [0, 1]"));
        }
        let e = self.emission;
        if ![e.x, e.y, e.z].iter().all(|c| c.is_finite() && *c >= 0.0) {
            return Err(SceneError::Invalid("emission components must be finite and >= 0"));
        }
        Ok(())
    }

    pub fn is_emissive(&self) -> bool {
        let e = self.emission;
        e.x > 0.0 || e.y > 0.0 || e.z > 0.0
    }

    pub fn to_device(&self) -> DevicePrimitive {
        DevicePrimitive {
            radius: self.radius,
            _pad0: [0.0; 3],
            position: self.position.to_array(),
            _pad1: 0.0,
            albedo: self.albedo.to_array(),
            _pad2: 0.0,
            emission: self.emission.to_array(),
            _pad3: 0.0,
        }
    }
}

/// Device layout of a [`Primitive`]: 64 bytes, each vector on a 16-byte boundary.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DevicePrimitive {
    pub radius: f32,
    pub _pad0: [f32; 3],
    pub position: [f32; 3],
    pub _pad1: f32,
    pub albedo: [f32; 3],
    pub _pad2: f32,
    pub emission: [f32; 3],
    pub _pad3: f32,
}
