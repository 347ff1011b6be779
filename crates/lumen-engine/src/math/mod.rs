//! Minimal vector math shared by the camera, scene and dispatch layers.
//!
//! Conventions:
//! - right-handed world space, +Y up
//! - angles in radians unless a name says otherwise

mod vec2;
mod vec3;

pub use vec2::Vec2;
pub use vec3::Vec3;

/// Lengths below this are treated as zero when normalizing.
pub const EPSILON: f32 = 1.0e-6;
