//! Orbit camera model and its device-facing record.
//!
//! The host keeps an ergonomic [`OrbitCamera`] (center, yaw, pitch, radius, lens)
//! and derives a flat, fixed-layout [`DeviceCameraRecord`] from it once per frame.
//! The record is the only camera representation that crosses into device memory.
//!
//! Every mutating operation sets the camera's dirty flag; the session drains it
//! into the accumulation controller before the next frame is dispatched.

mod command;
mod error;
mod orbit;
mod record;

pub use command::CameraCommand;
pub use error::{CameraError, ConfigError};
pub use orbit::{CameraBasis, CameraPose, OrbitCamera, Resolution};
pub use record::DeviceCameraRecord;

/// Clamp bounds applied by the camera mutators.
pub mod limits {
    /// Distance kept between pitch and either pole, in radians.
    pub const PITCH_PADDING: f32 = 0.05;

    pub const MIN_RADIUS: f32 = 0.2;
    pub const MAX_RADIUS: f32 = 100.0;

    pub const MIN_APERTURE_RADIUS: f32 = 0.0;
    pub const MAX_APERTURE_RADIUS: f32 = 25.0;

    pub const MIN_FOCAL_DISTANCE: f32 = 0.2;
    pub const MAX_FOCAL_DISTANCE: f32 = 100.0;

    /// Bound on each coordinate of the orbit center, keeping the eye finite.
    pub const MAX_CENTER_COORD: f32 = 1.0e6;

    /// Offset keeping proportional aperture steps from stalling at zero.
    pub const APERTURE_STEP_BIAS: f32 = 0.01;
}
