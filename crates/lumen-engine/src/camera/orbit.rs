use std::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::math::{Vec2, Vec3};

use super::command::CameraCommand;
use super::error::{CameraError, ConfigError};
use super::limits::*;
use super::record::DeviceCameraRecord;

const WORLD_UP: Vec3 = Vec3::Y;

/// Substituted for `WORLD_UP` when the view direction is parallel to it.
const FALLBACK_AXIS: Vec3 = Vec3::Z;

/// Output image size in pixels. Both dimensions are non-zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::Resolution { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Orbit parameters and lens settings a camera starts from.
///
/// Values are clamped into the camera's limits when applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub center: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub aperture_radius: f32,
    pub focal_distance: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            center: Vec3::zero(),
            yaw: 0.0,
            pitch: 0.3,
            radius: 4.0,
            aperture_radius: 0.04,
            focal_distance: 4.0,
        }
    }
}

/// Orthonormal view basis derived from yaw/pitch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraBasis {
    pub view: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Interactive camera orbiting a center point.
///
/// Invariants held after every operation:
/// - `yaw` in `[0, 2π)`
/// - `pitch` strictly inside `(-π/2, π/2)`, [`PITCH_PADDING`] away from the poles
/// - `radius`, aperture and focal distance inside their [`limits`](super::limits)
pub struct OrbitCamera {
    center: Vec3,
    yaw: f32,
    pitch: f32,
    radius: f32,
    aperture_radius: f32,
    focal_distance: f32,

    resolution: Resolution,
    horizontal_fov: f32,

    dirty: bool,
}

impl OrbitCamera {
    /// Creates a camera at the default pose.
    pub fn new(resolution: Resolution, horizontal_fov_degrees: f32) -> Result<Self, ConfigError> {
        Self::from_pose(CameraPose::default(), resolution, horizontal_fov_degrees)
    }

    /// Creates a camera at `pose`. The new camera is not dirty.
    pub fn from_pose(
        pose: CameraPose,
        resolution: Resolution,
        horizontal_fov_degrees: f32,
    ) -> Result<Self, ConfigError> {
        let finite = [
            pose.yaw,
            pose.pitch,
            pose.radius,
            pose.aperture_radius,
            pose.focal_distance,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || !pose.center.is_finite() {
            return Err(ConfigError::NonFinite("camera pose"));
        }

        let mut camera = Self {
            center: pose.center,
            yaw: pose.yaw,
            pitch: pose.pitch,
            radius: pose.radius,
            aperture_radius: pose.aperture_radius,
            focal_distance: pose.focal_distance,
            resolution,
            horizontal_fov: fov_radians(horizontal_fov_degrees)?,
            dirty: false,
        };

        camera.fix_center();
        camera.fix_yaw();
        camera.fix_pitch();
        camera.fix_radius();
        camera.fix_aperture_radius();
        camera.fix_focal_distance();

        Ok(camera)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn aperture_radius(&self) -> f32 {
        self.aperture_radius
    }

    pub fn focal_distance(&self) -> f32 {
        self.focal_distance
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Horizontal field of view in radians.
    pub fn horizontal_fov(&self) -> f32 {
        self.horizontal_fov
    }

    /// Vertical field of view in radians, derived from the aspect ratio.
    pub fn vertical_fov(&self) -> f32 {
        2.0 * ((self.horizontal_fov * 0.5).tan() / self.resolution.aspect()).atan()
    }

    /// Whether any mutation happened since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── derived geometry ──────────────────────────────────────────────────

    /// Unit vector from the eye toward `center`.
    pub fn view_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let to_camera = Vec3::new(sy * cp, sp, cy * cp);
        -to_camera
    }

    /// Eye position: `center - view * radius`.
    pub fn position(&self) -> Vec3 {
        self.center - self.view_direction() * self.radius
    }

    pub fn basis(&self) -> CameraBasis {
        basis_for(self.view_direction())
    }

    /// Packs the current state for the device. Pure; does not touch the dirty flag.
    pub fn build_device_record(&self) -> DeviceCameraRecord {
        let basis = self.basis();
        let res = self.resolution;
        let resolution = Vec2::new(res.width as f32, res.height as f32);
        let fov = Vec2::new(self.horizontal_fov, self.vertical_fov());

        DeviceCameraRecord {
            position: self.position().to_array(),
            _pad0: 0.0,
            view: basis.view.to_array(),
            _pad1: 0.0,
            up: basis.up.to_array(),
            _pad2: 0.0,
            resolution: resolution.to_array(),
            fov: fov.to_array(),
            aperture_radius: self.aperture_radius,
            focal_distance: self.focal_distance,
            _pad3: [0.0; 2],
        }
    }

    // ── mutators ──────────────────────────────────────────────────────────

    pub fn change_yaw(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_yaw", delta)?;
        self.yaw += delta;
        self.fix_yaw();
        self.dirty = true;
        Ok(())
    }

    pub fn change_pitch(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_pitch", delta)?;
        self.pitch += delta;
        self.fix_pitch();
        self.dirty = true;
        Ok(())
    }

    /// Scales the orbit radius by `1 + delta`.
    pub fn change_radius(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_radius", delta)?;
        self.radius += self.radius * delta;
        self.fix_radius();
        self.dirty = true;
        Ok(())
    }

    pub fn change_altitude(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_altitude", delta)?;
        self.center.y += delta;
        self.fix_center();
        self.dirty = true;
        Ok(())
    }

    /// Moves `center` along the camera's right vector.
    pub fn strafe(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("strafe", delta)?;
        let right = self.basis().right;
        self.center += right * delta;
        self.fix_center();
        self.dirty = true;
        Ok(())
    }

    /// Moves `center` along the view direction.
    pub fn go_forward(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("go_forward", delta)?;
        let view = self.view_direction();
        self.center += view * delta;
        self.fix_center();
        self.dirty = true;
        Ok(())
    }

    /// Grows the aperture proportionally to its current size.
    pub fn change_aperture_diameter(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_aperture_diameter", delta)?;
        self.aperture_radius += (self.aperture_radius + APERTURE_STEP_BIAS) * delta;
        self.fix_aperture_radius();
        self.dirty = true;
        Ok(())
    }

    pub fn change_focal_distance(&mut self, delta: f32) -> Result<(), CameraError> {
        finite("change_focal_distance", delta)?;
        self.focal_distance += delta;
        self.fix_focal_distance();
        self.dirty = true;
        Ok(())
    }

    /// Sets the output size. Does not mark the camera dirty; the caller owns the
    /// accumulation reset that a size change requires.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        self.resolution = Resolution::new(width, height)?;
        Ok(())
    }

    pub fn set_horizontal_fov(&mut self, degrees: f32) -> Result<(), ConfigError> {
        self.horizontal_fov = fov_radians(degrees)?;
        self.dirty = true;
        Ok(())
    }

    /// Dispatches a [`CameraCommand`] to the matching mutator.
    pub fn apply(&mut self, command: CameraCommand) -> Result<(), CameraError> {
        match command {
            CameraCommand::Yaw(d) => self.change_yaw(d),
            CameraCommand::Pitch(d) => self.change_pitch(d),
            CameraCommand::Radius(d) => self.change_radius(d),
            CameraCommand::Altitude(d) => self.change_altitude(d),
            CameraCommand::Strafe(d) => self.strafe(d),
            CameraCommand::Forward(d) => self.go_forward(d),
            CameraCommand::ApertureDiameter(d) => self.change_aperture_diameter(d),
            CameraCommand::FocalDistance(d) => self.change_focal_distance(d),
        }
    }

    // ── clamps ────────────────────────────────────────────────────────────

    /// Finite deltas can still overflow the center; sums saturate to ±inf,
    /// which the clamp folds back.
    fn fix_center(&mut self) {
        let c = self.center;
        self.center = Vec3::new(
            c.x.clamp(-MAX_CENTER_COORD, MAX_CENTER_COORD),
            c.y.clamp(-MAX_CENTER_COORD, MAX_CENTER_COORD),
            c.z.clamp(-MAX_CENTER_COORD, MAX_CENTER_COORD),
        );
    }

    fn fix_yaw(&mut self) {
        let wrapped = self.yaw.rem_euclid(TAU);
        // rem_euclid rounds up to TAU for tiny negative inputs.
        self.yaw = if wrapped >= TAU { 0.0 } else { wrapped };
    }

    fn fix_pitch(&mut self) {
        self.pitch = self
            .pitch
            .clamp(-FRAC_PI_2 + PITCH_PADDING, FRAC_PI_2 - PITCH_PADDING);
    }

    fn fix_radius(&mut self) {
        self.radius = self.radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }

    fn fix_aperture_radius(&mut self) {
        self.aperture_radius = self
            .aperture_radius
            .clamp(MIN_APERTURE_RADIUS, MAX_APERTURE_RADIUS);
    }

    fn fix_focal_distance(&mut self) {
        self.focal_distance = self
            .focal_distance
            .clamp(MIN_FOCAL_DISTANCE, MAX_FOCAL_DISTANCE);
    }
}

/// Right-handed view basis around `view`.
///
/// Pitch clamping keeps `view` off the world up axis for every camera, so the
/// fallback axis only applies to directions built outside [`OrbitCamera`].
fn basis_for(view: Vec3) -> CameraBasis {
    let right = view
        .cross(WORLD_UP)
        .try_normalize()
        .unwrap_or_else(|| view.cross(FALLBACK_AXIS).normalize());
    let up = right.cross(view);
    CameraBasis { view, right, up }
}

fn finite(op: &'static str, value: f32) -> Result<(), CameraError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CameraError::NonFinite { op, value })
    }
}

fn fov_radians(degrees: f32) -> Result<f32, ConfigError> {
    if !degrees.is_finite() {
        return Err(ConfigError::NonFinite("horizontal field of view"));
    }
    let radians = degrees.to_radians();
    if radians <= 0.0 || radians >= PI {
        return Err(ConfigError::FieldOfView(degrees));
    }
    Ok(radians)
}
