use crate::camera::CameraCommand;

use super::frame::InputFrame;
use super::types::{Key, MouseButton};

/// Step sizes for the interactive camera controls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlSettings {
    /// Per key press: strafe, forward and altitude.
    pub translate_step: f32,
    /// Per key press: aperture diameter and focal distance.
    pub lens_step: f32,
    /// Per key press, in radians: yaw and pitch.
    pub rotate_step: f32,
    /// Per logical pixel of drag.
    pub drag_sensitivity: f32,
    /// Radius change per wheel line.
    pub wheel_step: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            translate_step: 0.05,
            lens_step: 0.1,
            rotate_step: 0.02,
            drag_sensitivity: 0.01,
            wheel_step: 0.1,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlAction {
    Camera(CameraCommand),
    ResetCamera,
    Exit,
}

/// Maps keyboard and mouse input onto camera commands.
///
/// Keys: `W`/`S` forward, `A`/`D` strafe, `R`/`F` altitude, `G`/`H` aperture,
/// `T`/`Y` focal distance, arrows yaw and pitch, `Space` resets the camera,
/// `Escape` exits. Left drag orbits, middle drag moves the altitude, right
/// drag and the wheel change the radius.
#[derive(Debug, Clone, Default)]
pub struct CameraControls {
    settings: ControlSettings,
}

impl CameraControls {
    pub fn new(settings: ControlSettings) -> Self {
        Self { settings }
    }

    pub fn key_action(&self, key: Key) -> Option<ControlAction> {
        let s = &self.settings;
        let command = match key {
            Key::Escape => return Some(ControlAction::Exit),
            Key::Space => return Some(ControlAction::ResetCamera),

            Key::W => CameraCommand::Forward(s.translate_step),
            Key::S => CameraCommand::Forward(-s.translate_step),
            Key::A => CameraCommand::Strafe(-s.translate_step),
            Key::D => CameraCommand::Strafe(s.translate_step),
            Key::R => CameraCommand::Altitude(s.translate_step),
            Key::F => CameraCommand::Altitude(-s.translate_step),

            Key::G => CameraCommand::ApertureDiameter(s.lens_step),
            Key::H => CameraCommand::ApertureDiameter(-s.lens_step),
            Key::T => CameraCommand::FocalDistance(s.lens_step),
            Key::Y => CameraCommand::FocalDistance(-s.lens_step),

            Key::ArrowLeft => CameraCommand::Yaw(s.rotate_step),
            Key::ArrowRight => CameraCommand::Yaw(-s.rotate_step),
            Key::ArrowUp => CameraCommand::Pitch(s.rotate_step),
            Key::ArrowDown => CameraCommand::Pitch(-s.rotate_step),

            Key::Unknown(_) => return None,
        };
        Some(ControlAction::Camera(command))
    }

    /// Actions for one frame of input: key presses in arrival order, then
    /// drags, then the wheel.
    pub fn actions(&self, frame: &InputFrame) -> Vec<ControlAction> {
        let s = &self.settings;
        let mut out: Vec<ControlAction> =
            frame.key_presses.iter().filter_map(|k| self.key_action(*k)).collect();

        let mut push = |command: CameraCommand| {
            if command.delta() != 0.0 {
                out.push(ControlAction::Camera(command));
            }
        };

        // Dragging right turns the view left; dragging down tilts it up.
        let orbit = frame.drag_delta(MouseButton::Left);
        push(CameraCommand::Yaw(-orbit.x * s.drag_sensitivity));
        push(CameraCommand::Pitch(orbit.y * s.drag_sensitivity));

        let lift = frame.drag_delta(MouseButton::Middle);
        push(CameraCommand::Altitude(lift.y * s.drag_sensitivity));

        let zoom = frame.drag_delta(MouseButton::Right);
        push(CameraCommand::Radius(zoom.y * s.drag_sensitivity));

        push(CameraCommand::Radius(-frame.wheel_lines * s.wheel_step));

        out
    }
}
