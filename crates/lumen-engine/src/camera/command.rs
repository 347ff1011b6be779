/// A single camera mutation, as produced by the input layer.
///
/// Each variant maps 1:1 to an [`OrbitCamera`](super::OrbitCamera) operation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraCommand {
    Yaw(f32),
    Pitch(f32),
    Radius(f32),
    Altitude(f32),
    Strafe(f32),
    Forward(f32),
    ApertureDiameter(f32),
    FocalDistance(f32),
}

impl CameraCommand {
    /// Delta carried by the command.
    pub fn delta(self) -> f32 {
        match self {
            CameraCommand::Yaw(d)
            | CameraCommand::Pitch(d)
            | CameraCommand::Radius(d)
            | CameraCommand::Altitude(d)
            | CameraCommand::Strafe(d)
            | CameraCommand::Forward(d)
            | CameraCommand::ApertureDiameter(d)
            | CameraCommand::FocalDistance(d) => d,
        }
    }
}
