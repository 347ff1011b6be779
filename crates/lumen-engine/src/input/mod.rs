//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s; [`CameraControls`]
//! turns one frame of input into camera commands.

mod controls;
mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use controls::{CameraControls, ControlAction, ControlSettings};
pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState, WheelDelta};
