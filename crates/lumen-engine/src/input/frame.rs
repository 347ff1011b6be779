use std::collections::HashMap;

use crate::math::Vec2;

use super::types::{InputEvent, Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` holds what is currently down and where the pointer is.
/// `InputFrame` holds what happened since the previous frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Key presses this frame in arrival order, auto-repeats included.
    pub key_presses: Vec<Key>,

    /// Pointer travel this frame while each button was held, in logical pixels.
    pub drag: HashMap<MouseButton, Vec2>,

    /// Wheel travel this frame, in lines.
    pub wheel_lines: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.key_presses.clear();
        self.drag.clear();
        self.wheel_lines = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Pointer travel while `button` was held; zero if it never moved.
    pub fn drag_delta(&self, button: MouseButton) -> Vec2 {
        self.drag.get(&button).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
