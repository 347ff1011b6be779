/// Keyboard key identifier.
///
/// Only keys bound to viewer controls get a named variant. Everything else
/// maps to `Key::Unknown(code)` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    A, D, F, G, H, R, S, T, W, Y,

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta.
///
/// `Line` is notched-wheel input; `Pixel` is high-precision touchpad input in
/// logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WheelDelta {
    Line(f32),
    Pixel(f32),
}

impl WheelDelta {
    /// Logical pixels treated as one wheel notch.
    pub const PIXELS_PER_LINE: f32 = 40.0;

    /// Vertical scroll amount in lines. Positive scrolls away from the user.
    pub fn lines(self) -> f32 {
        match self {
            WheelDelta::Line(y) => y,
            WheelDelta::Pixel(y) => y / Self::PIXELS_PER_LINE,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when the event is an auto-repeat of a held key.
        repeat: bool,
    },

    /// Pointer position in logical pixels.
    PointerMoved { x: f32, y: f32 },

    PointerButton {
        button: MouseButton,
        state: MouseButtonState,
    },

    MouseWheel(WheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
