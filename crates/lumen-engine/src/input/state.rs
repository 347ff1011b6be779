use std::collections::HashSet;

use crate::math::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

/// Current input state for the window.
///
/// Holds "is down" information and the pointer position. Per-frame
/// transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                let pos = Vec2::new(*x, *y);
                if let Some(prev) = self.pointer_pos {
                    let delta = pos - prev;
                    for button in &self.buttons_down {
                        let acc = frame.drag.entry(*button).or_default();
                        *acc = *acc + delta;
                    }
                }
                self.pointer_pos = Some(pos);
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, repeat } => match state {
                KeyState::Pressed => {
                    let inserted = self.keys_down.insert(*key);
                    if inserted || *repeat {
                        frame.key_presses.push(*key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    self.buttons_down.insert(*button);
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(button);
                }
            },

            InputEvent::MouseWheel(delta) => {
                frame.wheel_lines += delta.lines();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::WheelDelta;

    fn apply(state: &mut InputState, frame: &mut InputFrame, events: &[InputEvent]) {
        for ev in events {
            state.apply_event(frame, ev.clone());
        }
    }

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::PointerButton {
            button,
            state: MouseButtonState::Pressed,
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    #[test]
    fn drag_accumulates_only_while_held() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        apply(
            &mut state,
            &mut frame,
            &[
                moved(10.0, 10.0),
                moved(20.0, 10.0),
                press(MouseButton::Left),
                moved(25.0, 12.0),
                moved(30.0, 20.0),
            ],
        );
        assert_eq!(frame.drag_delta(MouseButton::Left), Vec2::new(10.0, 10.0));
        assert_eq!(frame.drag_delta(MouseButton::Right), Vec2::zero());
    }

    #[test]
    fn first_move_after_leaving_does_not_jump() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        apply(
            &mut state,
            &mut frame,
            &[
                press(MouseButton::Right),
                moved(0.0, 0.0),
                InputEvent::PointerLeft,
                moved(500.0, 500.0),
            ],
        );
        assert_eq!(frame.drag_delta(MouseButton::Right), Vec2::zero());
    }

    #[test]
    fn repeats_are_counted_as_presses() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let down = |repeat| InputEvent::Key {
            key: Key::W,
            state: KeyState::Pressed,
            repeat,
        };
        apply(&mut state, &mut frame, &[down(false), down(true), down(true)]);
        assert_eq!(frame.key_presses, vec![Key::W, Key::W, Key::W]);
        assert!(state.key_down(Key::W));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        apply(
            &mut state,
            &mut frame,
            &[
                press(MouseButton::Middle),
                InputEvent::Key {
                    key: Key::A,
                    state: KeyState::Pressed,
                    repeat: false,
                },
                InputEvent::Focused(false),
            ],
        );
        assert!(!state.button_down(MouseButton::Middle));
        assert!(!state.key_down(Key::A));
    }

    #[test]
    fn wheel_sums_in_lines() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        apply(
            &mut state,
            &mut frame,
            &[
                InputEvent::MouseWheel(WheelDelta::Line(1.0)),
                InputEvent::MouseWheel(WheelDelta::Pixel(WheelDelta::PIXELS_PER_LINE)),
            ],
        );
        assert_eq!(frame.wheel_lines, 2.0);

        frame.clear();
        assert_eq!(frame.wheel_lines, 0.0);
        assert!(frame.is_empty());
    }
}
