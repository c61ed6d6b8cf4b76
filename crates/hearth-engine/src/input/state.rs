use std::collections::HashSet;

use anyhow::Result;

use crate::module::{InputModule, PlatformEvent};

use super::frame::InputFrame;
use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
};

/// Input module: accumulates key, button and pointer state.
///
/// Held state persists across frames; pressed/released edges, pointer delta
/// and wheel motion only cover the current frame. Input makes no semantic
/// decisions; it only records what the platform reported.
#[derive(Debug, Default)]
pub struct Input {
    initialized: bool,

    modifiers: Modifiers,
    focused: bool,

    /// Pointer position in logical pixels.
    pointer_pos: Option<(f32, f32)>,

    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,

    frame: InputFrame,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one input event to held state and the current frame.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases that happen while unfocused are never reported.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved { x, y } => {
                if let Some((px, py)) = self.pointer_pos {
                    self.frame.pointer_delta.0 += x - px;
                    self.frame.pointer_delta.1 += y - py;
                }
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerDelta { dx, dy } => {
                self.frame.pointer_delta.0 += dx;
                self.frame.pointer_delta.1 += dy;
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
                ..
            } => {
                self.modifiers = *modifiers;

                match state {
                    // OS auto-repeat of a held key is not a new press.
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            self.frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            self.frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                if button.index().is_none() {
                    return;
                }
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            self.frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            self.frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                let (x, y) = delta.lines();
                self.frame.wheel.0 += x;
                self.frame.wheel.1 += y;
            }

            InputEvent::Text(text) => {
                self.frame.text.push_str(text);
            }
        }
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    /// Key went down this frame.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    /// Key went up this frame.
    pub fn key_released(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }

    /// Key is currently held.
    pub fn key_held(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn any_key_pressed(&self) -> bool {
        !self.frame.keys_pressed.is_empty()
    }

    pub fn any_key_released(&self) -> bool {
        !self.frame.keys_released.is_empty()
    }

    pub fn any_key_held(&self) -> bool {
        !self.keys_down.is_empty()
    }

    pub fn held_key_count(&self) -> usize {
        self.keys_down.len()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Text committed this frame.
    pub fn text(&self) -> &str {
        &self.frame.text
    }

    // ── mouse ─────────────────────────────────────────────────────────────

    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.frame.buttons_pressed.contains(&button)
    }

    pub fn mouse_button_released(&self, button: MouseButton) -> bool {
        self.frame.buttons_released.contains(&button)
    }

    pub fn mouse_button_held(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn any_mouse_button_pressed(&self) -> bool {
        !self.frame.buttons_pressed.is_empty()
    }

    pub fn any_mouse_button_released(&self) -> bool {
        !self.frame.buttons_released.is_empty()
    }

    pub fn any_mouse_button_held(&self) -> bool {
        !self.buttons_down.is_empty()
    }

    pub fn held_button_count(&self) -> usize {
        self.buttons_down.len()
    }

    /// Last known pointer position; `None` while outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.pointer_pos
    }

    /// Pointer motion accumulated this frame.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.frame.pointer_delta
    }

    /// Wheel motion accumulated this frame, in lines.
    pub fn mouse_wheel(&self) -> (f32, f32) {
        self.frame.wheel
    }
}

impl InputModule for Input {
    fn init(&mut self) -> Result<()> {
        debug_assert!(!self.initialized, "input initialized twice");
        *self = Self {
            initialized: true,
            focused: true,
            ..Self::default()
        };
        Ok(())
    }

    fn quit(&mut self) {
        debug_assert!(self.initialized, "input quit without init");
        *self = Self::default();
    }

    fn new_frame(&mut self) {
        self.frame.clear();
    }

    fn process_event(&mut self, event: &PlatformEvent) {
        if let Some(ev) = event.as_input() {
            self.apply_event(ev);
        }
    }
}
