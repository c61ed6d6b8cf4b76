use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Per-frame input edges and deltas.
///
/// Cleared by `Input::new_frame` at the top of every running tick, before the
/// frame's platform events are applied.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Accumulated pointer motion in logical pixels.
    pub pointer_delta: (f32, f32),

    /// Accumulated wheel motion in lines.
    pub wheel: (f32, f32),

    /// Text committed this frame, in arrival order.
    pub text: String,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = (0.0, 0.0);
        self.wheel = (0.0, 0.0);
        self.text.clear();
    }
}
