//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The display module translates platform events into `InputEvent`s.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::Input;
pub use types::{
    EventCategory,
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    MOUSE_BUTTON_COUNT,
};
