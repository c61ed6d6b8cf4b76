use std::fmt;

/// Keyboard key identifier (physical layout, US QWERTY names).
///
/// Keys the platform reports but which have no variant here map to
/// `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Row digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,
    NumpadDecimal,

    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,

    Backspace,
    Tab,
    Enter,
    Pause,
    NumLock,
    ScrollLock,
    CapsLock,
    Escape,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    // Modifiers, sided
    ControlLeft,
    ControlRight,
    ShiftLeft,
    ShiftRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    // Punctuation
    Semicolon,
    Equal,
    Comma,
    Minus,
    Period,
    Slash,
    Backquote,
    BracketLeft,
    BracketRight,
    Backslash,
    Quote,

    /// Platform key without a variant; carries the platform code.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Number of tracked mouse buttons.
pub const MOUSE_BUTTON_COUNT: usize = 5;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Slot in the tracked-button table; `None` for untracked buttons.
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            MouseButton::Left => Some(0),
            MouseButton::Right => Some(1),
            MouseButton::Middle => Some(2),
            MouseButton::Back => Some(3),
            MouseButton::Forward => Some(4),
            MouseButton::Other(_) => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` is notched-wheel style input; `Pixel` is high precision (trackpads).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Delta in wheel lines. Pixel deltas are converted assuming a 20px line.
    #[inline]
    pub fn lines(self) -> (f32, f32) {
        const PIXELS_PER_LINE: f32 = 20.0;
        match self {
            MouseWheelDelta::Line { x, y } => (x, y),
            MouseWheelDelta::Pixel { x, y } => (x / PIXELS_PER_LINE, y / PIXELS_PER_LINE),
        }
    }
}

/// Pointer button event. Coordinates are the pointer position at the time of
/// the press/release, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Coarse event class used by the UI claim policy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EventCategory {
    Pointer,
    Keyboard,
    Other,
}

/// Platform-agnostic input events.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Stable platform code when available.
        code: u32,
        /// True for OS auto-repeat.
        repeat: bool,
    },

    /// Absolute pointer position in logical pixels.
    PointerMoved { x: f32, y: f32 },

    /// Raw relative motion, reported while the cursor is locked.
    PointerDelta { dx: f32, dy: f32 },

    PointerButton(PointerButtonEvent),

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Committed text.
    Text(String),

    /// Pointer left the window surface.
    PointerLeft,

    Focused(bool),
}

impl InputEvent {
    pub fn category(&self) -> EventCategory {
        match self {
            InputEvent::ModifiersChanged(_) | InputEvent::Key { .. } | InputEvent::Text(_) => {
                EventCategory::Keyboard
            }
            InputEvent::PointerMoved { .. }
            | InputEvent::PointerDelta { .. }
            | InputEvent::PointerButton(_)
            | InputEvent::MouseWheel { .. }
            | InputEvent::PointerLeft => EventCategory::Pointer,
            InputEvent::Focused(_) => EventCategory::Other,
        }
    }

    /// True for key and button releases.
    pub fn is_release(&self) -> bool {
        match self {
            InputEvent::Key { state, .. } => *state == KeyState::Released,
            InputEvent::PointerButton(b) => b.state == MouseButtonState::Released,
            _ => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
