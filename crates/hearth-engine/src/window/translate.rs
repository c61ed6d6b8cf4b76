use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::scancode::PhysicalKeyExtScancode;

use crate::input::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent,
};
use crate::module::PlatformEvent;

/// Turns winit window events into [`PlatformEvent`]s.
///
/// winit reports modifiers and the pointer position as separate events, so
/// both are tracked here to stamp key, button and wheel events.
#[derive(Debug, Default)]
pub struct Translator {
    modifiers: Modifiers,
    pointer: Option<(f32, f32)>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in logical pixels.
    #[inline]
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Appends the events `event` maps to. `scale` is the window's current
    /// scale factor, used to convert physical positions to logical ones.
    pub fn translate(&mut self, scale: f64, event: &WindowEvent, out: &mut Vec<PlatformEvent>) {
        match event {
            WindowEvent::CloseRequested => out.push(PlatformEvent::CloseRequested),

            WindowEvent::Resized(size) => out.push(PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            }),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                out.push(PlatformEvent::ScaleFactorChanged {
                    scale: *scale_factor,
                })
            }

            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                out.push(input(InputEvent::ModifiersChanged(self.modifiers)));
            }

            WindowEvent::Focused(f) => out.push(input(InputEvent::Focused(*f))),

            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                out.push(input(InputEvent::PointerLeft));
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = to_logical_f32(scale, *position);
                self.pointer = Some((x, y));
                out.push(input(InputEvent::PointerMoved { x, y }));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let state = match state {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                };
                let (x, y) = self.pointer.unwrap_or((0.0, 0.0));

                out.push(input(InputEvent::PointerButton(PointerButtonEvent {
                    button: map_mouse_button(*button),
                    state,
                    x,
                    y,
                    modifiers: self.modifiers,
                })));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                    MouseScrollDelta::PixelDelta(p) => {
                        let (x, y) = to_logical_f32(scale, *p);
                        MouseWheelDelta::Pixel { x, y }
                    }
                };
                out.push(input(InputEvent::MouseWheel {
                    delta,
                    modifiers: self.modifiers,
                }));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };
                let (key, code) = map_key(event.physical_key);

                out.push(input(InputEvent::Key {
                    key,
                    state,
                    modifiers: self.modifiers,
                    code,
                    repeat: event.repeat,
                }));

                if state == KeyState::Pressed {
                    if let Some(text) = event.text.as_deref().filter(|t| is_printable(t)) {
                        out.push(input(InputEvent::Text(text.to_string())));
                    }
                }
            }

            WindowEvent::Ime(winit::event::Ime::Commit(text)) if is_printable(text) => {
                out.push(input(InputEvent::Text(text.clone())));
            }

            _ => {}
        }
    }

    /// Raw device motion, forwarded while the cursor is in relative mode.
    #[inline]
    pub fn motion(&self, (dx, dy): (f64, f64)) -> PlatformEvent {
        input(InputEvent::PointerDelta {
            dx: dx as f32,
            dy: dy as f32,
        })
    }
}

#[inline]
fn input(ev: InputEvent) -> PlatformEvent {
    PlatformEvent::Input(ev)
}

fn is_printable(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(char::is_control)
}

fn to_logical_f32(scale: f64, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

/// Maps a physical key to a [`Key`] and the platform scancode (0 when the
/// platform has none).
pub(crate) fn map_key(pk: PhysicalKey) -> (Key, u32) {
    let code = pk.to_scancode().unwrap_or(0);

    let PhysicalKey::Code(kc) = pk else {
        return (Key::Unknown(code), code);
    };

    let key = match kc {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::Numpad0 => Key::Numpad0,
        KeyCode::Numpad1 => Key::Numpad1,
        KeyCode::Numpad2 => Key::Numpad2,
        KeyCode::Numpad3 => Key::Numpad3,
        KeyCode::Numpad4 => Key::Numpad4,
        KeyCode::Numpad5 => Key::Numpad5,
        KeyCode::Numpad6 => Key::Numpad6,
        KeyCode::Numpad7 => Key::Numpad7,
        KeyCode::Numpad8 => Key::Numpad8,
        KeyCode::Numpad9 => Key::Numpad9,
        KeyCode::NumpadAdd => Key::NumpadAdd,
        KeyCode::NumpadSubtract => Key::NumpadSubtract,
        KeyCode::NumpadMultiply => Key::NumpadMultiply,
        KeyCode::NumpadDivide => Key::NumpadDivide,
        KeyCode::NumpadEnter => Key::NumpadEnter,
        KeyCode::NumpadDecimal => Key::NumpadDecimal,

        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::ArrowDown => Key::ArrowDown,

        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Enter => Key::Enter,
        KeyCode::Pause => Key::Pause,
        KeyCode::NumLock => Key::NumLock,
        KeyCode::ScrollLock => Key::ScrollLock,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::AltLeft => Key::AltLeft,
        KeyCode::AltRight => Key::AltRight,
        KeyCode::SuperLeft => Key::SuperLeft,
        KeyCode::SuperRight => Key::SuperRight,

        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Equal => Key::Equal,
        KeyCode::Comma => Key::Comma,
        KeyCode::Minus => Key::Minus,
        KeyCode::Period => Key::Period,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backquote => Key::Backquote,
        KeyCode::BracketLeft => Key::BracketLeft,
        KeyCode::BracketRight => Key::BracketRight,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Quote => Key::Quote,

        _ => Key::Unknown(code),
    };

    (key, code)
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalSize;
    use winit::event::DeviceId;

    use super::*;

    fn device() -> DeviceId {
        // SAFETY: only compared against other dummies; never handed to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn one(t: &mut Translator, scale: f64, event: WindowEvent) -> Vec<PlatformEvent> {
        let mut out = Vec::new();
        t.translate(scale, &event, &mut out);
        out
    }

    #[test]
    fn window_events_map_directly() {
        let mut t = Translator::new();
        assert_eq!(
            one(&mut t, 1.0, WindowEvent::CloseRequested),
            vec![PlatformEvent::CloseRequested]
        );
        assert_eq!(
            one(&mut t, 1.0, WindowEvent::Resized(PhysicalSize::new(640, 480))),
            vec![PlatformEvent::Resized { width: 640, height: 480 }]
        );
        assert_eq!(
            one(&mut t, 1.0, WindowEvent::Focused(false)),
            vec![input(InputEvent::Focused(false))]
        );
    }

    #[test]
    fn cursor_positions_become_logical() {
        let mut t = Translator::new();
        let out = one(
            &mut t,
            2.0,
            WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(200.0, 100.0),
            },
        );
        assert_eq!(out, vec![input(InputEvent::PointerMoved { x: 100.0, y: 50.0 })]);
        assert_eq!(t.pointer(), Some((100.0, 50.0)));
    }

    #[test]
    fn buttons_carry_the_tracked_pointer() {
        let mut t = Translator::new();
        one(
            &mut t,
            1.0,
            WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(12.0, 34.0),
            },
        );
        let out = one(
            &mut t,
            1.0,
            WindowEvent::MouseInput {
                device_id: device(),
                state: ElementState::Pressed,
                button: WinitMouseButton::Left,
            },
        );
        let Some(PlatformEvent::Input(InputEvent::PointerButton(ev))) = out.first() else {
            panic!("expected a button event, got {out:?}");
        };
        assert_eq!(ev.button, MouseButton::Left);
        assert_eq!(ev.state, MouseButtonState::Pressed);
        assert_eq!((ev.x, ev.y), (12.0, 34.0));
    }

    #[test]
    fn cursor_left_forgets_the_pointer() {
        let mut t = Translator::new();
        one(
            &mut t,
            1.0,
            WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(1.0, 1.0),
            },
        );
        let out = one(&mut t, 1.0, WindowEvent::CursorLeft { device_id: device() });
        assert_eq!(out, vec![input(InputEvent::PointerLeft)]);
        assert_eq!(t.pointer(), None);
    }

    #[test]
    fn unhandled_events_produce_nothing() {
        let mut t = Translator::new();
        assert!(one(&mut t, 1.0, WindowEvent::RedrawRequested).is_empty());
    }

    #[test]
    fn motion_becomes_pointer_delta() {
        let t = Translator::new();
        assert_eq!(
            t.motion((3.0, -2.0)),
            input(InputEvent::PointerDelta { dx: 3.0, dy: -2.0 })
        );
    }

    #[test]
    fn key_codes_map_to_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyA)).0, Key::A);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::AltLeft)).0, Key::AltLeft);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)).0, Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Numpad7)).0, Key::Numpad7);
        assert!(matches!(
            map_key(PhysicalKey::Code(KeyCode::F20)).0,
            Key::Unknown(_)
        ));
    }

    #[test]
    fn control_characters_are_not_text() {
        assert!(is_printable("a"));
        assert!(!is_printable("\u{8}"));
        assert!(!is_printable(""));
    }
}
