//! Display module backed by winit.
//!
//! Owns the event loop and the window, and translates window events into
//! platform-agnostic [`crate::module::PlatformEvent`]s.

mod display;
mod translate;

pub use display::WinitDisplay;
pub use translate::Translator;
pub use winit::window::CursorIcon;
