use crate::input::InputEvent;

/// Platform event drained once per frame by the lifecycle.
///
/// `CloseRequested` never reaches the UI or input layers; it ends the frame
/// and starts shutdown negotiation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    CloseRequested,

    /// Window resized (physical pixels).
    Resized { width: u32, height: u32 },

    ScaleFactorChanged { scale: f64 },

    Input(InputEvent),
}

impl PlatformEvent {
    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, PlatformEvent::CloseRequested)
    }

    #[inline]
    pub fn as_input(&self) -> Option<&InputEvent> {
        match self {
            PlatformEvent::Input(ev) => Some(ev),
            _ => None,
        }
    }
}
