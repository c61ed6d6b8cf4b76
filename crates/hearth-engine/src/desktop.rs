//! The winit + wgpu module set.

use crate::device::{GpuInit, WgpuGraphics};
use crate::input::Input;
use crate::module::{Backend, Modules};
use crate::time::FrameClock;
use crate::ui::ImmediateUi;
use crate::window::WinitDisplay;

/// Desktop backend: a winit window, a wgpu surface on it, the immediate UI
/// overlay, a monotonic frame clock and the input accumulator.
pub struct Desktop;

impl Backend for Desktop {
    type Display = WinitDisplay;
    type Graphics = WgpuGraphics;
    type Ui = ImmediateUi;
    type Clock = FrameClock;
    type Input = Input;
}

impl Modules<Desktop> {
    /// Uninitialized desktop modules. Nothing touches the platform until
    /// the lifecycle runs `init`.
    pub fn desktop(gpu: GpuInit) -> Self {
        Self::new(
            WinitDisplay::new(),
            WgpuGraphics::new(gpu),
            ImmediateUi::new(),
            FrameClock::new(),
            Input::new(),
        )
    }
}

impl Default for Modules<Desktop> {
    fn default() -> Self {
        Self::desktop(GpuInit::default())
    }
}
