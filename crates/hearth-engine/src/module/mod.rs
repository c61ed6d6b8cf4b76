//! Module contract.
//!
//! Every subsystem the lifecycle sequences (display, graphics, UI, clock,
//! input) implements one of the traits below. Modules are plain owned values
//! bundled in [`Modules`]; the lifecycle is the only caller of `init`/`quit`,
//! and calls `quit` only on modules whose `init` returned `Ok`.
//!
//! `init` failing must leave the module holding nothing: a failed module is
//! never quit.

mod event;

pub use event::PlatformEvent;

use std::fmt;

use anyhow::Result;

use crate::core::AppSetup;

/// Identifies one of the fixed engine modules.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ModuleKind {
    Display,
    Graphics,
    Ui,
    Clock,
    Input,
}

/// Initialization order. Teardown walks the initialized prefix in reverse.
pub static INIT_ORDER: [ModuleKind; 5] = [
    ModuleKind::Display,
    ModuleKind::Graphics,
    ModuleKind::Ui,
    ModuleKind::Clock,
    ModuleKind::Input,
];

impl ModuleKind {
    pub fn name(self) -> &'static str {
        match self {
            ModuleKind::Display => "display",
            ModuleKind::Graphics => "graphics",
            ModuleKind::Ui => "ui",
            ModuleKind::Clock => "clock",
            ModuleKind::Input => "input",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Native window + platform event source.
pub trait DisplayModule {
    fn init(&mut self, setup: &AppSetup) -> Result<()>;
    fn quit(&mut self);

    /// Window size in logical (DPI-independent) units.
    fn logical_size(&self) -> (u32, u32);

    /// Backing-store size in physical pixels.
    fn drawable_size(&self) -> (u32, u32);

    /// Appends every pending platform event to `queue`, oldest first.
    fn poll_events(&mut self, queue: &mut Vec<PlatformEvent>);
}

/// GPU device + swapchain.
pub trait GraphicsModule {
    /// Display the graphics backend binds its surface to.
    type Display: DisplayModule;

    fn init(&mut self, display: &Self::Display) -> Result<()>;
    fn quit(&mut self);

    /// Reports the current drawable size. Implementations reset the
    /// swapchain only when the size differs from the previous call.
    fn notify_resize(&mut self, width: u32, height: u32);

    /// Finishes and presents the current frame.
    fn present(&mut self);
}

/// Immediate-mode UI layer.
pub trait UiModule {
    /// Graphics backend the recorded draw data is submitted to.
    type Graphics: GraphicsModule;

    fn init(&mut self) -> Result<()>;
    fn quit(&mut self);

    /// Starts recording a UI frame with the logical size and the
    /// drawable/logical ratio on each axis.
    fn begin_frame(&mut self, width: u32, height: u32, scale_x: f32, scale_y: f32);

    /// Stops recording. Nothing is drawn until [`UiModule::submit_draw`].
    fn end_frame(&mut self);

    /// Offers a platform event to the UI. Returns `true` when the UI claims
    /// it, in which case it is not forwarded to input.
    fn process_event(&mut self, event: &PlatformEvent) -> bool;

    /// Draws the data recorded by the last `begin_frame`/`end_frame` pair.
    fn submit_draw(&mut self, graphics: &mut Self::Graphics);
}

/// Frame timing service.
pub trait ClockModule {
    fn init(&mut self) -> Result<()>;
    fn quit(&mut self);
    fn tick(&mut self);

    /// Seconds between the two most recent ticks.
    fn delta(&self) -> f32;

    /// Seconds since `init`.
    fn elapsed(&self) -> f32;
}

/// Key/button/pointer state accumulator.
pub trait InputModule {
    fn init(&mut self) -> Result<()>;
    fn quit(&mut self);

    /// Clears per-frame edges (pressed/released this frame, deltas).
    fn new_frame(&mut self);

    fn process_event(&mut self, event: &PlatformEvent);
}

/// Bundles one concrete type per module kind.
///
/// The associated-type links encode the only cross-module dependencies:
/// graphics binds to the display, and the UI submits through graphics.
pub trait Backend {
    type Display: DisplayModule;
    type Graphics: GraphicsModule<Display = Self::Display>;
    type Ui: UiModule<Graphics = Self::Graphics>;
    type Clock: ClockModule;
    type Input: InputModule;
}

/// Owned module instances for one process run.
pub struct Modules<B: Backend> {
    pub display: B::Display,
    pub graphics: B::Graphics,
    pub ui: B::Ui,
    pub clock: B::Clock,
    pub input: B::Input,
}

impl<B: Backend> Modules<B> {
    pub fn new(
        display: B::Display,
        graphics: B::Graphics,
        ui: B::Ui,
        clock: B::Clock,
        input: B::Input,
    ) -> Self {
        Self {
            display,
            graphics,
            ui,
            clock,
            input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_order_is_display_first_input_last() {
        assert_eq!(INIT_ORDER.first(), Some(&ModuleKind::Display));
        assert_eq!(INIT_ORDER.last(), Some(&ModuleKind::Input));
    }

    #[test]
    fn init_order_has_no_duplicates() {
        for (i, a) in INIT_ORDER.iter().enumerate() {
            for b in &INIT_ORDER[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn kind_display_uses_lowercase_name() {
        assert_eq!(ModuleKind::Graphics.to_string(), "graphics");
        assert_eq!(format!("{} module", ModuleKind::Ui), "ui module");
    }
}
