use crate::module::Backend;

use super::ctx::AppCtx;
use super::setup::AppSetup;

/// Application contract driven by the lifecycle.
///
/// Only [`App::setup`] is mandatory. Hook order for one run:
///
/// ```text
/// setup -> awake -> start -> { gui -> update -> render }* -> closing+ -> quit
/// ```
///
/// `closing` may run several times: each `false` sends the lifecycle back to
/// the frame loop. `quit` runs only if `awake` ran.
pub trait App<B: Backend> {
    /// Returns the window configuration. Called once, before any module init.
    fn setup(&mut self) -> AppSetup;

    /// One-time heavy loading (models, shaders, uniforms). All modules are
    /// initialized when this runs.
    fn awake(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }

    /// Populates the scene. Runs right after `awake`.
    fn start(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }

    /// Per-frame simulation.
    fn update(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }

    /// Per-frame drawing. Runs after `update`, before the UI is submitted.
    fn render(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }

    /// Per-frame UI recording, between the UI frame begin/end.
    fn gui(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }

    /// Asked on every quit attempt. Returning `false` cancels the attempt.
    fn closing(&mut self, ctx: &mut AppCtx<'_, B>) -> bool {
        let _ = ctx;
        true
    }

    /// Releases user-owned resources. Modules are still alive.
    fn quit(&mut self, ctx: &mut AppCtx<'_, B>) {
        let _ = ctx;
    }
}
