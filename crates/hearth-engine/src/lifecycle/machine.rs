use anyhow::Result;

use crate::core::{App, AppSetup};
use crate::module::{
    Backend, ClockModule, DisplayModule, GraphicsModule, InputModule, ModuleKind, Modules,
    PlatformEvent, UiModule,
};

use super::launcher::{LaunchStats, StateHandler};
use super::progress::InitProgress;
use super::state::LifecycleState;
use super::RunSummary;

/// Module whose `init` failed, with the error it returned.
#[derive(Debug)]
pub struct InitFailure {
    pub module: ModuleKind,
    pub error: anyhow::Error,
}

/// Lifecycle state handlers for one application run.
///
/// Owns the application and its modules. Module init/quit ordering is
/// tracked by [`InitProgress`]; user hooks are reached through
/// [`crate::core::AppCtx`].
pub struct Lifecycle<B: Backend, A: App<B>> {
    app: A,
    modules: Modules<B>,
    progress: InitProgress,
    quit_requested: bool,
    awake: bool,
    pending: Vec<PlatformEvent>,
    frames: u64,
    init_failure: Option<InitFailure>,
}

impl<B: Backend, A: App<B>> Lifecycle<B, A> {
    pub fn new(app: A, modules: Modules<B>) -> Self {
        Self {
            app,
            modules,
            progress: InitProgress::new(),
            quit_requested: false,
            awake: false,
            pending: Vec::with_capacity(64),
            frames: 0,
            init_failure: None,
        }
    }

    #[inline]
    pub fn app(&self) -> &A {
        &self.app
    }

    #[inline]
    pub fn modules(&self) -> &Modules<B> {
        &self.modules
    }

    #[inline]
    pub fn progress(&self) -> &InitProgress {
        &self.progress
    }

    /// Completed frames (full gui/update/render/present passes).
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn init_failure(&self) -> Option<&InitFailure> {
        self.init_failure.as_ref()
    }

    pub fn finish(self, stats: LaunchStats) -> RunSummary {
        RunSummary {
            frames: self.frames,
            stats,
            init_failure: self.init_failure,
        }
    }

    fn init_module(&mut self, kind: ModuleKind, setup: &AppSetup) -> Result<()> {
        let m = &mut self.modules;
        match kind {
            ModuleKind::Display => m.display.init(setup),
            ModuleKind::Graphics => m.graphics.init(&m.display),
            ModuleKind::Ui => m.ui.init(),
            ModuleKind::Clock => m.clock.init(),
            ModuleKind::Input => m.input.init(),
        }
    }

    fn quit_module(&mut self, kind: ModuleKind) {
        let m = &mut self.modules;
        match kind {
            ModuleKind::Display => m.display.quit(),
            ModuleKind::Graphics => m.graphics.quit(),
            ModuleKind::Ui => m.ui.quit(),
            ModuleKind::Clock => m.clock.quit(),
            ModuleKind::Input => m.input.quit(),
        }
    }

    /// Drains this frame's platform events. Returns `true` if a close was
    /// among them.
    fn pump_events(&mut self) -> bool {
        let m = &mut self.modules;
        m.display.poll_events(&mut self.pending);

        let mut close = false;
        for event in self.pending.drain(..) {
            if event.is_close() {
                close = true;
                continue;
            }
            if !m.ui.process_event(&event) {
                m.input.process_event(&event);
            }
        }
        close
    }
}

/// Drawable/logical ratio on one axis; 1.0 while the window is collapsed.
#[inline]
fn scale_ratio(drawable: u32, logical: u32) -> f32 {
    if logical == 0 || drawable == 0 {
        1.0
    } else {
        drawable as f32 / logical as f32
    }
}

impl<B: Backend, A: App<B>> StateHandler for Lifecycle<B, A> {
    fn init(&mut self) -> LifecycleState {
        let setup = self.app.setup();
        log::info!(
            "starting '{}' ({}x{})",
            setup.title,
            setup.width,
            setup.height
        );

        while let Some(kind) = self.progress.next() {
            if let Err(error) = self.init_module(kind, &setup) {
                log::error!("{kind} module failed to initialize: {error:#}");
                self.init_failure = Some(InitFailure {
                    module: kind,
                    error,
                });
                return LifecycleState::Destroy;
            }
            self.progress.mark(kind);
            log::info!("{kind} module initialized");
        }

        let mut ctx = self.modules.ctx(&mut self.quit_requested);
        self.app.awake(&mut ctx);
        self.app.start(&mut ctx);
        self.awake = true;

        LifecycleState::Default
    }

    fn running(&mut self) -> LifecycleState {
        if self.quit_requested {
            return LifecycleState::Cleanup;
        }

        self.modules.input.new_frame();
        if self.pump_events() {
            log::debug!("close requested by the platform");
            return LifecycleState::Cleanup;
        }

        self.modules.clock.tick();

        let (lw, lh) = self.modules.display.logical_size();
        let (dw, dh) = self.modules.display.drawable_size();

        let mut ctx = self.modules.ctx(&mut self.quit_requested);

        ctx.ui.begin_frame(lw, lh, scale_ratio(dw, lw), scale_ratio(dh, lh));
        self.app.gui(&mut ctx);
        ctx.ui.end_frame();

        self.app.update(&mut ctx);

        ctx.graphics.notify_resize(dw, dh);
        self.app.render(&mut ctx);
        ctx.ui.submit_draw(ctx.graphics);
        ctx.graphics.present();

        self.frames += 1;
        LifecycleState::Default
    }

    fn cleanup(&mut self) -> LifecycleState {
        let mut ctx = self.modules.ctx(&mut self.quit_requested);
        let allowed = self.app.closing(&mut ctx);
        self.quit_requested = allowed;

        if allowed {
            LifecycleState::Destroy
        } else {
            log::info!("quit cancelled by the application");
            LifecycleState::Running
        }
    }

    fn destroy(&mut self) -> LifecycleState {
        if std::mem::take(&mut self.awake) {
            let mut ctx = self.modules.ctx(&mut self.quit_requested);
            self.app.quit(&mut ctx);
        }

        for kind in self.progress.take_teardown() {
            self.quit_module(kind);
            log::info!("{kind} module shut down");
        }

        LifecycleState::Invalid
    }
}
