use crate::module::{Backend, Modules};

/// Context passed to every `App` hook.
///
/// Lifetimes:
/// - `'a` is the duration of the hook invocation
pub struct AppCtx<'a, B: Backend> {
    pub display: &'a mut B::Display,
    pub graphics: &'a mut B::Graphics,
    pub ui: &'a mut B::Ui,
    pub clock: &'a mut B::Clock,
    pub input: &'a mut B::Input,
    quit: &'a mut bool,
}

impl<'a, B: Backend> AppCtx<'a, B> {
    /// Asks the lifecycle to start shutdown negotiation at the top of the
    /// next running tick.
    pub fn request_quit(&mut self) {
        *self.quit = true;
    }

    pub fn quit_requested(&self) -> bool {
        *self.quit
    }
}

impl<B: Backend> Modules<B> {
    pub(crate) fn ctx<'a>(&'a mut self, quit: &'a mut bool) -> AppCtx<'a, B> {
        AppCtx {
            display: &mut self.display,
            graphics: &mut self.graphics,
            ui: &mut self.ui,
            clock: &mut self.clock,
            input: &mut self.input,
            quit,
        }
    }
}
