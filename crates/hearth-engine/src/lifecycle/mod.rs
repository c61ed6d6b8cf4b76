//! Application lifecycle.
//!
//! A run is a walk through [`LifecycleState`]s driven by [`Launcher`]:
//!
//! ```text
//! Init -> Running* -> Cleanup -> Destroy -> Invalid
//!            ^           |
//!            +-----------+  (closing refused)
//! ```
//!
//! Init failing jumps straight to Destroy, which quits only the modules that
//! initialized.

mod launcher;
mod machine;
mod progress;
mod state;

#[cfg(test)]
mod mock;

pub use launcher::{LaunchStats, Launcher, StateHandler};
pub use machine::{InitFailure, Lifecycle};
pub use progress::InitProgress;
pub use state::LifecycleState;

use crate::core::App;
use crate::module::{Backend, Modules};

/// Outcome of [`run`].
#[derive(Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub stats: LaunchStats,
    pub init_failure: Option<InitFailure>,
}

impl RunSummary {
    /// Process exit status. Init failures are logged, not reported through
    /// the status, so this is always 0.
    #[inline]
    pub fn exit_code(&self) -> i32 {
        0
    }

    /// `true` when every module initialized.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.init_failure.is_none()
    }
}

/// Runs `app` on `modules` until the lifecycle reaches Invalid.
pub fn run<B, A>(app: A, modules: Modules<B>) -> RunSummary
where
    B: Backend,
    A: App<B>,
{
    let mut lifecycle = Lifecycle::new(app, modules);
    let stats = Launcher::run(&mut lifecycle);

    log::debug!(
        "lifecycle finished: {} frames, {} running ticks, {} cleanup visits",
        lifecycle.frames(),
        stats.running_ticks,
        stats.cleanup_visits
    );

    lifecycle.finish(stats)
}

#[cfg(test)]
mod tests {
    use super::mock::{self, ScriptedApp};
    use super::*;

    #[test]
    fn run_reports_frames_and_visits() {
        let h = mock::shared();
        let mut app = ScriptedApp::new(&h);
        app.quit_on_frame = Some(5);

        let summary = run(app, mock::modules(&h));

        assert_eq!(summary.frames, 5);
        assert_eq!(summary.stats.cleanup_visits, 1);
        assert!(summary.stats.destroyed);
        assert!(summary.is_clean());
    }

    #[test]
    fn failed_run_still_exits_zero() {
        let h = mock::shared();
        h.borrow_mut().fail = Some(crate::module::ModuleKind::Ui);

        let summary = run(ScriptedApp::new(&h), mock::modules(&h));

        assert_eq!(summary.exit_code(), 0);
        assert!(!summary.is_clean());
        assert_eq!(summary.frames, 0);
    }
}
