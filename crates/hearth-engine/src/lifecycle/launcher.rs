use super::state::{resolve, LifecycleState};

/// One handler per operational state.
///
/// Each handler returns the state to enter next, or `Default` for the
/// canonical successor. Handlers communicate only through that value.
pub trait StateHandler {
    fn init(&mut self) -> LifecycleState {
        LifecycleState::Default
    }

    fn running(&mut self) -> LifecycleState {
        LifecycleState::Default
    }

    fn cleanup(&mut self) -> LifecycleState {
        LifecycleState::Default
    }

    /// Return value is ignored; Destroy is always followed by Invalid.
    fn destroy(&mut self) -> LifecycleState {
        LifecycleState::Default
    }
}

/// Handler invocation counts for one run.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LaunchStats {
    pub running_ticks: u64,
    pub cleanup_visits: u64,
    pub destroyed: bool,
}

/// Outermost driver: invokes the current state's handler until Invalid.
#[derive(Debug, Default)]
pub struct Launcher;

impl Launcher {
    pub fn run<H: StateHandler>(handler: &mut H) -> LaunchStats {
        Self::run_traced(handler, |_| {})
    }

    /// Like [`Launcher::run`], calling `observe` with every state entered,
    /// starting with Init and ending with Invalid.
    pub fn run_traced<H, F>(handler: &mut H, mut observe: F) -> LaunchStats
    where
        H: StateHandler,
        F: FnMut(LifecycleState),
    {
        let mut stats = LaunchStats::default();
        let mut state = LifecycleState::Init;

        loop {
            observe(state);

            let requested = match state {
                LifecycleState::Init => handler.init(),
                LifecycleState::Running => {
                    stats.running_ticks += 1;
                    handler.running()
                }
                LifecycleState::Cleanup => {
                    stats.cleanup_visits += 1;
                    handler.cleanup()
                }
                LifecycleState::Destroy => {
                    stats.destroyed = true;
                    handler.destroy()
                }
                LifecycleState::Invalid => break,
                LifecycleState::Default => {
                    debug_assert!(false, "Default is never a current state");
                    LifecycleState::Invalid
                }
            };

            let next = resolve(state, requested);
            if next != state {
                log::debug!("lifecycle: {state:?} -> {next:?}");
            }
            state = next;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::LifecycleState::*;
    use super::*;

    /// Replays canned handler results; falls back to `Default` when empty.
    struct Scripted {
        replies: VecDeque<LifecycleState>,
        calls: Vec<&'static str>,
    }

    impl Scripted {
        fn new(replies: &[LifecycleState]) -> Self {
            Self {
                replies: replies.iter().copied().collect(),
                calls: Vec::new(),
            }
        }

        fn reply(&mut self, name: &'static str) -> LifecycleState {
            self.calls.push(name);
            self.replies.pop_front().unwrap_or(Default)
        }
    }

    impl StateHandler for Scripted {
        fn init(&mut self) -> LifecycleState {
            self.reply("init")
        }
        fn running(&mut self) -> LifecycleState {
            self.reply("running")
        }
        fn cleanup(&mut self) -> LifecycleState {
            self.reply("cleanup")
        }
        fn destroy(&mut self) -> LifecycleState {
            self.reply("destroy")
        }
    }

    fn trace(replies: &[LifecycleState]) -> (Vec<LifecycleState>, LaunchStats) {
        let mut handler = Scripted::new(replies);
        let mut seen = Vec::new();
        let stats = Launcher::run_traced(&mut handler, |s| seen.push(s));
        (seen, stats)
    }

    fn count(seen: &[LifecycleState], s: LifecycleState) -> usize {
        seen.iter().filter(|&&x| x == s).count()
    }

    #[test]
    fn normal_run_shape() {
        let (seen, stats) = trace(&[Default, Default, Default, Cleanup, Destroy]);
        assert_eq!(
            seen,
            vec![Init, Running, Running, Running, Cleanup, Destroy, Invalid]
        );
        assert_eq!(stats.running_ticks, 3);
        assert_eq!(stats.cleanup_visits, 1);
        assert!(stats.destroyed);
    }

    #[test]
    fn init_failure_skips_the_loop() {
        let (seen, stats) = trace(&[Destroy]);
        assert_eq!(seen, vec![Init, Destroy, Invalid]);
        assert_eq!(stats.running_ticks, 0);
    }

    #[test]
    fn cleanup_refusal_cycles_back_to_running() {
        let (seen, _) = trace(&[
            Default, Cleanup, Running, Cleanup, Running, Cleanup, Destroy,
        ]);
        assert_eq!(count(&seen, Cleanup), 3);
        assert_eq!(count(&seen, Destroy), 1);
        assert_eq!(seen.last(), Some(&Invalid));
    }

    #[test]
    fn cleanup_default_goes_to_destroy() {
        let (seen, _) = trace(&[Cleanup, Default]);
        assert_eq!(seen, vec![Init, Cleanup, Destroy, Invalid]);
    }

    #[test]
    fn destroy_reply_is_ignored() {
        let (seen, _) = trace(&[Destroy, Running]);
        assert_eq!(seen, vec![Init, Destroy, Invalid]);
    }

    #[test]
    fn hostile_replies_still_visit_init_and_destroy_once() {
        let replies = [Init, Invalid, Init, Running, Default, Init, Cleanup, Init, Destroy, Init];
        let (seen, _) = trace(&replies);
        assert_eq!(count(&seen, Init), 1);
        assert_eq!(count(&seen, Destroy), 1);
        assert_eq!(seen.last(), Some(&Invalid));
    }

    #[test]
    fn every_finite_script_terminates_at_invalid() {
        let alphabet = [Init, Running, Cleanup, Destroy, Default, Invalid];
        // All scripts of length 3 followed by an explicit Cleanup/Destroy pair,
        // so Running loops always end.
        for a in alphabet {
            for b in alphabet {
                for c in alphabet {
                    let (seen, _) = trace(&[a, b, c, Cleanup, Destroy, Destroy]);
                    assert_eq!(seen.last(), Some(&Invalid), "script {a:?} {b:?} {c:?}");
                    assert_eq!(count(&seen, Init), 1);
                    assert_eq!(count(&seen, Destroy), 1);
                    assert_eq!(count(&seen, Invalid), 1);
                }
            }
        }
    }

    #[test]
    fn handlers_called_match_states_entered() {
        let mut handler = Scripted::new(&[Default, Cleanup, Default]);
        Launcher::run(&mut handler);
        assert_eq!(
            handler.calls,
            vec!["init", "running", "cleanup", "destroy"]
        );
    }
}
