/// Lifecycle state.
///
/// `Default` is a pseudo-state: a handler returns it to mean "advance to the
/// canonical successor". `Invalid` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LifecycleState {
    Init,
    Running,
    Cleanup,
    Destroy,
    Default,
    Invalid,
}

impl LifecycleState {
    /// Canonical successor used when a handler returns `Default`.
    ///
    /// `None` for the pseudo-state and the terminal state, which have no
    /// handler and are never current.
    #[inline]
    pub const fn successor(self) -> Option<LifecycleState> {
        match self {
            LifecycleState::Init => Some(LifecycleState::Running),
            LifecycleState::Running => Some(LifecycleState::Running),
            LifecycleState::Cleanup => Some(LifecycleState::Destroy),
            LifecycleState::Destroy => Some(LifecycleState::Invalid),
            LifecycleState::Default | LifecycleState::Invalid => None,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Invalid)
    }
}

/// Resolves the state to enter after `current`'s handler returned `requested`.
///
/// Beyond the successor table this enforces the run shape:
/// - Init is entered only once; asking for it again yields the successor.
/// - Destroy is always followed by Invalid, whatever its handler returns.
/// - Invalid cannot be reached without passing through Destroy.
pub(crate) fn resolve(current: LifecycleState, requested: LifecycleState) -> LifecycleState {
    use LifecycleState::*;

    let canonical = current.successor().unwrap_or(Invalid);

    if current == Destroy {
        return Invalid;
    }

    match requested {
        Default => canonical,
        Init => {
            log::warn!("{current:?} handler asked to re-enter Init; using {canonical:?}");
            canonical
        }
        Invalid => {
            log::warn!("{current:?} handler asked for Invalid before teardown; entering Destroy");
            Destroy
        }
        Running | Cleanup | Destroy => requested,
    }
}
