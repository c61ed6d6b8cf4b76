use crate::module::{ModuleKind, INIT_ORDER};

/// Tracks how far module initialization got.
///
/// The initialized set is always a prefix of [`INIT_ORDER`], so a single
/// length describes it. Teardown walks that prefix backwards, which means a
/// module whose `init` failed (and everything after it) is never quit.
#[derive(Debug, Default)]
pub struct InitProgress {
    initialized: usize,
}

impl InitProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next module to initialize, if any.
    #[inline]
    pub fn next(&self) -> Option<ModuleKind> {
        INIT_ORDER.get(self.initialized).copied()
    }

    /// Records a successful init. `kind` must be the next module in order.
    pub fn mark(&mut self, kind: ModuleKind) {
        debug_assert_eq!(
            self.next(),
            Some(kind),
            "{kind} initialized out of order"
        );
        self.initialized += 1;
    }

    /// Modules currently initialized, in init order.
    #[inline]
    pub fn initialized(&self) -> &'static [ModuleKind] {
        &INIT_ORDER[..self.initialized]
    }

    #[inline]
    pub fn is_initialized(&self, kind: ModuleKind) -> bool {
        self.initialized().contains(&kind)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.initialized == INIT_ORDER.len()
    }

    /// Empties the record and returns the modules to quit, last-initialized
    /// first. A second call yields nothing.
    pub fn take_teardown(&mut self) -> impl Iterator<Item = ModuleKind> + use<> {
        let n = std::mem::take(&mut self.initialized);
        INIT_ORDER[..n].iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let p = InitProgress::new();
        assert_eq!(p.next(), Some(ModuleKind::Display));
        assert!(p.initialized().is_empty());
        assert!(!p.is_complete());
    }

    #[test]
    fn teardown_reverses_a_partial_prefix() {
        let mut p = InitProgress::new();
        p.mark(ModuleKind::Display);
        p.mark(ModuleKind::Graphics);
        assert!(p.is_initialized(ModuleKind::Graphics));
        assert!(!p.is_initialized(ModuleKind::Ui));

        let order: Vec<_> = p.take_teardown().collect();
        assert_eq!(order, vec![ModuleKind::Graphics, ModuleKind::Display]);
    }

    #[test]
    fn teardown_reverses_the_full_order() {
        let mut p = InitProgress::new();
        for kind in INIT_ORDER.iter().copied() {
            p.mark(kind);
        }
        assert!(p.is_complete());
        assert_eq!(p.next(), None);

        let order: Vec<_> = p.take_teardown().collect();
        assert_eq!(
            order,
            vec![
                ModuleKind::Input,
                ModuleKind::Clock,
                ModuleKind::Ui,
                ModuleKind::Graphics,
                ModuleKind::Display,
            ]
        );
    }

    #[test]
    fn teardown_happens_once() {
        let mut p = InitProgress::new();
        p.mark(ModuleKind::Display);
        assert_eq!(p.take_teardown().count(), 1);
        assert_eq!(p.take_teardown().count(), 0);
        assert!(p.initialized().is_empty());
    }

    #[test]
    fn nothing_initialized_means_nothing_torn_down() {
        let mut p = InitProgress::new();
        assert_eq!(p.take_teardown().count(), 0);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn out_of_order_init_is_a_programming_error() {
        let mut p = InitProgress::new();
        p.mark(ModuleKind::Graphics);
    }
}
