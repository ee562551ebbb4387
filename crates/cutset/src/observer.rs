use crate::order::LeakSet;

/// Progress hooks fired by [`crate::CutsetSearch`] and [`crate::PredicateCache`].
///
/// Every method has a no-op default so observers only implement what they render.
pub trait SearchObserver {
    /// Result of evaluating the full catalog before the search starts.
    fn initial_check(&mut self, _catalog_len: usize, _holds: bool) {}

    fn depth_started(&mut self, _depth: usize, _max_depth: usize) {}

    /// `found` is the number of cut-sets recorded so far.
    fn depth_completed(&mut self, _depth: usize, _found: usize) {}

    /// About to call the oracle; `index` counts oracle calls from zero.
    fn evaluation_started(&mut self, _index: usize, _set: &LeakSet) {}

    fn evaluation_finished(&mut self, _index: usize, _set: &LeakSet, _holds: bool) {}

    /// Verdict served from the cache, no oracle call made.
    fn cache_hit(&mut self, _set: &LeakSet, _holds: bool) {}

    fn shrink_started(&mut self, _set: &LeakSet) {}

    fn shrink_finished(&mut self, _original: &LeakSet, _minimal: &LeakSet) {}

    /// A new minimal cut-set was recorded.
    fn cutset_found(&mut self, _cutset: &LeakSet) {}

    /// A shrunk set was discarded because a recorded cut-set is a subset of it.
    fn cutset_dominated(&mut self, _candidate: &LeakSet) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn initial_check(&mut self, catalog_len: usize, holds: bool) {
        (**self).initial_check(catalog_len, holds);
    }

    fn depth_started(&mut self, depth: usize, max_depth: usize) {
        (**self).depth_started(depth, max_depth);
    }

    fn depth_completed(&mut self, depth: usize, found: usize) {
        (**self).depth_completed(depth, found);
    }

    fn evaluation_started(&mut self, index: usize, set: &LeakSet) {
        (**self).evaluation_started(index, set);
    }

    fn evaluation_finished(&mut self, index: usize, set: &LeakSet, holds: bool) {
        (**self).evaluation_finished(index, set, holds);
    }

    fn cache_hit(&mut self, set: &LeakSet, holds: bool) {
        (**self).cache_hit(set, holds);
    }

    fn shrink_started(&mut self, set: &LeakSet) {
        (**self).shrink_started(set);
    }

    fn shrink_finished(&mut self, original: &LeakSet, minimal: &LeakSet) {
        (**self).shrink_finished(original, minimal);
    }

    fn cutset_found(&mut self, cutset: &LeakSet) {
        (**self).cutset_found(cutset);
    }

    fn cutset_dominated(&mut self, candidate: &LeakSet) {
        (**self).cutset_dominated(candidate);
    }
}
