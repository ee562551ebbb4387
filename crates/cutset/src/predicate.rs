use std::collections::HashMap;

use crate::observer::SearchObserver;
use crate::order::LeakSet;

/// Monotone predicate over leak sets: `true` when the property is falsified with
/// exactly these leaks present.
///
/// Implementations must not fail; an inconclusive evaluation answers `false`.
pub trait Predicate {
    fn holds(&mut self, set: &LeakSet) -> bool;
}

impl<F> Predicate for F
where
    F: FnMut(&LeakSet) -> bool,
{
    fn holds(&mut self, set: &LeakSet) -> bool {
        self(set)
    }
}

/// Memoizing wrapper: each distinct leak set reaches the inner predicate at most once.
///
/// Lookups use exact canonical equality only, never subset relations.
#[derive(Debug)]
pub struct PredicateCache<P> {
    inner: P,
    verdicts: HashMap<LeakSet, bool>,
    oracle_calls: usize,
    cache_hits: usize,
}

impl<P: Predicate> PredicateCache<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            verdicts: HashMap::new(),
            oracle_calls: 0,
            cache_hits: 0,
        }
    }

    pub fn evaluate<O>(&mut self, set: &LeakSet, observer: &mut O) -> bool
    where
        O: SearchObserver + ?Sized,
    {
        if let Some(&holds) = self.verdicts.get(set) {
            self.cache_hits += 1;
            observer.cache_hit(set, holds);
            return holds;
        }

        let index = self.oracle_calls;
        self.oracle_calls += 1;
        observer.evaluation_started(index, set);
        let holds = self.inner.holds(set);
        observer.evaluation_finished(index, set, holds);
        self.verdicts.insert(set.clone(), holds);
        holds
    }

    pub fn cached(&self, set: &LeakSet) -> Option<bool> {
        self.verdicts.get(set).copied()
    }

    /// Drop all verdicts and counters; the cache is scoped to one run.
    pub fn reset(&mut self) {
        self.verdicts.clear();
        self.oracle_calls = 0;
        self.cache_hits = 0;
    }

    pub fn oracle_calls(&self) -> usize {
        self.oracle_calls
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}
