use serde::Serialize;

use crate::observer::SearchObserver;
use crate::order::{CanonicalOrder, LeakSet};
use crate::predicate::{Predicate, PredicateCache};
use crate::shrink::shrink_to_minimal;
use crate::trie::SetTrie;

/// Knobs for [`CutsetSearch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Skip a node before evaluating it when a recorded cut-set is already a subset of
    /// it. Off by default: only exact matches are skipped up front.
    pub prune_dominated: bool,

    /// Sets smaller than this are answered `false` without reaching the predicate.
    pub min_size: usize,
}

/// Counters collected during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub oracle_calls: usize,
    pub cache_hits: usize,
    pub nodes_visited: usize,
    pub pruned_exact: usize,
    pub pruned_dominated: usize,
    pub skipped_below_min_size: usize,
    pub shrinks: usize,
    pub dominated_discarded: usize,
}

/// Result of [`CutsetSearch::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// `false` when the full catalog does not satisfy the predicate.
    pub initial_check_passed: bool,
    /// Minimal cut-sets in discovery order.
    pub cutsets: Vec<LeakSet>,
    pub stats: SearchStats,
}

/// Iterative-deepening enumeration of every minimal satisfying cut-set.
///
/// For each depth bound `1..=n` a depth-first pass generates combinations in increasing
/// catalog-index order. A satisfying node is shrunk, deduplicated against the recorded
/// cut-sets and its supersets are not explored. Smaller witnesses are therefore found
/// before the larger sets they dominate.
pub struct CutsetSearch<'a, P, O> {
    order: &'a CanonicalOrder,
    cache: PredicateCache<P>,
    observer: O,
    options: SearchOptions,
    index: SetTrie,
    found: Vec<LeakSet>,
    stats: SearchStats,
}

impl<'a, P, O> CutsetSearch<'a, P, O>
where
    P: Predicate,
    O: SearchObserver,
{
    pub fn new(order: &'a CanonicalOrder, predicate: P, observer: O) -> Self {
        Self {
            order,
            cache: PredicateCache::new(predicate),
            observer,
            options: SearchOptions::default(),
            index: SetTrie::new(),
            found: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn predicate(&self) -> &P {
        self.cache.inner()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (P, O) {
        (self.cache.into_inner(), self.observer)
    }

    /// Run the full enumeration. State from a previous run (index, cache, counters) is
    /// discarded first.
    pub fn run(&mut self) -> SearchOutcome {
        self.index = SetTrie::new();
        self.found.clear();
        self.stats = SearchStats::default();
        self.cache.reset();

        let n = self.order.len();
        log::info!("Initial check: evaluating all {n} leaks");
        let full = self.order.full_set();
        let initial = self.holds(&full);
        self.observer.initial_check(n, initial);
        if !initial {
            log::info!("Full catalog does not falsify the property; no cut-sets exist");
            return self.outcome(false);
        }

        let mut frontier = Vec::with_capacity(n);
        for depth in 1..=n {
            self.observer.depth_started(depth, n);
            self.visit(&mut frontier, 0, depth);
            log::debug!(
                "Depth {depth}/{n} done: {} cut-set(s), {} oracle call(s)",
                self.found.len(),
                self.cache.oracle_calls()
            );
            self.observer.depth_completed(depth, self.found.len());
        }

        log::info!(
            "Search complete: {} minimal cut-set(s) over {n} leaks",
            self.found.len()
        );
        self.outcome(true)
    }

    fn visit(&mut self, frontier: &mut Vec<usize>, next: usize, depth: usize) {
        if frontier.len() > depth {
            return;
        }
        let set = LeakSet::from_ranks(frontier.iter().copied());
        if self.index.contains_exact(&set) {
            self.stats.pruned_exact += 1;
            return;
        }
        if self.options.prune_dominated && self.index.has_subset_of(&set) {
            self.stats.pruned_dominated += 1;
            return;
        }

        self.stats.nodes_visited += 1;
        if self.holds(&set) {
            self.emit(frontier, &set);
            return;
        }

        for rank in next..self.order.len() {
            if frontier.len() + 1 > depth {
                break;
            }
            frontier.push(rank);
            self.visit(frontier, rank + 1, depth);
            frontier.pop();
        }
    }

    fn emit(&mut self, discovery_order: &[usize], satisfying: &LeakSet) {
        self.stats.shrinks += 1;
        self.observer.shrink_started(satisfying);

        let options = &self.options;
        let cache = &mut self.cache;
        let observer = &mut self.observer;
        let stats = &mut self.stats;
        let minimal = shrink_to_minimal(discovery_order, |set| {
            evaluate(cache, observer, options, stats, set)
        });
        self.observer.shrink_finished(satisfying, &minimal);

        if self.index.has_subset_of(&minimal) {
            log::debug!(
                "Discarding {}: dominated by a recorded cut-set",
                self.order.display(&minimal)
            );
            self.stats.dominated_discarded += 1;
            self.observer.cutset_dominated(&minimal);
            return;
        }

        log::info!(
            "Minimal cut-set #{}: {}",
            self.found.len() + 1,
            self.order.display(&minimal)
        );
        self.index.insert(&minimal);
        self.observer.cutset_found(&minimal);
        self.found.push(minimal);
    }

    fn holds(&mut self, set: &LeakSet) -> bool {
        evaluate(
            &mut self.cache,
            &mut self.observer,
            &self.options,
            &mut self.stats,
            set,
        )
    }

    fn outcome(&mut self, initial_check_passed: bool) -> SearchOutcome {
        self.stats.oracle_calls = self.cache.oracle_calls();
        self.stats.cache_hits = self.cache.cache_hits();
        SearchOutcome {
            initial_check_passed,
            cutsets: self.found.clone(),
            stats: self.stats.clone(),
        }
    }
}

fn evaluate<P, O>(
    cache: &mut PredicateCache<P>,
    observer: &mut O,
    options: &SearchOptions,
    stats: &mut SearchStats,
    set: &LeakSet,
) -> bool
where
    P: Predicate,
    O: SearchObserver,
{
    if set.len() < options.min_size {
        stats.skipped_below_min_size += 1;
        return false;
    }
    cache.evaluate(set, observer)
}
