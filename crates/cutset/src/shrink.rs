use crate::order::LeakSet;

/// Single-pass minimization of a satisfying set.
///
/// `discovery_order` lists the members of the satisfying set in the order they were
/// added during the search. Each member is tested once, in that order, against the
/// current working set and dropped if the predicate still holds without it.
///
/// A surviving member was necessary relative to the working set at the moment it was
/// tested. Members are not re-tested after later removals.
pub fn shrink_to_minimal<F>(discovery_order: &[usize], mut holds: F) -> LeakSet
where
    F: FnMut(&LeakSet) -> bool,
{
    let mut working = LeakSet::from_ranks(discovery_order.iter().copied());
    for &rank in discovery_order {
        let candidate = working.without(rank);
        if holds(&candidate) {
            working = candidate;
        }
    }
    working
}
