//! # Leakcut Cut-set
//!
//! Enumeration of every minimal leak combination that falsifies a security lemma,
//! given a monotone predicate over leak sets.
//!
//! ## Pipeline
//!
//! ```text
//! CanonicalOrder (catalog order)
//!     │
//!     ├──> CutsetSearch (iterative deepening, depth 1..=n)
//!     │      ├─ skip exact matches in the SetTrie
//!     │      ├─ PredicateCache ──> Predicate (oracle)
//!     │      ├─ shrink_to_minimal (one pass, discovery order)
//!     │      └─ dedup: SetTrie::has_subset_of
//!     │
//!     └──> SearchOutcome (cut-sets in discovery order + stats)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use leakcut_cutset::{CanonicalOrder, CutsetSearch, LeakSet, NoopObserver};
//!
//! let order = CanonicalOrder::new(["a", "b", "c", "d", "e"]).unwrap();
//! let holds = |set: &LeakSet| {
//!     (set.contains(0) || set.contains(1)) && (set.contains(2) || set.contains(3))
//! };
//!
//! let outcome = CutsetSearch::new(&order, holds, NoopObserver).run();
//! assert_eq!(outcome.cutsets.len(), 4);
//! assert_eq!(order.names(&outcome.cutsets[0]), vec!["a", "c"]);
//! ```

mod error;
mod observer;
mod order;
mod predicate;
mod search;
mod shrink;
mod trie;

pub use error::{CutsetError, Result};
pub use observer::{NoopObserver, SearchObserver};
pub use order::{CanonicalOrder, LeakSet};
pub use predicate::{Predicate, PredicateCache};
pub use search::{CutsetSearch, SearchOptions, SearchOutcome, SearchStats};
pub use shrink::shrink_to_minimal;
pub use trie::SetTrie;
