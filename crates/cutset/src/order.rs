use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CutsetError, Result};

/// Canonical form of a set of leaks: the ascending sequence of catalog ranks.
///
/// Two leak sets are equal iff their canonical sequences are equal, so the type can be
/// used directly as a cache key and compared without going back to the labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LeakSet {
    ranks: Vec<usize>,
}

impl LeakSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a leak set from ranks in any order; duplicates collapse.
    pub fn from_ranks<I: IntoIterator<Item = usize>>(ranks: I) -> Self {
        let mut ranks: Vec<usize> = ranks.into_iter().collect();
        ranks.sort_unstable();
        ranks.dedup();
        Self { ranks }
    }

    #[must_use]
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranks.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn contains(&self, rank: usize) -> bool {
        self.ranks.binary_search(&rank).is_ok()
    }

    /// Copy of this set without `rank`.
    #[must_use]
    pub fn without(&self, rank: usize) -> Self {
        Self {
            ranks: self.ranks.iter().copied().filter(|&r| r != rank).collect(),
        }
    }

    /// Copy of this set with `rank` added.
    #[must_use]
    pub fn with(&self, rank: usize) -> Self {
        let mut ranks = self.ranks.clone();
        if let Err(pos) = ranks.binary_search(&rank) {
            ranks.insert(pos, rank);
        }
        Self { ranks }
    }

    /// Merge walk over both canonical sequences.
    pub fn is_subset_of(&self, other: &LeakSet) -> bool {
        let mut theirs = other.ranks.iter().copied();
        self.ranks
            .iter()
            .all(|&mine| theirs.by_ref().find(|&r| r >= mine) == Some(mine))
    }
}

impl FromIterator<usize> for LeakSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_ranks(iter)
    }
}

/// Fixed total order over leak labels, taken from the catalog.
///
/// Every other component canonicalizes through this order; it never changes during a run.
#[derive(Debug, Clone)]
pub struct CanonicalOrder {
    labels: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl CanonicalOrder {
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut ranks = HashMap::new();
        for label in labels {
            let label = label.into();
            if ranks.contains_key(&label) {
                return Err(CutsetError::DuplicateLabel(label));
            }
            ranks.insert(label.clone(), ordered.len());
            ordered.push(label);
        }
        Ok(Self {
            labels: ordered,
            ranks,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rank(&self, label: &str) -> Option<usize> {
        self.ranks.get(label).copied()
    }

    pub fn label(&self, rank: usize) -> Option<&str> {
        self.labels.get(rank).map(String::as_str)
    }

    /// Canonicalize a collection of labels given in any order.
    pub fn leak_set<I, S>(&self, labels: I) -> Result<LeakSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = Vec::new();
        for label in labels {
            let label = label.as_ref();
            let rank = self
                .rank(label)
                .ok_or_else(|| CutsetError::UnknownLabel(label.to_string()))?;
            ranks.push(rank);
        }
        Ok(LeakSet::from_ranks(ranks))
    }

    pub fn full_set(&self) -> LeakSet {
        LeakSet::from_ranks(0..self.len())
    }

    /// Labels of `set` in catalog order.
    pub fn names<'a>(&'a self, set: &LeakSet) -> Vec<&'a str> {
        set.iter().filter_map(|rank| self.label(rank)).collect()
    }

    /// `{a, b, c}` rendering used in logs and progress output.
    pub fn display(&self, set: &LeakSet) -> String {
        format!("{{{}}}", self.names(set).join(", "))
    }
}
