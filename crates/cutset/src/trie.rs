use std::collections::BTreeMap;

use crate::order::LeakSet;

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<usize, Node>,
    terminal: bool,
}

/// Prefix tree over canonical leak-set sequences.
///
/// Holds the minimal cut-sets found so far. Because stored sets and queries share the
/// catalog order, "T is a subset of Q" is the same as "T's sequence is a subsequence of
/// Q's sequence", which is what [`SetTrie::has_subset_of`] searches for.
#[derive(Debug, Default)]
pub struct SetTrie {
    root: Node,
    len: usize,
}

impl SetTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct sets inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Idempotent: inserting the same set twice stores it once.
    pub fn insert(&mut self, set: &LeakSet) {
        let mut node = &mut self.root;
        for rank in set.iter() {
            node = node.children.entry(rank).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    pub fn contains_exact(&self, set: &LeakSet) -> bool {
        let mut node = &self.root;
        for rank in set.iter() {
            match node.children.get(&rank) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.terminal
    }

    /// True iff some inserted set is a subset of `query` (including `query` itself).
    pub fn has_subset_of(&self, query: &LeakSet) -> bool {
        reaches_terminal(&self.root, query.ranks())
    }
}

// At each node either skip the next query element or consume it along a matching edge.
fn reaches_terminal(node: &Node, seq: &[usize]) -> bool {
    if node.terminal {
        return true;
    }
    if node.children.is_empty() {
        return false;
    }
    let Some((&head, rest)) = seq.split_first() else {
        return false;
    };
    if reaches_terminal(node, rest) {
        return true;
    }
    node.children
        .get(&head)
        .is_some_and(|child| reaches_terminal(child, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ranks: &[usize]) -> LeakSet {
        LeakSet::from_ranks(ranks.iter().copied())
    }

    #[test]
    fn empty_trie_has_nothing() {
        let trie = SetTrie::new();
        assert!(trie.is_empty());
        assert!(!trie.contains_exact(&set(&[])));
        assert!(!trie.has_subset_of(&set(&[0, 1, 2])));
    }

    #[test]
    fn exact_lookup_requires_terminal() {
        let mut trie = SetTrie::new();
        trie.insert(&set(&[0, 2, 5]));
        assert!(trie.contains_exact(&set(&[5, 2, 0])));
        assert!(!trie.contains_exact(&set(&[0, 2])));
        assert!(!trie.contains_exact(&set(&[0, 2, 5, 6])));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut trie = SetTrie::new();
        trie.insert(&set(&[1, 3]));
        trie.insert(&set(&[3, 1]));
        assert_eq!(trie.len(), 1);
        trie.insert(&set(&[1]));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn subset_lookup_matches_subsequences() {
        let mut trie = SetTrie::new();
        trie.insert(&set(&[1, 4]));
        trie.insert(&set(&[0, 2, 3]));

        assert!(trie.has_subset_of(&set(&[1, 4])));
        assert!(trie.has_subset_of(&set(&[0, 1, 2, 4])));
        assert!(trie.has_subset_of(&set(&[0, 2, 3, 5])));
        assert!(!trie.has_subset_of(&set(&[0, 2, 4])));
        assert!(!trie.has_subset_of(&set(&[1])));
        assert!(!trie.has_subset_of(&set(&[])));
    }

    #[test]
    fn empty_set_dominates_everything() {
        let mut trie = SetTrie::new();
        trie.insert(&set(&[]));
        assert!(trie.contains_exact(&set(&[])));
        assert!(trie.has_subset_of(&set(&[])));
        assert!(trie.has_subset_of(&set(&[3, 7])));
    }

    #[test]
    fn shared_prefixes_do_not_leak_terminals() {
        let mut trie = SetTrie::new();
        trie.insert(&set(&[0, 1, 2]));
        assert!(!trie.has_subset_of(&set(&[0, 1])));
        assert!(!trie.has_subset_of(&set(&[0, 2, 3])));
        assert!(trie.has_subset_of(&set(&[0, 1, 2, 3])));
    }
}
