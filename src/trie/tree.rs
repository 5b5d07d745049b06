//! Digit trie keyed by pincode

use super::TrieNode;
use crate::model::{MerchantId, Pincode};
use std::collections::BTreeSet;

/// Outcome of removing a merchant from a pincode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The pincode path does not exist in the trie
    NotFound,
    /// The path exists but the merchant was not registered there
    NotRegistered,
    /// The merchant was removed
    Removed,
}

impl Removal {
    /// True if the pincode path was present, whether or not the merchant was
    pub fn is_found(&self) -> bool {
        !matches!(self, Removal::NotFound)
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Removal::Removed)
    }
}

/// A trie mapping pincodes to the merchants that serve them
///
/// Every operation walks at most one node per digit, so cost depends on
/// pincode length and not on how many pincodes are registered. Nodes are
/// only created by inserts and are never pruned: a node whose merchant set
/// empties out stays in place.
#[derive(Default)]
pub struct PincodeTrie {
    root: TrieNode,
}

impl PincodeTrie {
    /// Create a new empty trie
    pub fn new() -> Self {
        PincodeTrie::default()
    }

    /// Rebuild a trie from the records produced by [`PincodeTrie::records`]
    pub fn from_records<I, M>(records: I) -> Self
    where
        I: IntoIterator<Item = (Pincode, M)>,
        M: IntoIterator<Item = MerchantId>,
    {
        let mut trie = PincodeTrie::new();
        for (code, merchants) in records {
            trie.walk_or_create(&code).merchants_mut().extend(merchants);
        }
        trie
    }

    /// Register `merchant` for `code`, creating missing nodes
    ///
    /// Returns false if the pair was already present.
    pub fn insert(&mut self, code: &Pincode, merchant: MerchantId) -> bool {
        self.walk_or_create(code).merchants_mut().insert(merchant)
    }

    /// Unregister `merchant` from `code`
    pub fn remove(&mut self, code: &Pincode, merchant: &MerchantId) -> Removal {
        let mut node = &mut self.root;
        for digit in code.digits() {
            match node.child_mut(digit) {
                Some(child) => node = child,
                None => return Removal::NotFound,
            }
        }
        if node.merchants_mut().remove(merchant) {
            Removal::Removed
        } else {
            Removal::NotRegistered
        }
    }

    /// Node at the exact path for `code`, if it exists
    pub fn get(&self, code: &Pincode) -> Option<&TrieNode> {
        let mut node = &self.root;
        for digit in code.digits() {
            node = node.child(digit)?;
        }
        Some(node)
    }

    /// Exact-match check: the path exists and has at least one merchant
    ///
    /// Being a prefix of a registered pincode does not count.
    pub fn exists(&self, code: &Pincode) -> bool {
        self.get(code).is_some_and(TrieNode::is_terminal)
    }

    /// Merchants registered for exactly `code`
    pub fn search(&self, code: &Pincode) -> BTreeSet<MerchantId> {
        self.get(code)
            .map(|node| node.merchants().clone())
            .unwrap_or_default()
    }

    /// All pincodes with at least one merchant, in lexicographic order
    pub fn entries(&self) -> Vec<(Pincode, &BTreeSet<MerchantId>)> {
        self.collect(TrieNode::is_terminal)
    }

    /// Every node that is terminal or a leaf, in lexicographic order
    ///
    /// Replaying these through [`PincodeTrie::from_records`] recreates the
    /// same set of nodes, emptied ones included.
    pub fn records(&self) -> Vec<(Pincode, &BTreeSet<MerchantId>)> {
        self.collect(|node| node.is_terminal() || node.is_leaf())
    }

    /// Total number of nodes, including the root
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    fn walk_or_create(&mut self, code: &Pincode) -> &mut TrieNode {
        let mut node = &mut self.root;
        for digit in code.digits() {
            node = node.child_or_insert(digit);
        }
        node
    }

    /// Preorder walk keeping a single path buffer; children are pushed in
    /// reverse so they pop in digit order
    fn collect(
        &self,
        keep: impl Fn(&TrieNode) -> bool,
    ) -> Vec<(Pincode, &BTreeSet<MerchantId>)> {
        let mut results = Vec::new();
        let mut path: Vec<u8> = Vec::new();
        let mut stack: Vec<(usize, u8, &TrieNode)> =
            self.root.children().rev().map(|(d, c)| (1, d, c)).collect();

        while let Some((depth, digit, node)) = stack.pop() {
            path.truncate(depth - 1);
            path.push(digit);
            if keep(node) {
                results.push((Pincode::from_digits(&path), node.merchants()));
            }
            stack.extend(node.children().rev().map(|(d, c)| (depth + 1, d, c)));
        }
        results
    }
}

impl Clone for PincodeTrie {
    fn clone(&self) -> Self {
        PincodeTrie::from_records(
            self.records()
                .into_iter()
                .map(|(code, merchants)| (code, merchants.clone())),
        )
    }
}

impl PartialEq for PincodeTrie {
    fn eq(&self, other: &Self) -> bool {
        self.records() == other.records()
    }
}

impl Eq for PincodeTrie {}

impl std::fmt::Debug for PincodeTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
