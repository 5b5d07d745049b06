//! Trie node types

use crate::model::MerchantId;
use std::collections::BTreeSet;

/// Number of child slots per node, one per decimal digit
pub const RADIX: usize = 10;

/// A node in the pincode trie
///
/// The path from the root to a node spells a pincode; `merchants` holds the
/// merchants registered for exactly that pincode. Children are indexed by
/// digit value rather than kept in a map, since the alphabet is fixed.
///
/// Pincodes have no length limit, so nothing here recurses per digit:
/// counting and dropping walk the subtree with an explicit stack.
#[derive(Default)]
pub struct TrieNode {
    children: [Option<Box<TrieNode>>; RADIX],
    merchants: BTreeSet<MerchantId>,
}

impl TrieNode {
    /// Create a node with no children and no merchants
    pub fn new() -> Self {
        TrieNode::default()
    }

    /// Child for the given digit, if that path has been walked
    pub fn child(&self, digit: usize) -> Option<&TrieNode> {
        self.children[digit].as_deref()
    }

    pub fn child_mut(&mut self, digit: usize) -> Option<&mut TrieNode> {
        self.children[digit].as_deref_mut()
    }

    /// Child for the given digit, creating it if missing
    pub fn child_or_insert(&mut self, digit: usize) -> &mut TrieNode {
        self.children[digit].get_or_insert_with(Box::default)
    }

    /// Existing children in digit order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (u8, &TrieNode)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(d, c)| c.as_deref().map(|n| (d as u8, n)))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Merchants registered at this exact node
    pub fn merchants(&self) -> &BTreeSet<MerchantId> {
        &self.merchants
    }

    pub(crate) fn merchants_mut(&mut self) -> &mut BTreeSet<MerchantId> {
        &mut self.merchants
    }

    /// True if at least one merchant serves the code ending here
    pub fn is_terminal(&self) -> bool {
        !self.merchants.is_empty()
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children().map(|(_, child)| child));
        }
        count
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TrieNode>> =
            self.children.iter_mut().filter_map(Option::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}

impl std::fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNode")
            .field(
                "children",
                &self.children().map(|(d, _)| d).collect::<Vec<_>>(),
            )
            .field("merchants", &self.merchants)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_empty() {
        let node = TrieNode::new();
        assert!(!node.is_terminal());
        assert!(node.is_leaf());
        assert_eq!(node.children().count(), 0);
        assert_eq!(node.node_count(), 1);
    }

    #[test]
    fn test_child_or_insert_reuses_existing() {
        let mut node = TrieNode::new();
        node.child_or_insert(4).merchants_mut().insert("m1".into());
        node.child_or_insert(4);

        assert_eq!(node.children().count(), 1);
        assert!(node.child(4).unwrap().is_terminal());
        assert!(node.child(3).is_none());
        assert_eq!(node.node_count(), 2);
    }

    #[test]
    fn test_children_in_digit_order() {
        let mut node = TrieNode::new();
        node.child_or_insert(9);
        node.child_or_insert(0);
        node.child_or_insert(5);

        let digits: Vec<u8> = node.children().map(|(d, _)| d).collect();
        assert_eq!(digits, vec![0, 5, 9]);
    }

    #[test]
    fn test_deep_chain_counts_and_drops() {
        let mut root = TrieNode::new();
        let mut node = &mut root;
        for _ in 0..200_000 {
            node = node.child_or_insert(1);
        }
        node.merchants_mut().insert("deep".into());

        assert_eq!(root.node_count(), 200_001);
        drop(root);
    }
}
