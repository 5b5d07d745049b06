//! Digit trie mapping pincodes to merchant sets
//!
//! This implements a prefix tree where:
//! - Each edge is one decimal digit of a pincode
//! - Each node holds the merchants registered for the pincode spelled by
//!   its path from the root
//! - Pincodes sharing a prefix share the nodes for that prefix

mod node;
mod tree;

pub use node::{TrieNode, RADIX};
pub use tree::{PincodeTrie, Removal};
