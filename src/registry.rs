//! The pincode registry
//!
//! This module provides the main entry point for querying and mutating the
//! pincode → merchant mapping.

use crate::model::{MerchantId, Pincode};
use crate::trie::{PincodeTrie, Removal};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The registry index
///
/// Owns the pincode trie plus a reverse index from each merchant to the
/// pincodes it currently serves. The reverse index is derived from the trie
/// and is kept in step with every insert and delete.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    trie: PincodeTrie,
    by_merchant: BTreeMap<MerchantId, BTreeSet<Pincode>>,
}

/// Size counters for a registry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Trie nodes, including the root
    pub nodes: usize,
    /// Pincodes with at least one merchant
    pub pincodes: usize,
    /// Merchants serving at least one pincode
    pub merchants: usize,
    /// Registered (pincode, merchant) pairs
    pub pairs: usize,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Registry::default()
    }

    /// Build a registry around an existing trie, rebuilding the reverse index
    pub fn from_trie(trie: PincodeTrie) -> Self {
        let mut by_merchant: BTreeMap<MerchantId, BTreeSet<Pincode>> = BTreeMap::new();
        for (code, merchants) in trie.entries() {
            for merchant in merchants {
                by_merchant
                    .entry(merchant.clone())
                    .or_default()
                    .insert(code.clone());
            }
        }
        Registry { trie, by_merchant }
    }

    pub fn trie(&self) -> &PincodeTrie {
        &self.trie
    }

    // === Index primitives ===

    /// Register `merchant` for `code`
    ///
    /// Idempotent; returns false if the pair was already registered.
    pub fn insert(&mut self, code: &Pincode, merchant: impl Into<MerchantId>) -> bool {
        let merchant = merchant.into();
        let added = self.trie.insert(code, merchant.clone());
        if added {
            self.by_merchant
                .entry(merchant)
                .or_default()
                .insert(code.clone());
        }
        added
    }

    /// Unregister `merchant` from `code`
    ///
    /// `Removal::NotFound` means the pincode path is absent altogether.
    pub fn delete(&mut self, code: &Pincode, merchant: &MerchantId) -> Removal {
        let outcome = self.trie.remove(code, merchant);
        if outcome.is_removed() {
            self.forget(code, merchant);
        }
        outcome
    }

    /// Move `merchant` from `old` to `new`
    ///
    /// This is a delete followed by an insert. The insert happens regardless
    /// of the delete outcome, which is returned.
    pub fn update(&mut self, old: &Pincode, new: &Pincode, merchant: &MerchantId) -> Removal {
        let outcome = self.delete(old, merchant);
        self.insert(new, merchant);
        outcome
    }

    /// True if at least one merchant serves exactly `code`
    pub fn exists(&self, code: &Pincode) -> bool {
        self.trie.exists(code)
    }

    /// Merchants serving exactly `code`; empty if none
    pub fn search(&self, code: &Pincode) -> BTreeSet<MerchantId> {
        self.trie.search(code)
    }

    /// Register `merchant` for every code in `codes`
    ///
    /// Returns the number of newly registered pairs.
    pub fn load_merchant<'a, I>(&mut self, codes: I, merchant: impl Into<MerchantId>) -> usize
    where
        I: IntoIterator<Item = &'a Pincode>,
    {
        let merchant = merchant.into();
        codes
            .into_iter()
            .filter(|code| self.insert(code, &merchant))
            .count()
    }

    // === Merchant view ===

    /// Pincodes `merchant` currently serves
    pub fn merchant_codes(&self, merchant: &MerchantId) -> Option<&BTreeSet<Pincode>> {
        self.by_merchant.get(merchant)
    }

    /// All merchants serving at least one pincode
    pub fn merchants(&self) -> impl Iterator<Item = &MerchantId> {
        self.by_merchant.keys()
    }

    pub fn has_merchant(&self, merchant: &MerchantId) -> bool {
        self.by_merchant.contains_key(merchant)
    }

    /// Every serviceable pincode with its merchants, in pincode order
    pub fn entries(&self) -> Vec<(Pincode, &BTreeSet<MerchantId>)> {
        self.trie.entries()
    }

    pub fn stats(&self) -> RegistryStats {
        let entries = self.trie.entries();
        RegistryStats {
            nodes: self.trie.node_count(),
            pincodes: entries.len(),
            merchants: self.by_merchant.len(),
            pairs: entries.iter().map(|(_, m)| m.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_merchant.is_empty()
    }

    fn forget(&mut self, code: &Pincode, merchant: &MerchantId) {
        if let Some(codes) = self.by_merchant.get_mut(merchant) {
            codes.remove(code);
            if codes.is_empty() {
                self.by_merchant.remove(merchant);
            }
        }
    }
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool {
        self.trie == other.trie
    }
}

impl Eq for Registry {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(s: &str) -> Pincode {
        Pincode::parse(s).unwrap()
    }

    fn m(s: &str) -> MerchantId {
        MerchantId::new(s)
    }

    #[test]
    fn test_insert_round_trip() {
        let mut reg = Registry::new();
        reg.insert(&pin("110001"), "m1");

        assert!(reg.exists(&pin("110001")));
        assert!(reg.search(&pin("110001")).contains(&m("m1")));
        assert_eq!(
            reg.merchant_codes(&m("m1")),
            Some(&BTreeSet::from([pin("110001")]))
        );
    }

    #[test]
    fn test_update_moves_merchant() {
        let mut reg = Registry::new();
        reg.insert(&pin("110001"), "m1");

        let outcome = reg.update(&pin("110001"), &pin("110002"), &m("m1"));
        assert_eq!(outcome, Removal::Removed);
        assert!(!reg.search(&pin("110001")).contains(&m("m1")));
        assert!(reg.search(&pin("110002")).contains(&m("m1")));
        assert_eq!(
            reg.merchant_codes(&m("m1")),
            Some(&BTreeSet::from([pin("110002")]))
        );
    }

    #[test]
    fn test_update_from_missing_code_still_inserts() {
        let mut reg = Registry::new();
        let outcome = reg.update(&pin("999999"), &pin("110002"), &m("m1"));

        assert_eq!(outcome, Removal::NotFound);
        assert!(reg.exists(&pin("110002")));
    }

    #[test]
    fn test_delete_on_empty_registry_is_not_found() {
        let mut reg = Registry::new();
        assert_eq!(reg.delete(&pin("999999"), &m("m1")), Removal::NotFound);
    }

    #[test]
    fn test_delete_updates_reverse_index() {
        let mut reg = Registry::new();
        reg.insert(&pin("110001"), "m1");
        reg.insert(&pin("110002"), "m1");

        reg.delete(&pin("110001"), &m("m1"));
        assert_eq!(
            reg.merchant_codes(&m("m1")),
            Some(&BTreeSet::from([pin("110002")]))
        );

        reg.delete(&pin("110002"), &m("m1"));
        assert!(reg.merchant_codes(&m("m1")).is_none());
        assert!(!reg.has_merchant(&m("m1")));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_load_merchant_counts_new_pairs() {
        let mut reg = Registry::new();
        let codes = vec![pin("110001"), pin("110002"), pin("110001")];

        assert_eq!(reg.load_merchant(&codes, "m1"), 2);
        assert_eq!(reg.load_merchant(&codes, "m1"), 0);
        assert_eq!(reg.search(&pin("110001")), BTreeSet::from([m("m1")]));
    }

    #[test]
    fn test_from_trie_rebuilds_reverse_index() {
        let mut reg = Registry::new();
        reg.insert(&pin("110001"), "a");
        reg.insert(&pin("110001"), "b");
        reg.insert(&pin("560034"), "b");

        let rebuilt = Registry::from_trie(reg.trie().clone());
        assert_eq!(rebuilt, reg);
        assert_eq!(rebuilt.merchant_codes(&m("b")).map(|c| c.len()), Some(2));
        assert_eq!(rebuilt.merchants().count(), 2);
    }

    #[test]
    fn test_stats() {
        let mut reg = Registry::new();
        reg.insert(&pin("12"), "a");
        reg.insert(&pin("13"), "a");
        reg.insert(&pin("13"), "b");

        let stats = reg.stats();
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.pincodes, 2);
        assert_eq!(stats.merchants, 2);
        assert_eq!(stats.pairs, 3);
    }
}
