//! Merchant-centric registry maintenance

use crate::model::{MerchantId, Pincode};
use crate::trie::Removal;
use crate::Registry;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Register a new merchant for every pincode in `codes`
///
/// Returns the number of newly registered pincodes.
pub fn add_merchant<'a>(
    registry: &mut Registry,
    codes: impl IntoIterator<Item = &'a Pincode>,
    merchant: &MerchantId,
) -> usize {
    let added = registry.load_merchant(codes, merchant);
    debug!(%merchant, added, "added merchant");
    added
}

/// Remove `merchant` from every pincode it serves
///
/// Uses the registry's reverse index, so cost is proportional to the number
/// of pincodes the merchant serves. Returns `Removal::NotFound` if the
/// merchant serves nothing.
pub fn remove_merchant(registry: &mut Registry, merchant: &MerchantId) -> Removal {
    let codes: Vec<Pincode> = match registry.merchant_codes(merchant) {
        Some(codes) => codes.iter().cloned().collect(),
        None => {
            warn!(%merchant, "remove: merchant serves no pincodes");
            return Removal::NotFound;
        }
    };
    for code in &codes {
        registry.delete(code, merchant);
    }
    debug!(%merchant, removed = codes.len(), "removed merchant");
    Removal::Removed
}

/// Remove `merchant` by probing every pincode in `universe`
///
/// Cost is proportional to the size of the universe regardless of how many
/// pincodes the merchant serves. Pincodes outside the universe are left
/// untouched. Returns the number of pincodes the merchant was dropped from.
pub fn remove_merchant_in_universe<'a>(
    registry: &mut Registry,
    merchant: &MerchantId,
    universe: impl IntoIterator<Item = &'a Pincode>,
) -> usize {
    let removed = universe
        .into_iter()
        .filter(|code| registry.delete(code, merchant).is_removed())
        .count();
    debug!(%merchant, removed, "removed merchant across universe");
    removed
}

/// Replace the set of pincodes `merchant` serves with `codes`
///
/// Returns the number of previously served pincodes that were dropped.
pub fn update_merchant<'a>(
    registry: &mut Registry,
    merchant: &MerchantId,
    codes: impl IntoIterator<Item = &'a Pincode>,
) -> usize {
    let wanted: BTreeSet<&Pincode> = codes.into_iter().collect();
    let stale: Vec<Pincode> = registry
        .merchant_codes(merchant)
        .map(|current| {
            current
                .iter()
                .filter(|code| !wanted.contains(code))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    for code in &stale {
        registry.delete(code, merchant);
    }
    let added = registry.load_merchant(wanted, merchant);
    debug!(%merchant, dropped = stale.len(), added, "updated merchant");
    stale.len()
}

/// Register `merchant` for one more pincode
///
/// Returns false if it was already registered there.
pub fn add_pincode(registry: &mut Registry, code: &Pincode, merchant: &MerchantId) -> bool {
    registry.insert(code, merchant)
}

/// Unregister `merchant` from one pincode
pub fn remove_pincode(registry: &mut Registry, code: &Pincode, merchant: &MerchantId) -> Removal {
    let outcome = registry.delete(code, merchant);
    if !outcome.is_found() {
        warn!(%code, %merchant, "remove: pincode not found");
    }
    outcome
}

/// Move `merchant` from `old` to `new`
pub fn update_pincode(
    registry: &mut Registry,
    old: &Pincode,
    new: &Pincode,
    merchant: &MerchantId,
) -> Removal {
    let outcome = registry.update(old, new, merchant);
    if !outcome.is_found() {
        warn!(%old, %new, %merchant, "update: old pincode not found");
    }
    outcome
}

/// Whether any merchant serves `code`
pub fn is_serviceable(registry: &Registry, code: &Pincode) -> bool {
    registry.exists(code)
}

/// Merchants serving `code`
pub fn merchants_for(registry: &Registry, code: &Pincode) -> BTreeSet<MerchantId> {
    registry.search(code)
}
