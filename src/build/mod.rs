//! Bulk construction of registries
//!
//! Registries can be built from:
//! - per-merchant pincode lists, with explicit or sequential merchant ids
//! - a tabular CSV source whose column headers are merchant ids and whose
//!   cells are the pincodes each merchant serves
//!
//! Code list files (one merchant's pincodes, or the universe of all valid
//! pincodes) are read with [`read_code_list`].

mod codes;
mod tabular;

pub use codes::{read_code_file, read_code_list};
pub use tabular::{from_csv_path, from_csv_reader};

use crate::model::{MerchantId, Pincode};
use crate::Registry;
use std::time::Instant;
use tracing::debug;

/// Build a registry from (merchant, pincodes) records
pub fn from_merchant_lists<I, M, C>(records: I) -> Registry
where
    I: IntoIterator<Item = (M, C)>,
    M: Into<MerchantId>,
    C: IntoIterator<Item = Pincode>,
{
    let started = Instant::now();
    let mut registry = Registry::new();
    let mut merchants = 0usize;
    let mut pairs = 0usize;
    for (merchant, codes) in records {
        let codes: Vec<Pincode> = codes.into_iter().collect();
        pairs += registry.load_merchant(&codes, merchant);
        merchants += 1;
    }
    debug!(
        merchants,
        pairs,
        elapsed = ?started.elapsed(),
        "built registry from merchant lists"
    );
    registry
}

/// Build a registry from pincode lists, assigning merchant ids 0, 1, 2, ...
pub fn from_sequential_lists<I, C>(lists: I) -> Registry
where
    I: IntoIterator<Item = C>,
    C: IntoIterator<Item = Pincode>,
{
    from_merchant_lists(
        lists
            .into_iter()
            .enumerate()
            .map(|(i, codes)| (MerchantId::from(i), codes)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(codes: &[&str]) -> Vec<Pincode> {
        codes.iter().map(|c| Pincode::parse(c).unwrap()).collect()
    }

    #[test]
    fn test_from_merchant_lists() {
        let registry = from_merchant_lists(vec![
            ("alpha", pins(&["110001", "110002"])),
            ("beta", pins(&["110002"])),
        ]);

        let shared = registry.search(&Pincode::parse("110002").unwrap());
        assert_eq!(shared.len(), 2);
        assert_eq!(registry.merchants().count(), 2);
    }

    #[test]
    fn test_from_sequential_lists_assigns_ids() {
        let registry = from_sequential_lists(vec![pins(&["400001"]), pins(&["400002"])]);

        let first = registry.search(&Pincode::parse("400001").unwrap());
        let second = registry.search(&Pincode::parse("400002").unwrap());
        assert!(first.contains(&MerchantId::from(0usize)));
        assert!(second.contains(&MerchantId::from(1usize)));
    }

    #[test]
    fn test_empty_source_builds_empty_registry() {
        let registry = from_merchant_lists(Vec::<(MerchantId, Vec<Pincode>)>::new());
        assert!(registry.is_empty());
    }
}
