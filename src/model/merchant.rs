//! Merchant identifiers

use serde::{Deserialize, Serialize};

/// Opaque identifier for a merchant
///
/// Equality defines identity: two merchants with the same id are the same
/// merchant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MerchantId(pub String);

impl MerchantId {
    pub fn new(id: impl Into<String>) -> Self {
        MerchantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MerchantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MerchantId {
    fn from(s: &str) -> Self {
        MerchantId(s.to_string())
    }
}

impl From<String> for MerchantId {
    fn from(s: String) -> Self {
        MerchantId(s)
    }
}

impl From<&String> for MerchantId {
    fn from(s: &String) -> Self {
        MerchantId(s.clone())
    }
}

impl From<&MerchantId> for MerchantId {
    fn from(id: &MerchantId) -> Self {
        id.clone()
    }
}

impl From<u64> for MerchantId {
    fn from(n: u64) -> Self {
        MerchantId(n.to_string())
    }
}

impl From<usize> for MerchantId {
    fn from(n: usize) -> Self {
        MerchantId(n.to_string())
    }
}
