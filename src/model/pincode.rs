//! Pincode - the digit-string key of the registry

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A postal code: a non-empty string of ASCII digits
///
/// No length is imposed. Indian pincodes are six digits, but any digit
/// string is a valid key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(String);

impl Pincode {
    /// Parse a pincode, trimming surrounding whitespace
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPincode(s.to_string()));
        }
        Ok(Pincode(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digit values (0-9) in path order
    pub fn digits(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.bytes().map(|b| (b - b'0') as usize)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a pincode from trie path digits
    pub(crate) fn from_digits(digits: &[u8]) -> Self {
        Pincode(digits.iter().map(|d| char::from(b'0' + d)).collect())
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pincode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pincode::parse(s)
    }
}

impl TryFrom<String> for Pincode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Pincode::parse(&s)
    }
}

impl TryFrom<&str> for Pincode {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Pincode::parse(s)
    }
}

impl TryFrom<u64> for Pincode {
    type Error = Error;

    fn try_from(n: u64) -> Result<Self> {
        Pincode::parse(&n.to_string())
    }
}

impl From<Pincode> for String {
    fn from(p: Pincode) -> Self {
        p.0
    }
}
