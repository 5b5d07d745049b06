//! # pulse_registry
//!
//! A prefix-tree registry of which merchants serve which postal codes.
//!
//! Pincodes are stored digit by digit in a trie, so lookups cost one step
//! per digit no matter how many pincodes are registered. The registry can
//! be built in bulk, mutated merchant by merchant, and persisted as a single
//! snapshot blob.
//!
//! ## Core Concepts
//!
//! - **Registry**: the trie plus a reverse merchant index
//! - **Builders**: bulk construction from merchant lists or CSV tables
//! - **Snapshots**: compressed single-blob persistence
//! - **Sessions**: the load → mutate → persist lifecycle
//!
//! ## Example
//!
//! ```ignore
//! use pulse_registry::{ops, MerchantId, Pincode, Session};
//!
//! let mut session = Session::open("registry.pulse")?;
//! let code = Pincode::parse("110001")?;
//! ops::add_pincode(session.registry_mut(), &code, &MerchantId::new("m1"));
//! assert!(ops::is_serviceable(session.registry(), &code));
//! session.persist()?;
//! ```

pub mod build;
pub mod config;
pub mod model;
pub mod ops;
pub mod store;
pub mod trie;

mod error;
mod registry;
mod session;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use model::{MerchantId, Pincode};
pub use registry::{Registry, RegistryStats};
pub use session::{Session, SessionState, SharedRegistry};
pub use trie::{PincodeTrie, Removal, TrieNode};

/// Snapshot format version
pub const VERSION: u32 = 2;

/// Magic bytes for snapshot identification
pub const MAGIC: &[u8; 8] = b"PULSEREG";
