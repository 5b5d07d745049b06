//! Snapshot persistence
//!
//! A registry is persisted as a single opaque blob: a small header followed
//! by the whole trie, bincode-encoded and compressed with zstd.

mod snapshot;

pub use snapshot::{load, load_from_path, load_or_default, save, save_to_path};
