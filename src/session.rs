//! Registry lifecycle and shared access
//!
//! A [`Session`] owns the current registry for one process: it is loaded
//! from a snapshot (or starts empty on first run), mutated in place, and
//! persisted back. Uploading or rebuilding replaces the registry wholesale.
//!
//! [`SharedRegistry`] wraps a registry in a reader-writer lock for callers
//! that serve several threads at once.

use crate::model::{MerchantId, Pincode};
use crate::trie::Removal;
use crate::{ops, store, Registry, Result};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a session's registry stands relative to its snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Matches the snapshot it was loaded from (or empty on first run)
    Loaded,
    /// Changed since it was loaded or last persisted
    Mutated,
    /// Written back to the snapshot
    Persisted,
}

/// The registry held for the lifetime of a process, tied to a snapshot path
pub struct Session {
    path: PathBuf,
    registry: Registry,
    state: SessionState,
}

impl Session {
    /// Open the snapshot at `path`, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let registry = store::load_or_default(&path)?;
        Ok(Session {
            path,
            registry,
            state: SessionState::Loaded,
        })
    }

    /// Start a session with an empty registry, ignoring any existing snapshot
    pub fn create(path: impl AsRef<Path>) -> Self {
        Session {
            path: path.as_ref().to_path_buf(),
            registry: Registry::new(),
            state: SessionState::Mutated,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True if there are changes not yet persisted
    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Mutated
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access; marks the session as mutated
    pub fn registry_mut(&mut self) -> &mut Registry {
        self.state = SessionState::Mutated;
        &mut self.registry
    }

    /// Discard the current registry in favour of `registry`
    ///
    /// Returns the registry that was replaced. Nothing is merged.
    pub fn replace(&mut self, registry: Registry) -> Registry {
        self.state = SessionState::Mutated;
        std::mem::replace(&mut self.registry, registry)
    }

    /// Write the registry to the session's snapshot path
    pub fn persist(&mut self) -> Result<()> {
        store::save_to_path(&self.registry, &self.path)?;
        self.state = SessionState::Persisted;
        Ok(())
    }

    /// Persist only if there are unsaved changes; returns whether it wrote
    pub fn persist_if_dirty(&mut self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }
}

/// A registry shared between threads
///
/// Readers proceed concurrently; each mutation holds the write lock for its
/// whole duration, so the delete and insert halves of an update are never
/// observed separately.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        SharedRegistry {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write()
    }

    pub fn exists(&self, code: &Pincode) -> bool {
        self.read().exists(code)
    }

    pub fn search(&self, code: &Pincode) -> BTreeSet<MerchantId> {
        self.read().search(code)
    }

    pub fn add_pincode(&self, code: &Pincode, merchant: &MerchantId) -> bool {
        ops::add_pincode(&mut self.write(), code, merchant)
    }

    pub fn remove_pincode(&self, code: &Pincode, merchant: &MerchantId) -> Removal {
        ops::remove_pincode(&mut self.write(), code, merchant)
    }

    pub fn update_pincode(&self, old: &Pincode, new: &Pincode, merchant: &MerchantId) -> Removal {
        ops::update_pincode(&mut self.write(), old, new, merchant)
    }

    pub fn add_merchant(&self, codes: &[Pincode], merchant: &MerchantId) -> usize {
        ops::add_merchant(&mut self.write(), codes, merchant)
    }

    pub fn remove_merchant(&self, merchant: &MerchantId) -> Removal {
        ops::remove_merchant(&mut self.write(), merchant)
    }

    /// Swap in a new registry, returning the old one
    pub fn replace(&self, registry: Registry) -> Registry {
        std::mem::replace(&mut *self.write(), registry)
    }

    /// Snapshot the registry under a read lock
    pub fn save(&self) -> Result<Vec<u8>> {
        store::save(&self.read())
    }
}
