//! Registry snapshots
//!
//! Format:
//! ```text
//! [HEADER: 12 bytes]
//!   - magic: 8 bytes ("PULSEREG")
//!   - version: 4 bytes (u32 LE)
//!
//! [PAYLOAD: variable]
//!   - zstd-compressed bincode encoding of the trie's node records: one
//!     (pincode, merchants) pair per terminal or leaf node, emptied nodes
//!     included
//! ```
//! The records are flat, so decoding depth does not grow with pincode
//! length. The merchant reverse index is not stored; it is rebuilt on load.

use crate::model::{MerchantId, Pincode};
use crate::trie::PincodeTrie;
use crate::{Error, Registry, Result, MAGIC, VERSION};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

const HEADER_SIZE: usize = 12;
const COMPRESSION_LEVEL: i32 = 3;

/// Serialize a registry into a snapshot blob
pub fn save(registry: &Registry) -> Result<Vec<u8>> {
    let payload = bincode::serialize(&registry.trie().records())?;
    let compressed = zstd::encode_all(payload.as_slice(), COMPRESSION_LEVEL)?;

    let mut output = Vec::with_capacity(HEADER_SIZE + compressed.len());
    output.extend_from_slice(MAGIC);
    output.extend_from_slice(&VERSION.to_le_bytes());
    output.extend(compressed);
    Ok(output)
}

/// Restore a registry from a snapshot blob
pub fn load(data: &[u8]) -> Result<Registry> {
    if data.len() < HEADER_SIZE {
        return Err(Error::InvalidSnapshot(format!(
            "{} bytes is too short for a snapshot header",
            data.len()
        )));
    }

    let (header, payload) = data.split_at(HEADER_SIZE);
    if &header[0..8] != MAGIC {
        return Err(Error::InvalidSnapshot("Invalid magic bytes".into()));
    }

    let mut version = [0u8; 4];
    version.copy_from_slice(&header[8..12]);
    let version = u32::from_le_bytes(version);
    if version != VERSION {
        return Err(Error::VersionMismatch {
            expected: VERSION,
            found: version,
        });
    }

    let decompressed = zstd::decode_all(payload)
        .map_err(|e| Error::InvalidSnapshot(format!("Corrupt payload: {}", e)))?;
    let records: Vec<(Pincode, BTreeSet<MerchantId>)> = bincode::deserialize(&decompressed)?;
    Ok(Registry::from_trie(PincodeTrie::from_records(records)))
}

/// Write a snapshot of `registry` to `path`
///
/// The snapshot is written to a sibling temporary file first and renamed
/// into place, so an existing snapshot survives a failed write.
pub fn save_to_path(registry: &Registry, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let data = save(registry)?;

    let mut tmp_path = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "registry.pulse".to_string());
    tmp_path.set_file_name(format!(".{}.tmp", file_name));

    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;

    info!(path = %path.display(), bytes = data.len(), "saved snapshot");
    Ok(())
}

/// Read a snapshot from `path`
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Registry> {
    let path = path.as_ref();
    let started = Instant::now();
    let data = std::fs::read(path)?;
    let registry = load(&data)?;
    debug!(
        path = %path.display(),
        bytes = data.len(),
        elapsed = ?started.elapsed(),
        "loaded snapshot"
    );
    Ok(registry)
}

/// Read a snapshot from `path`, or start empty if none exists yet
///
/// Only a missing file yields an empty registry. Unreadable or corrupt
/// snapshots are still errors.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Registry> {
    let path = path.as_ref();
    match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no snapshot yet, starting empty");
            Ok(Registry::new())
        }
        Err(e) => Err(e.into()),
        Ok(_) => load_from_path(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MerchantId, Pincode};
    use crate::ErrorKind;
    use tempfile::tempdir;

    fn pin(s: &str) -> Pincode {
        Pincode::parse(s).unwrap()
    }

    fn sample() -> Registry {
        let mut reg = Registry::new();
        reg.insert(&pin("110001"), "m1");
        reg.insert(&pin("110001"), "m2");
        reg.insert(&pin("110002"), "m1");
        reg.insert(&pin("560034"), "m3");
        reg.insert(&pin("56"), "m3");
        reg.insert(&pin("400001"), "m4");
        reg.delete(&pin("400001"), &MerchantId::new("m4"));
        reg
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let original = sample();
        let restored = load(&save(&original).unwrap()).unwrap();

        assert_eq!(restored, original);
        for code in ["110001", "110002", "560034", "56", "400001", "5", "999999"] {
            assert_eq!(restored.exists(&pin(code)), original.exists(&pin(code)));
            assert_eq!(restored.search(&pin(code)), original.search(&pin(code)));
        }
        assert_eq!(restored.stats(), original.stats());
        assert_eq!(
            restored.merchant_codes(&MerchantId::new("m1")),
            original.merchant_codes(&MerchantId::new("m1"))
        );
        assert!(!restored.has_merchant(&MerchantId::new("m4")));
    }

    #[test]
    fn test_empty_registry_roundtrip() {
        let restored = load(&save(&Registry::new()).unwrap()).unwrap();
        assert!(restored.is_empty());
        assert_eq!(restored.stats().nodes, 1);
    }

    #[test]
    fn test_truncated_blob_is_malformed() {
        let err = load(b"PULSE").unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_bad_magic_is_malformed() {
        let mut data = save(&sample()).unwrap();
        data[0] = b'X';
        assert!(matches!(load(&data), Err(Error::InvalidSnapshot(_))));
    }

    #[test]
    fn test_version_mismatch() {
        let mut data = save(&sample()).unwrap();
        data[8..12].copy_from_slice(&(VERSION + 1).to_le_bytes());
        assert!(matches!(
            load(&data),
            Err(Error::VersionMismatch { found, .. }) if found == VERSION + 1
        ));
    }

    #[test]
    fn test_corrupt_payload_is_malformed() {
        let mut data = save(&sample()).unwrap();
        data.truncate(HEADER_SIZE + 3);
        let err = load(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_very_long_pincode_roundtrip() {
        let long = pin(&"9".repeat(100_000));
        let mut original = sample();
        original.insert(&long, "deep");
        original.insert(&pin("99"), "shallow");

        let restored = load(&save(&original).unwrap()).unwrap();
        assert!(restored.exists(&long));
        assert_eq!(
            restored.search(&long),
            BTreeSet::from([MerchantId::new("deep")])
        );
        assert_eq!(restored.stats(), original.stats());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_path_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("registry.pulse");

        save_to_path(&sample(), &path).unwrap();
        let restored = load_from_path(&path).unwrap();
        assert_eq!(restored, sample());
        assert!(!dir.path().join(".registry.pulse.tmp").exists());
    }

    #[test]
    fn test_load_or_default_first_run() {
        let dir = tempdir().unwrap();
        let registry = load_or_default(dir.path().join("missing.pulse")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_or_default_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.pulse");
        std::fs::write(&path, b"definitely not a snapshot").unwrap();

        let err = load_or_default(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_load_from_missing_path_is_io() {
        let dir = tempdir().unwrap();
        let err = load_from_path(dir.path().join("missing.pulse")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
