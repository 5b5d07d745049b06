//! Error types for pulse_registry

use thiserror::Error;

/// Result type alias for pulse_registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pulse_registry operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid pincode: {0:?}")]
    InvalidPincode(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], for callers choosing between
/// retry, re-upload, or giving up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The targeted code or merchant is absent from the registry
    NotFound,
    /// A bulk source or snapshot could not be parsed
    MalformedInput,
    /// Underlying storage was unreachable
    Io,
    /// Configuration could not be read
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Csv(e) if e.is_io_error() => ErrorKind::Io,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Config(_) => ErrorKind::Config,
            Error::Serialization(_)
            | Error::Json(_)
            | Error::Csv(_)
            | Error::InvalidPincode(_)
            | Error::MalformedInput(_)
            | Error::InvalidSnapshot(_)
            | Error::VersionMismatch { .. } => ErrorKind::MalformedInput,
        }
    }

    /// True if the error was caused by unreadable input rather than storage
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedInput
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_and_malformed_are_distinct() {
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let bad = Error::InvalidSnapshot("truncated".into());

        assert_eq!(io.kind(), ErrorKind::Io);
        assert_eq!(bad.kind(), ErrorKind::MalformedInput);
        assert!(!io.is_malformed());
        assert!(bad.is_malformed());
    }

    #[test]
    fn test_version_mismatch_is_malformed() {
        let err = Error::VersionMismatch {
            expected: 1,
            found: 7,
        };
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "Version mismatch: expected 1, found 7");
    }
}
