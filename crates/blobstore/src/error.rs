//! Storage error types.

use thiserror::Error;

/// A single failed key within a bulk operation.
#[derive(Debug, Clone)]
pub struct KeyFailure {
    /// The key whose deletion or fetch failed.
    pub key: String,
    /// The underlying failure message.
    pub message: String,
}

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key not found in storage.
    ///
    /// Never surfaced by `get`/`get_multi`, which normalize it to an
    /// absent value; it exists so the normalization point is explicit.
    #[error("key not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Store operation failed after the client retry policy was exhausted.
    #[error("storage operation failed: {0}")]
    Operation(String),

    /// Storage backend configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// One or more constituent operations of a bulk delete or cleanup
    /// sweep failed. Every key was attempted; the failures list names
    /// the ones that did not succeed.
    #[error("bulk storage operation failed for {} key(s)", .failures.len())]
    Partial {
        /// Per-key failure detail.
        failures: Vec<KeyFailure>,
    },
}

impl StorageError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an aggregate bulk failure.
    #[must_use]
    pub fn partial(failures: Vec<KeyFailure>) -> Self {
        Self::Partial { failures }
    }

    /// Whether this error means the key simply does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err = opendal::Error::new(opendal::ErrorKind::NotFound, "no such key");
        let mapped = StorageError::from(err);
        assert!(mapped.is_not_found());
    }

    #[test]
    fn test_config_invalid_mapping() {
        let err = opendal::Error::new(opendal::ErrorKind::ConfigInvalid, "bad endpoint");
        let mapped = StorageError::from(err);
        assert!(matches!(mapped, StorageError::Configuration(_)));
    }

    #[test]
    fn test_other_kinds_map_to_operation() {
        let err = opendal::Error::new(opendal::ErrorKind::Unexpected, "connection reset");
        let mapped = StorageError::from(err);
        assert!(matches!(mapped, StorageError::Operation(_)));
        assert!(!mapped.is_not_found());
    }

    #[test]
    fn test_partial_display_counts_failures() {
        let err = StorageError::partial(vec![
            KeyFailure {
                key: "a".to_string(),
                message: "boom".to_string(),
            },
            KeyFailure {
                key: "b".to_string(),
                message: "boom".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "bulk storage operation failed for 2 key(s)"
        );
    }
}
