//! Storage errors.

/// Error returned by a [`PreferenceStore`](super::PreferenceStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend cannot be reached at all (disabled, missing, sandboxed).
    #[error("preference storage is unavailable")]
    Unavailable,
    /// Reading or writing the backing file failed.
    #[error("preference storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file exists but is not a JSON object of strings.
    #[error("preference file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The backend refused the operation (quota, security policy).
    #[error("preference storage rejected the operation: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        assert_eq!(
            StorageError::Unavailable.to_string(),
            "preference storage is unavailable"
        );
    }

    #[test]
    fn test_rejected_display_includes_reason() {
        let err = StorageError::Rejected("QuotaExceededError".into());
        assert!(err.to_string().contains("QuotaExceededError"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io.into();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
