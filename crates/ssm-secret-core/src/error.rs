//! Error types shared by the gateways and the sync engine

use thiserror::Error;

/// Result type alias using the shared [`SyncError`]
pub type Result<T> = std::result::Result<T, SyncError>;

/// Every fatal condition a transfer can end in
#[derive(Error, Debug)]
pub enum SyncError {
    /// The source held no keys, or a write was attempted with an empty bundle
    #[error("no data found in {source_name}")]
    EmptySource { source_name: String },

    /// Network, auth or service error reported by either store
    #[error("{operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// Destination secret already present
    #[error("secret {namespace}/{name} already exists")]
    AlreadyExists { namespace: String, name: String },

    /// Parameter already present and overwrite was not requested
    #[error("parameter {name} already exists, use --overwrite to replace it")]
    ParameterExists { name: String },

    /// Secret does not exist
    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    /// Value too large for the requested parameter tier
    #[error("value for key '{key}' is {size} bytes, exceeding the {limit} byte limit")]
    SizeLimitExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    /// Invalid configuration or arguments
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create an empty source error
    pub fn empty_source(source_name: impl Into<String>) -> Self {
        Self::EmptySource {
            source_name: source_name.into(),
        }
    }

    /// Create a remote fault from any displayable error
    pub fn remote(operation: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Create an already exists error
    pub fn already_exists(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a size limit error
    pub fn size_limit_exceeded(key: impl Into<String>, size: usize, limit: usize) -> Self {
        Self::SizeLimitExceeded {
            key: key.into(),
            size,
            limit,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this is the destination-secret conflict that `--overwrite` resolves
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Whether the target secret was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_message_names_key() {
        let err = SyncError::size_limit_exceeded("token", 4097, 4096);
        let msg = err.to_string();
        assert!(msg.contains("'token'"));
        assert!(msg.contains("4097"));
        assert!(msg.contains("4096"));
    }

    #[test]
    fn test_remote_message_is_verbatim() {
        let err = SyncError::remote("GetParametersByPath", "AccessDeniedException: nope");
        assert_eq!(
            err.to_string(),
            "GetParametersByPath failed: AccessDeniedException: nope"
        );
    }

    #[test]
    fn test_predicates() {
        assert!(SyncError::already_exists("default", "foo").is_already_exists());
        assert!(!SyncError::already_exists("default", "foo").is_not_found());
        assert!(SyncError::not_found("default", "foo").is_not_found());
    }
}
