//! Error types for figtree.
//!
//! The simplification engine itself is total and never fails; errors only
//! arise at the boundaries, parsing raw input or writing token output.

use thiserror::Error;

/// Errors that can occur at the crate's boundaries.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The raw file response was not valid JSON in either wire form.
    #[error("failed to parse design document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Writing generated design tokens to disk failed.
    #[error("failed to write design tokens to {path}: {source}")]
    TokenWrite {
        /// Destination path.
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for figtree operations.
pub type DesignResult<T> = Result<T, DesignError>;

impl DesignError {
    /// Create a token-write error for a path.
    pub fn token_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::TokenWrite { path: path.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesignError::token_write(
            "/tmp/tokens.css",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.to_string(),
            "failed to write design tokens to /tmp/tokens.css: denied"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DesignError>();
    }
}
