//! Error types for the asset pipeline.

use thiserror::Error;

/// Result type for asset decoding and loading.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that can occur while fetching or decoding a mesh asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The reference has no recognized mesh extension.
    #[error("unsupported asset format: {reference}")]
    UnsupportedFormat {
        /// The asset reference that was rejected.
        reference: String,
    },

    /// Content does not parse as the detected format.
    #[error("invalid asset content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Binary payload ended before the declared triangle count.
    #[error("truncated binary STL: expected {expected} triangles, got {got}")]
    Truncated {
        /// Triangles declared in the header.
        expected: u32,
        /// Complete triangles present.
        got: u32,
    },

    /// Remote server answered with a non-success status.
    #[error("fetching {url} failed with status {status}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Transport-level HTTP failure.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Create an `InvalidContent` error with the given message.
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Create an `UnsupportedFormat` error for the given reference.
    pub fn unsupported(reference: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            reference: reference.into(),
        }
    }
}
