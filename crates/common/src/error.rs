//! Error types shared across StrideSense crates.

use std::path::PathBuf;

/// Top-level error type for StrideSense operations.
#[derive(Debug, thiserror::Error)]
pub enum StrideError {
    #[error("Sample source error: {message}")]
    SampleSource { message: String },

    #[error("Replay error: {message}")]
    Replay { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using StrideError.
pub type StrideResult<T> = Result<T, StrideError>;

impl StrideError {
    pub fn sample_source(msg: impl Into<String>) -> Self {
        Self::SampleSource {
            message: msg.into(),
        }
    }

    pub fn replay(msg: impl Into<String>) -> Self {
        Self::Replay {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_messages_name_their_subject() {
        let err = StrideError::FileNotFound {
            path: PathBuf::from("/tmp/stream.jsonl"),
        };
        assert_eq!(err.to_string(), "File not found: /tmp/stream.jsonl");

        assert!(StrideError::replay("truncated line")
            .to_string()
            .starts_with("Replay error:"));
        assert!(StrideError::unsupported("evdev source")
            .to_string()
            .starts_with("Unsupported operation:"));
    }
}
