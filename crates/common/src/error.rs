//! Error types shared across Clipsmith crates.
//!
//! Variants follow the stage a failure happened in (engine load, staging,
//! encode) rather than the library that raised it.

use std::path::PathBuf;

/// Top-level error type for Clipsmith operations.
#[derive(Debug, thiserror::Error)]
pub enum ClipsmithError {
    #[error("Engine load failed: {message}")]
    Load { message: String },

    #[error("Staging failed: {message}")]
    Staging { message: String },

    #[error("Encode failed: {message}")]
    Encode { message: String },

    #[error("Overlay render failed: {message}")]
    Overlay { message: String },

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Invalid edit: {message}")]
    InvalidEdit { message: String },

    #[error("Engine error: {message}")]
    Engine { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ClipsmithError.
pub type ClipsmithResult<T> = Result<T, ClipsmithError>;

impl ClipsmithError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load {
            message: msg.into(),
        }
    }

    pub fn staging(msg: impl Into<String>) -> Self {
        Self::Staging {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn overlay(msg: impl Into<String>) -> Self {
        Self::Overlay {
            message: msg.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_edit(msg: impl Into<String>) -> Self {
        Self::InvalidEdit {
            message: msg.into(),
        }
    }

    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this failure came out of an encode invocation.
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }

    /// The failure text without the stage prefix, for re-wrapping under
    /// another stage.
    pub fn detail(&self) -> String {
        match self {
            Self::Load { message }
            | Self::Staging { message }
            | Self::Encode { message }
            | Self::Overlay { message }
            | Self::Engine { message }
            | Self::Config { message }
            | Self::InvalidEdit { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_stage() {
        let err = ClipsmithError::encode("exit status 1");
        assert_eq!(err.to_string(), "Encode failed: exit status 1");
        assert!(err.is_encode());

        let err = ClipsmithError::fetch("https://example.com/a.mp3", "404");
        assert!(err.to_string().contains("https://example.com/a.mp3"));
        assert!(!err.is_encode());
    }

    #[test]
    fn test_detail_drops_stage_prefix() {
        let err = ClipsmithError::engine("core failed to download");
        assert_eq!(err.detail(), "core failed to download");
        assert_eq!(
            ClipsmithError::load(err.detail()).to_string(),
            "Engine load failed: core failed to download"
        );

        let err = ClipsmithError::FileNotFound {
            path: "job-1-input.mp4".into(),
        };
        assert_eq!(err.detail(), err.to_string());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ClipsmithError = io.into();
        assert!(matches!(err, ClipsmithError::Io(_)));
    }
}
