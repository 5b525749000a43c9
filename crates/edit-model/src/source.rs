//! Where input media comes from.

use std::fmt;
use std::path::{Path, PathBuf};

/// Input media: raw bytes, a local file, or a remote URL.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaSource {
    Bytes(Vec<u8>),
    File(PathBuf),
    Url(String),
}

impl MediaSource {
    /// Interpret a user-supplied string: `http(s)://` is a URL, anything
    /// else a file path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            MediaSource::Url(trimmed.to_string())
        } else {
            MediaSource::File(PathBuf::from(trimmed))
        }
    }

    /// Short description for logs (never dumps byte contents).
    pub fn describe(&self) -> String {
        match self {
            MediaSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            MediaSource::File(path) => path.display().to_string(),
            MediaSource::Url(url) => url.clone(),
        }
    }
}

impl fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            MediaSource::File(path) => f.debug_tuple("File").field(path).finish(),
            MediaSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

impl From<Vec<u8>> for MediaSource {
    fn from(bytes: Vec<u8>) -> Self {
        MediaSource::Bytes(bytes)
    }
}

impl From<PathBuf> for MediaSource {
    fn from(path: PathBuf) -> Self {
        MediaSource::File(path)
    }
}

impl From<&Path> for MediaSource {
    fn from(path: &Path) -> Self {
        MediaSource::File(path.to_path_buf())
    }
}
