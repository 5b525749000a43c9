//! Loading input media into memory.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::MediaSource;

/// Retrieves remote assets (source clips, music tracks).
#[async_trait::async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> ClipsmithResult<Vec<u8>>;
}

/// HTTP(S) fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> ClipsmithResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("clipsmith/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClipsmithError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ClipsmithResult<Vec<u8>> {
        tracing::debug!(url, "Fetching asset");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClipsmithError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClipsmithError::fetch(url, format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClipsmithError::fetch(url, e.to_string()))?;
        tracing::debug!(url, bytes = bytes.len(), "Fetched asset");
        Ok(bytes.to_vec())
    }
}

/// Bring a source into memory.
pub async fn resolve_source(
    source: &MediaSource,
    fetcher: &dyn AssetFetcher,
) -> ClipsmithResult<Vec<u8>> {
    let bytes = match source {
        MediaSource::Bytes(bytes) => bytes.clone(),
        MediaSource::File(path) => match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClipsmithError::FileNotFound { path: path.clone() })
            }
            Err(e) => return Err(e.into()),
        },
        MediaSource::Url(url) => fetcher.fetch(url).await?,
    };
    if bytes.is_empty() {
        return Err(ClipsmithError::staging(format!(
            "{} is empty",
            source.describe()
        )));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NoNetwork;

    #[async_trait::async_trait]
    impl AssetFetcher for NoNetwork {
        async fn fetch(&self, url: &str) -> ClipsmithResult<Vec<u8>> {
            Err(ClipsmithError::fetch(url, "offline"))
        }
    }

    #[tokio::test]
    async fn test_bytes_pass_through() {
        let bytes = resolve_source(&MediaSource::Bytes(vec![1, 2, 3]), &NoNetwork)
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected() {
        let err = resolve_source(&MediaSource::Bytes(Vec::new()), &NoNetwork)
            .await
            .unwrap_err();
        assert!(matches!(err, ClipsmithError::Staging { .. }));
    }

    #[tokio::test]
    async fn test_file_source_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"mp4").unwrap();

        let bytes = resolve_source(&MediaSource::File(path), &NoNetwork)
            .await
            .unwrap();
        assert_eq!(bytes, b"mp4");
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let err = resolve_source(
            &MediaSource::File(PathBuf::from("/nonexistent/clip.mp4")),
            &NoNetwork,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClipsmithError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_url_goes_through_fetcher() {
        let err = resolve_source(
            &MediaSource::Url("https://cdn.example.com/a.mp4".to_string()),
            &NoNetwork,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ClipsmithError::Fetch { .. }));
    }
}
