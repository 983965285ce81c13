//! Streaming download with an integrity sanity check.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};

/// Minimum byte size for a downloaded clip to be considered valid.
/// Anything smaller is an error page or a truncated transfer, not video.
pub const MIN_CLIP_BYTES: u64 = 10_000;

/// Stream a URL to `path`, enforcing a total timeout and a minimum size.
/// Undersized downloads are deleted and rejected rather than silently
/// accepted. Returns the downloaded byte count.
pub async fn download_to_file(
    client: &Client,
    url: &str,
    path: impl AsRef<Path>,
    timeout: Duration,
    min_bytes: u64,
) -> ProviderResult<u64> {
    let path = path.as_ref();

    let response = client.get(url).timeout(timeout).send().await?;
    if !response.status().is_success() {
        return Err(ProviderError::unavailable(
            "download",
            format!("HTTP {} for {}", response.status(), url),
        ));
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    if written < min_bytes {
        warn!(
            url = %url,
            size = written,
            "Downloaded file below integrity threshold, discarding"
        );
        let _ = tokio::fs::remove_file(path).await;
        return Err(ProviderError::CorruptedDownload {
            path: path.to_path_buf(),
            size: written,
        });
    }

    debug!(url = %url, size = written, "Download complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_undersized_download_rejected_and_deleted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 50]))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let err = download_to_file(
            &Client::new(),
            &format!("{}/clip.mp4", server.uri()),
            &dest,
            Duration::from_secs(5),
            MIN_CLIP_BYTES,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::CorruptedDownload { size: 50, .. }
        ));
        assert!(!dest.exists(), "undersized file must be deleted");
    }

    #[tokio::test]
    async fn test_valid_download_written() {
        let server = MockServer::start().await;
        let body = vec![7u8; 20_000];
        Mock::given(method("GET"))
            .and(path("/clip.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");
        let written = download_to_file(
            &Client::new(),
            &format!("{}/clip.mp4", server.uri()),
            &dest,
            Duration::from_secs(5),
            MIN_CLIP_BYTES,
        )
        .await
        .unwrap();

        assert_eq!(written, 20_000);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 20_000);
    }

    #[tokio::test]
    async fn test_http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = download_to_file(
            &Client::new(),
            &format!("{}/clip.mp4", server.uri()),
            dir.path().join("clip.mp4"),
            Duration::from_secs(5),
            MIN_CLIP_BYTES,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }
}
