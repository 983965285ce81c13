//! Stock-footage search clients.
//!
//! Two independent keyword-search providers fill the middle of the
//! fallback chain: a primary (Pexels-shaped, portrait-filtered search
//! with per-rendition quality tags) and a secondary (Pixabay-shaped) used
//! to cover any shortfall left by the primary.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use reel_models::{ClipSegment, SourceProvider};

use crate::download::{download_to_file, MIN_CLIP_BYTES};
use crate::error::{ProviderError, ProviderResult};
use crate::source::ContentSource;

/// Configuration for the primary stock provider.
#[derive(Debug, Clone)]
pub struct StockPrimaryConfig {
    pub base_url: String,
    pub api_key: String,
    pub search_timeout: Duration,
    pub download_timeout: Duration,
}

impl Default for StockPrimaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.pexels.com".to_string(),
            api_key: String::new(),
            search_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
        }
    }
}

/// Configuration for the secondary stock provider.
#[derive(Debug, Clone)]
pub struct StockSecondaryConfig {
    pub base_url: String,
    pub api_key: String,
    pub search_timeout: Duration,
    pub download_timeout: Duration,
}

impl Default for StockSecondaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pixabay.com".to_string(),
            api_key: String::new(),
            search_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
        }
    }
}

// Primary provider wire types.

#[derive(Debug, Deserialize)]
struct PrimarySearchResponse {
    #[serde(default)]
    videos: Vec<PrimaryVideo>,
}

#[derive(Debug, Deserialize)]
struct PrimaryVideo {
    #[serde(default)]
    video_files: Vec<PrimaryVideoFile>,
}

#[derive(Debug, Deserialize)]
struct PrimaryVideoFile {
    quality: Option<String>,
    link: String,
}

impl PrimaryVideo {
    /// Pick the HD rendition, falling back to the first file.
    fn best_link(&self) -> Option<&str> {
        self.video_files
            .iter()
            .find(|f| f.quality.as_deref() == Some("hd"))
            .or_else(|| self.video_files.first())
            .map(|f| f.link.as_str())
    }
}

// Secondary provider wire types.

#[derive(Debug, Deserialize)]
struct SecondarySearchResponse {
    #[serde(default)]
    hits: Vec<SecondaryHit>,
}

#[derive(Debug, Deserialize)]
struct SecondaryHit {
    videos: Option<SecondaryRenditions>,
}

#[derive(Debug, Deserialize)]
struct SecondaryRenditions {
    medium: Option<SecondaryRendition>,
}

#[derive(Debug, Deserialize)]
struct SecondaryRendition {
    url: String,
}

/// Primary stock-footage search client.
pub struct StockPrimarySource {
    http: Client,
    config: StockPrimaryConfig,
}

impl StockPrimarySource {
    /// Create a new client, or `None` when no API key is configured.
    pub fn new(config: StockPrimaryConfig) -> Option<Self> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            http: Client::new(),
            config,
        })
    }
}

#[async_trait]
impl ContentSource for StockPrimarySource {
    fn provider(&self) -> SourceProvider {
        SourceProvider::StockPrimary
    }

    async fn fetch_clips(
        &self,
        query: &str,
        max_results: usize,
        _target_duration_hint: f64,
        work_dir: &Path,
    ) -> ProviderResult<Vec<ClipSegment>> {
        let url = format!(
            "{}/videos/search?query={}&per_page={}&orientation=portrait",
            self.config.base_url,
            urlencoding::encode(query),
            max_results
        );

        let response = self
            .http
            .get(&url)
            .header("Authorization", &self.config.api_key)
            .timeout(self.config.search_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::unavailable(
                "stock_primary",
                format!("search returned HTTP {}", response.status()),
            ));
        }

        let body: PrimarySearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("stock_primary", e.to_string()))?;

        let mut clips = Vec::new();
        for (i, video) in body.videos.iter().take(max_results).enumerate() {
            let Some(link) = video.best_link() else {
                continue;
            };
            let dest = work_dir.join(format!("stock_primary_{:03}.mp4", i));
            match download_to_file(
                &self.http,
                link,
                &dest,
                self.config.download_timeout,
                MIN_CLIP_BYTES,
            )
            .await
            {
                Ok(_) => clips.push(ClipSegment::unprobed(SourceProvider::StockPrimary, dest)),
                // One bad download must not discard the rest of the batch.
                Err(e) => warn!(error = %e, "Skipping stock clip"),
            }
        }

        info!(count = clips.len(), query = %query, "Primary stock search complete");
        Ok(clips)
    }
}

/// Secondary stock-footage search client.
pub struct StockSecondarySource {
    http: Client,
    config: StockSecondaryConfig,
}

impl StockSecondarySource {
    /// Create a new client, or `None` when no API key is configured.
    pub fn new(config: StockSecondaryConfig) -> Option<Self> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            http: Client::new(),
            config,
        })
    }
}

#[async_trait]
impl ContentSource for StockSecondarySource {
    fn provider(&self) -> SourceProvider {
        SourceProvider::StockSecondary
    }

    async fn fetch_clips(
        &self,
        query: &str,
        max_results: usize,
        _target_duration_hint: f64,
        work_dir: &Path,
    ) -> ProviderResult<Vec<ClipSegment>> {
        // Over-request slightly; some hits lack a usable rendition.
        let url = format!(
            "{}/api/videos/?key={}&q={}&per_page={}",
            self.config.base_url,
            self.config.api_key,
            urlencoding::encode(query),
            max_results + 3
        );

        let response = self
            .http
            .get(&url)
            .timeout(self.config.search_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::unavailable(
                "stock_secondary",
                format!("search returned HTTP {}", response.status()),
            ));
        }

        let body: SecondarySearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed("stock_secondary", e.to_string()))?;

        let mut clips = Vec::new();
        for (i, hit) in body.hits.iter().enumerate() {
            if clips.len() >= max_results {
                break;
            }
            let Some(url) = hit
                .videos
                .as_ref()
                .and_then(|v| v.medium.as_ref())
                .map(|r| r.url.as_str())
            else {
                continue;
            };
            let dest = work_dir.join(format!("stock_secondary_{:03}.mp4", i));
            match download_to_file(
                &self.http,
                url,
                &dest,
                self.config.download_timeout,
                MIN_CLIP_BYTES,
            )
            .await
            {
                Ok(_) => clips.push(ClipSegment::unprobed(SourceProvider::StockSecondary, dest)),
                Err(e) => warn!(error = %e, "Skipping stock clip"),
            }
        }

        info!(count = clips.len(), query = %query, "Secondary stock search complete");
        Ok(clips)
    }
}
