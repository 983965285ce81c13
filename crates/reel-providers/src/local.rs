//! Local filesystem asset source.
//!
//! A single fixed fallback clip shipped with the deployment. No network
//! involved; either the file is usable or the chain moves on to the
//! synthetic generator.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use reel_models::{ClipSegment, SourceProvider};

use crate::download::MIN_CLIP_BYTES;
use crate::error::ProviderResult;
use crate::source::ContentSource;

/// Content source backed by a fixed clip on disk.
pub struct LocalAssetSource {
    asset_path: PathBuf,
}

impl LocalAssetSource {
    /// Create a source for the deployment's fallback clip.
    pub fn new(asset_path: impl Into<PathBuf>) -> Self {
        Self {
            asset_path: asset_path.into(),
        }
    }
}

#[async_trait]
impl ContentSource for LocalAssetSource {
    fn provider(&self) -> SourceProvider {
        SourceProvider::LocalAsset
    }

    async fn fetch_clips(
        &self,
        _query: &str,
        _max_results: usize,
        _target_duration_hint: f64,
        _work_dir: &Path,
    ) -> ProviderResult<Vec<ClipSegment>> {
        let Ok(metadata) = tokio::fs::metadata(&self.asset_path).await else {
            debug!(path = %self.asset_path.display(), "No local asset present");
            return Ok(Vec::new());
        };

        if metadata.len() < MIN_CLIP_BYTES {
            debug!(
                path = %self.asset_path.display(),
                size = metadata.len(),
                "Local asset below integrity threshold, skipping"
            );
            return Ok(Vec::new());
        }

        info!(path = %self.asset_path.display(), "Using local asset clip");
        // The asset is read in place; normalization writes its own copy,
        // so the shipped file is never mutated or deleted.
        Ok(vec![ClipSegment::unprobed(
            SourceProvider::LocalAsset,
            self.asset_path.clone(),
        )])
    }
}
