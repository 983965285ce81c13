//! The content-source capability interface.

use async_trait::async_trait;
use std::path::Path;

use reel_models::{ClipSegment, SourceProvider};

use crate::error::ProviderResult;

/// Uniform interface to fetch finite-length media clips from one external
/// provider. Implementations form the ordered fallback chain walked by the
/// background acquirer.
///
/// Contract: "no results" is `Ok(vec![])`, never an error. Transport and
/// decode failures are typed errors; the caller logs them and falls
/// through to the next provider.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Which provider this source represents.
    fn provider(&self) -> SourceProvider;

    /// Fetch up to `max_results` clips matching `query`, downloading them
    /// under `work_dir`. `target_duration_hint` lets generator-style
    /// providers size their output.
    async fn fetch_clips(
        &self,
        query: &str,
        max_results: usize,
        target_duration_hint: f64,
        work_dir: &Path,
    ) -> ProviderResult<Vec<ClipSegment>>;
}
