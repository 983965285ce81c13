//! Background acquisition: the provider fallback chain.
//!
//! Walks a priority-ordered list of content sources to fill a fixed
//! number of background slots, normalizes whatever it obtains, and
//! concatenates the result into one track matching the narration
//! duration exactly. Degrades to a synthetic gradient rather than
//! failing: provider errors are logged and absorbed, never propagated.

use std::path::Path;

use tracing::{info, warn};

use reel_media::{concat_segments, generate_synthetic_segment, normalize_segment, MediaResult};
use reel_models::{BackgroundTrack, ClipSegment, RenderTarget, SourceProvider};
use reel_providers::ContentSource;

use crate::config::RenderConfig;

/// Shortfall below this many seconds is absorbed by trim tolerance
/// instead of an extra synthetic filler segment.
const SHORTFALL_EPSILON_SECS: f64 = 0.1;

/// Acquires a normalized, duration-matched background track by walking an
/// ordered fallback chain of content sources.
pub struct BackgroundAcquirer {
    sources: Vec<Box<dyn ContentSource>>,
    config: RenderConfig,
}

/// Split `total_secs` into `count` equal shares, with the last share
/// absorbing the rounding remainder so the sum is exact.
pub fn plan_segment_durations(total_secs: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let share = total_secs / count as f64;
    let mut durations = vec![share; count - 1];
    durations.push(total_secs - share * (count - 1) as f64);
    durations
}

impl BackgroundAcquirer {
    /// Create an acquirer over sources in fallback priority order.
    pub fn new(sources: Vec<Box<dyn ContentSource>>, config: RenderConfig) -> Self {
        Self { sources, config }
    }

    /// Walk the provider chain, asking each source only for the remaining
    /// shortfall, and stop as soon as the slot count is filled. Provider
    /// errors are logged and absorbed.
    pub async fn collect_segments(
        &self,
        topic: &str,
        clip_count: usize,
        per_segment_hint_secs: f64,
        work_dir: &Path,
    ) -> Vec<ClipSegment> {
        let mut accumulated: Vec<ClipSegment> = Vec::new();

        for source in &self.sources {
            if accumulated.len() >= clip_count {
                break;
            }
            let shortfall = clip_count - accumulated.len();

            match source
                .fetch_clips(topic, shortfall, per_segment_hint_secs, work_dir)
                .await
            {
                Ok(clips) => {
                    info!(
                        provider = %source.provider(),
                        fetched = clips.len(),
                        shortfall,
                        "Provider responded"
                    );
                    accumulated.extend(clips.into_iter().take(shortfall));
                }
                Err(e) => {
                    warn!(
                        provider = %source.provider(),
                        error = %e,
                        "Provider failed, continuing down the fallback chain"
                    );
                }
            }
        }

        accumulated
    }

    /// Acquire a background track for `topic` spanning exactly
    /// `total_duration_secs`. Never fails short of the media engine
    /// itself being unusable: with zero acquired segments the entire
    /// track is synthesized.
    pub async fn acquire(
        &self,
        topic: &str,
        total_duration_secs: f64,
        target: &RenderTarget,
        work_dir: &Path,
    ) -> MediaResult<BackgroundTrack> {
        let clip_count = self.config.clip_count(total_duration_secs);
        let raw = self
            .collect_segments(topic, clip_count, self.config.per_clip_secs, work_dir)
            .await;

        let mut normalized: Vec<ClipSegment> = Vec::new();
        let mut shortfall_secs = 0.0;

        if raw.is_empty() {
            info!("No provider produced a segment, synthesizing full background");
            shortfall_secs = total_duration_secs;
        } else {
            let durations = plan_segment_durations(total_duration_secs, raw.len());
            for (i, (segment, slot_secs)) in raw.iter().zip(durations.iter()).enumerate() {
                let output = work_dir.join(format!("norm_{:03}.mp4", i));
                match normalize_segment(
                    segment,
                    target,
                    *slot_secs,
                    &output,
                    self.config.normalize_timeout_secs,
                )
                .await
                {
                    Ok(conformed) => normalized.push(conformed),
                    Err(e) => {
                        // Unreadable codec or truncated file: drop the
                        // segment and let the synthetic tail cover its slot.
                        warn!(
                            provider = %segment.provider,
                            error = %e,
                            "Normalization failed, dropping segment"
                        );
                        shortfall_secs += slot_secs;
                    }
                }
            }
        }

        if shortfall_secs > SHORTFALL_EPSILON_SECS {
            let output = work_dir.join(format!("norm_{:03}.mp4", normalized.len()));
            let synthetic = generate_synthetic_segment(
                topic,
                target,
                shortfall_secs,
                &output,
                self.config.normalize_timeout_secs,
            )
            .await?;
            normalized.push(synthetic);
        }

        let sources: Vec<SourceProvider> = normalized.iter().map(|s| s.provider).collect();
        let background_path = work_dir.join("background.mp4");
        concat_segments(
            &normalized,
            work_dir.join("concat.txt"),
            &background_path,
            self.config.normalize_timeout_secs,
        )
        .await?;

        info!(segments = sources.len(), "Background track assembled");

        Ok(BackgroundTrack {
            path: background_path,
            duration_secs: total_duration_secs,
            sources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reel_providers::{ProviderError, ProviderResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted source returning a fixed outcome, recording how many
    /// clips were requested from it.
    struct ScriptedSource {
        provider: SourceProvider,
        outcome: Outcome,
        requested: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    enum Outcome {
        Clips(usize),
        Empty,
        Error,
    }

    impl ScriptedSource {
        fn new(provider: SourceProvider, outcome: Outcome) -> Self {
            Self {
                provider,
                outcome,
                requested: Arc::new(AtomicUsize::new(0)),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ContentSource for ScriptedSource {
        fn provider(&self) -> SourceProvider {
            self.provider
        }

        async fn fetch_clips(
            &self,
            _query: &str,
            max_results: usize,
            _target_duration_hint: f64,
            _work_dir: &Path,
        ) -> ProviderResult<Vec<ClipSegment>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.store(max_results, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Clips(n) => Ok((0..*n.min(&max_results))
                    .map(|i| {
                        ClipSegment::unprobed(
                            self.provider,
                            format!("/tmp/{}_{}.mp4", self.provider, i),
                        )
                    })
                    .collect()),
                Outcome::Empty => Ok(Vec::new()),
                Outcome::Error => Err(ProviderError::unavailable("scripted", "forced failure")),
            }
        }
    }

    fn acquirer(sources: Vec<Box<dyn ContentSource>>) -> BackgroundAcquirer {
        BackgroundAcquirer::new(sources, RenderConfig::default())
    }

    #[test]
    fn test_plan_durations_sum_exactly() {
        let durations = plan_segment_durations(12.4, 3);
        assert_eq!(durations.len(), 3);
        let sum: f64 = durations.iter().sum();
        assert!((sum - 12.4).abs() < 1e-9);
        // Last segment absorbs the remainder
        assert!((durations[0] - durations[1]).abs() < 1e-9);
    }

    #[test]
    fn test_plan_durations_single_segment() {
        assert_eq!(plan_segment_durations(7.3, 1), vec![7.3]);
        assert!(plan_segment_durations(7.3, 0).is_empty());
    }

    #[tokio::test]
    async fn test_fallback_order_is_provider_priority_order() {
        // Provider 1 empty, provider 2 yields 2, provider 3 errors,
        // provider 4 yields the rest.
        let sources: Vec<Box<dyn ContentSource>> = vec![
            Box::new(ScriptedSource::new(SourceProvider::AiVideo, Outcome::Empty)),
            Box::new(ScriptedSource::new(
                SourceProvider::StockPrimary,
                Outcome::Clips(2),
            )),
            Box::new(ScriptedSource::new(
                SourceProvider::StockSecondary,
                Outcome::Error,
            )),
            Box::new(ScriptedSource::new(
                SourceProvider::LocalAsset,
                Outcome::Clips(5),
            )),
        ];
        let acquirer = acquirer(sources);

        let dir = tempfile::tempdir().unwrap();
        let segments = acquirer
            .collect_segments("technology", 3, 4.0, dir.path())
            .await;

        let order: Vec<SourceProvider> = segments.iter().map(|s| s.provider).collect();
        assert_eq!(
            order,
            vec![
                SourceProvider::StockPrimary,
                SourceProvider::StockPrimary,
                SourceProvider::LocalAsset,
            ]
        );
    }

    #[tokio::test]
    async fn test_walk_stops_once_filled() {
        let first = Box::new(ScriptedSource::new(
            SourceProvider::StockPrimary,
            Outcome::Clips(6),
        ));
        let second = Box::new(ScriptedSource::new(
            SourceProvider::StockSecondary,
            Outcome::Clips(6),
        ));
        let second_calls = second.calls.clone();
        let acquirer = acquirer(vec![first, second]);

        let dir = tempfile::tempdir().unwrap();
        let segments = acquirer
            .collect_segments("technology", 3, 4.0, dir.path())
            .await;

        assert_eq!(segments.len(), 3);
        // The second provider was never consulted.
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_requests_only_the_shortfall() {
        let first = Box::new(ScriptedSource::new(
            SourceProvider::StockPrimary,
            Outcome::Clips(2),
        ));
        let second = Box::new(ScriptedSource::new(
            SourceProvider::StockSecondary,
            Outcome::Clips(6),
        ));
        let second_requested = second.requested.clone();
        let acquirer = acquirer(vec![first, second]);

        let dir = tempfile::tempdir().unwrap();
        let segments = acquirer
            .collect_segments("technology", 5, 4.0, dir.path())
            .await;

        assert_eq!(segments.len(), 5);
        assert_eq!(second_requested.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_total_failure_collects_nothing_but_never_panics() {
        let sources: Vec<Box<dyn ContentSource>> = vec![
            Box::new(ScriptedSource::new(SourceProvider::AiVideo, Outcome::Error)),
            Box::new(ScriptedSource::new(
                SourceProvider::StockPrimary,
                Outcome::Empty,
            )),
            Box::new(ScriptedSource::new(
                SourceProvider::StockSecondary,
                Outcome::Error,
            )),
        ];
        let acquirer = acquirer(sources);

        let dir = tempfile::tempdir().unwrap();
        let segments = acquirer
            .collect_segments("technology", 3, 4.0, dir.path())
            .await;
        assert!(segments.is_empty());
    }
}
