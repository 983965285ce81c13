//! Acquired media segments and tracks.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a background segment came from, in fallback priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceProvider {
    /// AI text-to-video generator (contextual, slow, rate-limited).
    AiVideo,
    /// Primary stock-footage search.
    StockPrimary,
    /// Secondary stock-footage search (fills shortfall).
    StockSecondary,
    /// Fixed fallback clip shipped with the deployment.
    LocalAsset,
    /// Procedurally generated color field. Always available.
    Synthetic,
}

impl SourceProvider {
    /// Display name used in logs and segment file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AiVideo => "ai_video",
            Self::StockPrimary => "stock_primary",
            Self::StockSecondary => "stock_secondary",
            Self::LocalAsset => "local_asset",
            Self::Synthetic => "synthetic",
        }
    }
}

impl std::fmt::Display for SourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of narration synthesis. `duration_secs` is measured with ffprobe
/// and becomes the authoritative total length for the rest of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Path to the synthesized audio file.
    pub path: PathBuf,
    /// Measured duration in seconds.
    pub duration_secs: f64,
}

/// One fetched raw asset before normalization.
///
/// Native dimensions may be zero when the provider did not probe the file;
/// the normalizer probes it before doing any math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSegment {
    /// Provider this segment came from.
    pub provider: SourceProvider,
    /// Path to the raw downloaded file.
    pub path: PathBuf,
    /// Native width in pixels (0 when unprobed).
    pub native_width: u32,
    /// Native height in pixels (0 when unprobed).
    pub native_height: u32,
    /// Native duration in seconds (0.0 when unprobed).
    pub native_duration_secs: f64,
}

impl ClipSegment {
    /// Create a segment whose native properties are not yet known.
    pub fn unprobed(provider: SourceProvider, path: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            path: path.into(),
            native_width: 0,
            native_height: 0,
            native_duration_secs: 0.0,
        }
    }

    /// Create a segment with known native properties.
    pub fn probed(
        provider: SourceProvider,
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        duration_secs: f64,
    ) -> Self {
        Self {
            provider,
            path: path.into(),
            native_width: width,
            native_height: height,
            native_duration_secs: duration_secs,
        }
    }
}

/// The normalized, duration-matched visual track produced by background
/// acquisition. Always exactly the target resolution and the audio track's
/// duration (within trim tolerance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundTrack {
    /// Path to the concatenated silent video file.
    pub path: PathBuf,
    /// Total duration in seconds.
    pub duration_secs: f64,
    /// Providers of the concatenated segments, in composition order.
    pub sources: Vec<SourceProvider>,
}

impl BackgroundTrack {
    /// True when every segment fell through to the synthetic generator.
    pub fn is_fully_synthetic(&self) -> bool {
        !self.sources.is_empty()
            && self.sources.iter().all(|s| *s == SourceProvider::Synthetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(SourceProvider::AiVideo.name(), "ai_video");
        assert_eq!(SourceProvider::Synthetic.to_string(), "synthetic");
    }

    #[test]
    fn test_fully_synthetic() {
        let track = BackgroundTrack {
            path: PathBuf::from("/tmp/bg.mp4"),
            duration_secs: 12.0,
            sources: vec![SourceProvider::Synthetic],
        };
        assert!(track.is_fully_synthetic());

        let mixed = BackgroundTrack {
            sources: vec![SourceProvider::StockPrimary, SourceProvider::Synthetic],
            ..track
        };
        assert!(!mixed.is_fully_synthetic());
    }
}
