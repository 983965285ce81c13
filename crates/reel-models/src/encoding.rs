//! Video encoding configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset. Low preset trades quality for speed on
/// memory-constrained hosts.
pub const DEFAULT_PRESET: &str = "ultrafast";
/// Default video bitrate (middle-ground for vertical shorts).
pub const DEFAULT_VIDEO_BITRATE: &str = "3000k";
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// CRF used for intermediate segments (not bitrate-capped).
pub const SEGMENT_CRF: u8 = 23;

/// Video encoding configuration for the final mux/encode step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "ultrafast", "fast")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Target video bitrate (e.g., "3000k")
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Additional FFmpeg output arguments
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_video_bitrate() -> String {
    DEFAULT_VIDEO_BITRATE.to_string()
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: default_video_codec(),
            preset: default_preset(),
            video_bitrate: default_video_bitrate(),
            audio_codec: default_audio_codec(),
            audio_bitrate: default_audio_bitrate(),
            extra_args: Vec::new(),
        }
    }
}

impl EncodingConfig {
    /// Create a new encoding configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with updated preset.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Returns a new config with updated video bitrate.
    pub fn with_video_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.video_bitrate = bitrate.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EncodingConfig::default();
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.preset, "ultrafast");
        assert_eq!(config.video_bitrate, "3000k");
        assert_eq!(config.audio_codec, "aac");
    }

    #[test]
    fn test_builder_overrides() {
        let config = EncodingConfig::new()
            .with_preset("fast")
            .with_video_bitrate("2000k");
        assert_eq!(config.preset, "fast");
        assert_eq!(config.video_bitrate, "2000k");
    }
}
