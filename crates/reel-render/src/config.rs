//! Render configuration.
//!
//! Resolved once at startup and passed into components by value; no
//! component reads the process environment directly, which keeps every
//! seam mockable in tests.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one render pipeline instance.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Root directory for job-scoped temp subdirectories.
    pub work_dir: PathBuf,
    /// Target seconds per background clip (visual pattern-interrupt pacing).
    pub per_clip_secs: f64,
    /// Minimum background segments per job.
    pub min_clips: usize,
    /// Maximum background segments per job. Capped low to bound memory
    /// and bandwidth on constrained hosts.
    pub max_clips: usize,
    /// Timeout for provider search/status calls.
    pub search_timeout: Duration,
    /// Timeout for clip downloads.
    pub download_timeout: Duration,
    /// Timeout for each per-segment normalization encode, in seconds.
    pub normalize_timeout_secs: u64,
    /// Timeout for the final mux/encode, in seconds.
    pub encode_timeout_secs: u64,

    /// AI video generator key (empty disables the tier).
    pub ai_video_api_key: String,
    /// AI video generator base URL.
    pub ai_video_base_url: String,
    /// Primary stock-footage key (empty disables the tier).
    pub stock_primary_api_key: String,
    /// Primary stock-footage base URL.
    pub stock_primary_base_url: String,
    /// Secondary stock-footage key (empty disables the tier).
    pub stock_secondary_api_key: String,
    /// Secondary stock-footage base URL.
    pub stock_secondary_base_url: String,
    /// Deployment-shipped fallback clip.
    pub local_asset_path: PathBuf,

    /// Neural TTS key (empty disables the primary narration tier).
    pub neural_tts_api_key: String,
    /// Neural TTS base URL.
    pub neural_tts_base_url: String,
    /// Fallback TTS base URL.
    pub fallback_tts_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/reelforge"),
            per_clip_secs: 4.0,
            min_clips: 1,
            max_clips: 6,
            search_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(30),
            normalize_timeout_secs: 60,
            encode_timeout_secs: 60,
            ai_video_api_key: String::new(),
            ai_video_base_url: "https://api.klingai.com".to_string(),
            stock_primary_api_key: String::new(),
            stock_primary_base_url: "https://api.pexels.com".to_string(),
            stock_secondary_api_key: String::new(),
            stock_secondary_base_url: "https://pixabay.com".to_string(),
            local_asset_path: PathBuf::from("assets/background.mp4"),
            neural_tts_api_key: String::new(),
            neural_tts_base_url: "https://api.elevenlabs.io".to_string(),
            fallback_tts_base_url: "http://localhost:5002".to_string(),
        }
    }
}

impl RenderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: env_path("REEL_WORK_DIR", defaults.work_dir),
            per_clip_secs: env_parse("REEL_PER_CLIP_SECS", defaults.per_clip_secs),
            min_clips: env_parse("REEL_MIN_CLIPS", defaults.min_clips),
            max_clips: env_parse("REEL_MAX_CLIPS", defaults.max_clips),
            search_timeout: Duration::from_secs(env_parse(
                "REEL_SEARCH_TIMEOUT_SECS",
                defaults.search_timeout.as_secs(),
            )),
            download_timeout: Duration::from_secs(env_parse(
                "REEL_DOWNLOAD_TIMEOUT_SECS",
                defaults.download_timeout.as_secs(),
            )),
            normalize_timeout_secs: env_parse(
                "REEL_NORMALIZE_TIMEOUT_SECS",
                defaults.normalize_timeout_secs,
            ),
            encode_timeout_secs: env_parse(
                "REEL_ENCODE_TIMEOUT_SECS",
                defaults.encode_timeout_secs,
            ),
            ai_video_api_key: env_string("AI_VIDEO_API_KEY", defaults.ai_video_api_key),
            ai_video_base_url: env_string("AI_VIDEO_BASE_URL", defaults.ai_video_base_url),
            stock_primary_api_key: env_string(
                "STOCK_PRIMARY_API_KEY",
                defaults.stock_primary_api_key,
            ),
            stock_primary_base_url: env_string(
                "STOCK_PRIMARY_BASE_URL",
                defaults.stock_primary_base_url,
            ),
            stock_secondary_api_key: env_string(
                "STOCK_SECONDARY_API_KEY",
                defaults.stock_secondary_api_key,
            ),
            stock_secondary_base_url: env_string(
                "STOCK_SECONDARY_BASE_URL",
                defaults.stock_secondary_base_url,
            ),
            local_asset_path: env_path("REEL_LOCAL_ASSET", defaults.local_asset_path),
            neural_tts_api_key: env_string("NEURAL_TTS_API_KEY", defaults.neural_tts_api_key),
            neural_tts_base_url: env_string("NEURAL_TTS_BASE_URL", defaults.neural_tts_base_url),
            fallback_tts_base_url: env_string(
                "FALLBACK_TTS_BASE_URL",
                defaults.fallback_tts_base_url,
            ),
        }
    }

    /// Number of background segments for a total duration:
    /// `clamp(round(total / per_clip), min, max)`.
    pub fn clip_count(&self, total_duration_secs: f64) -> usize {
        let raw = (total_duration_secs / self.per_clip_secs).round() as usize;
        raw.clamp(self.min_clips.max(1), self.max_clips)
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
