//! Output render target.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default vertical output: 1080x1920 @ 30fps, 60 second cap.
pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;
pub const DEFAULT_FRAME_RATE: u32 = 30;
pub const DEFAULT_MAX_DURATION_SECS: f64 = 60.0;

/// Fixed output contract for a render job. Every produced clip (background,
/// overlays, final) must match `width` x `height` exactly before muxing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderTarget {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub frame_rate: u32,
    /// Hard cap on total duration in seconds.
    pub max_duration_secs: f64,
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::vertical_1080()
    }
}

impl RenderTarget {
    /// Full-resolution vertical target (1080x1920).
    pub fn vertical_1080() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: DEFAULT_FRAME_RATE,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }

    /// Reduced vertical target (720x1280) for memory-constrained hosts.
    pub fn vertical_720() -> Self {
        Self {
            width: 720,
            height: 1280,
            ..Self::vertical_1080()
        }
    }

    /// True when the target is taller than wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Clamp a requested duration to the target's hard cap.
    pub fn clamp_duration(&self, duration_secs: f64) -> f64 {
        duration_secs.min(self.max_duration_secs)
    }
}
