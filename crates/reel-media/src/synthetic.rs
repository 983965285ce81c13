//! Synthetic background generation.
//!
//! Terminal step of the acquisition fallback chain: a lavfi gradient blend
//! with a slow zoom, generated entirely by FFmpeg with no network
//! dependency. Colors come from a fixed palette keyed by topic keywords,
//! varied by timestamp so repeated runs differ visibly.

use std::path::Path;

use tracing::info;

use reel_models::encoding::SEGMENT_CRF;
use reel_models::{ClipSegment, RenderTarget, SourceProvider};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Topic-keyed color pairs (base, overlay).
const TOPIC_COLORS: &[(&str, (&str, &str))] = &[
    ("ai", ("0x4B0082", "0x0096FF")),
    ("tech", ("0x1A1A40", "0x00C8FF")),
    ("business", ("0x006400", "0xFFD700")),
    ("money", ("0x003300", "0xFFC800")),
    ("coding", ("0x0D1117", "0x30A14E")),
];

/// General palette rotated by timestamp when no keyword matches.
const FALLBACK_PALETTE: &[(&str, &str)] = &[
    ("0xFF6600", "0xFFC800"),
    ("0x14142B", "0x4B0082"),
    ("0x0B3D91", "0x00B4D8"),
    ("0x3C096C", "0xFF477E"),
    ("0x1B4332", "0x95D5B2"),
];

/// Choose a color pair for a topic. Keyword hits are stable; otherwise the
/// palette index rotates with the timestamp so repeated runs vary.
pub fn pick_colors(topic: &str, unix_secs: i64) -> (&'static str, &'static str) {
    let topic_lower = topic.to_lowercase();
    for (keyword, pair) in TOPIC_COLORS {
        if topic_lower.contains(keyword) {
            return *pair;
        }
    }
    FALLBACK_PALETTE[(unix_secs.unsigned_abs() as usize) % FALLBACK_PALETTE.len()]
}

/// Lavfi source spec for a solid color field.
fn color_source(color: &str, target: &RenderTarget, duration_secs: f64) -> String {
    format!(
        "color=c={}:s={}x{}:d={:.3}:r={}",
        color, target.width, target.height, duration_secs, target.frame_rate
    )
}

/// Generate a synthetic gradient segment spanning `duration_secs`.
///
/// This path has no external dependency and terminates the fallback chain;
/// it fails only if FFmpeg itself is missing or broken.
pub async fn generate_synthetic_segment(
    topic: &str,
    target: &RenderTarget,
    duration_secs: f64,
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<ClipSegment> {
    let output = output.as_ref();
    let (base, overlay) = pick_colors(topic, chrono::Utc::now().timestamp());

    info!(
        topic = %topic,
        base = %base,
        overlay = %overlay,
        "Generating synthetic gradient background"
    );

    let frames = (duration_secs * target.frame_rate as f64).round() as u64;
    let filter = format!(
        "[0:v][1:v]blend=all_mode=overlay:all_opacity=0.5,\
         zoompan=z='min(zoom+0.0015,1.5)':d={frames}:s={w}x{h}:fps={fps},setsar=1[v]",
        frames = frames,
        w = target.width,
        h = target.height,
        fps = target.frame_rate
    );

    let cmd = FfmpegCommand::new(output)
        .lavfi_input(color_source(base, target, duration_secs))
        .lavfi_input(color_source(overlay, target, duration_secs))
        .filter_complex(filter)
        .output_args(["-map", "[v]"])
        .video_codec("libx264")
        .preset("ultrafast")
        .crf(SEGMENT_CRF)
        .output_args(["-pix_fmt", "yuv420p"])
        .duration(duration_secs);

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    Ok(ClipSegment::probed(
        SourceProvider::Synthetic,
        output,
        target.width,
        target.height,
        duration_secs,
    ))
}
