//! Clip normalization: scale-to-cover, center-crop, loop/trim.
//!
//! Raw segments arrive in arbitrary resolutions and lengths. Normalization
//! produces a silent clip at exactly the target resolution and exactly the
//! requested duration: scale so one dimension matches while preserving
//! aspect ratio, center-crop the other (never letterbox), loop short
//! sources, trim long ones.

use std::path::Path;

use tracing::debug;

use reel_models::encoding::SEGMENT_CRF;
use reel_models::{ClipSegment, RenderTarget};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_media, MediaInfo};

/// Tolerance when comparing durations, in seconds.
pub const DURATION_TOLERANCE_SECS: f64 = 0.1;

/// Scale-to-cover then center-crop filter for a target, plus fps and SAR
/// conformance so normalized segments can be concatenated with stream copy.
pub fn cover_filter(target: &RenderTarget) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},fps={fps},setsar=1",
        w = target.width,
        h = target.height,
        fps = target.frame_rate
    )
}

/// Number of extra `-stream_loop` iterations needed to cover `slot_secs`
/// with a source of `native_secs`. Zero when the source is long enough.
pub fn loop_count(native_secs: f64, slot_secs: f64) -> u32 {
    if native_secs <= 0.0 || native_secs >= slot_secs {
        return 0;
    }
    (slot_secs / native_secs).ceil() as u32 - 1
}

/// True when the segment already conforms to the target and duration, so
/// normalization can be skipped.
pub fn needs_normalization(
    info: &MediaInfo,
    target: &RenderTarget,
    duration_secs: f64,
    tolerance_secs: f64,
) -> bool {
    info.width != target.width
        || info.height != target.height
        || (info.duration - duration_secs).abs() > tolerance_secs
        || (info.fps - target.frame_rate as f64).abs() > 0.5
        || info.has_audio
}

/// Normalize a raw segment to exactly `target` resolution and
/// `duration_secs`, writing the result to `output`. Strips any native
/// audio. Already-conforming segments are copied without re-encoding.
pub async fn normalize_segment(
    segment: &ClipSegment,
    target: &RenderTarget,
    duration_secs: f64,
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<ClipSegment> {
    let output = output.as_ref();
    let info = probe_media(&segment.path).await?;

    if info.duration <= 0.0 {
        return Err(MediaError::invalid_media(format!(
            "segment from {} reports zero duration",
            segment.provider
        )));
    }

    if !needs_normalization(&info, target, duration_secs, DURATION_TOLERANCE_SECS) {
        debug!(
            provider = %segment.provider,
            "Segment already conforms, copying without re-encode"
        );
        tokio::fs::copy(&segment.path, output).await?;
        return Ok(ClipSegment::probed(
            segment.provider,
            output,
            info.width,
            info.height,
            info.duration,
        ));
    }

    let loops = loop_count(info.duration, duration_secs);
    let mut input_args: Vec<String> = Vec::new();
    if loops > 0 {
        input_args.push("-stream_loop".to_string());
        input_args.push(loops.to_string());
    }

    let cmd = FfmpegCommand::new(output)
        .file_input_with_args(&segment.path, input_args)
        .video_filter(cover_filter(target))
        .video_codec("libx264")
        .preset("ultrafast")
        .crf(SEGMENT_CRF)
        .output_args(["-pix_fmt", "yuv420p"])
        .no_audio()
        .duration(duration_secs);

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await?;

    Ok(ClipSegment::probed(
        segment.provider,
        output,
        target.width,
        target.height,
        duration_secs,
    ))
}
