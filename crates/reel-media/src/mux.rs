//! Final assembly: mux narration audio onto the background track.
//!
//! One encode pass applies the overlay drawtext chain, maps the video from
//! the background and the audio from the narration track, and writes the
//! final container with the configured codec settings. This is the only
//! media step with no further fallback; its failure is fatal to the job.

use std::path::Path;

use tracing::info;

use reel_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Mux `audio` onto `background`, applying an optional drawtext chain, and
/// encode the final output. Duration is pinned to the audio track's length.
pub async fn mux_final(
    background: impl AsRef<Path>,
    audio: impl AsRef<Path>,
    overlay_chain: Option<&str>,
    encoding: &EncodingConfig,
    duration_secs: f64,
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let background = background.as_ref();
    let audio = audio.as_ref();
    let output = output.as_ref();

    if !background.exists() {
        return Err(MediaError::FileNotFound(background.to_path_buf()));
    }
    if !audio.exists() {
        return Err(MediaError::FileNotFound(audio.to_path_buf()));
    }

    let mut cmd = FfmpegCommand::new(output)
        .file_input(background)
        .file_input(audio)
        .output_args(["-map", "0:v", "-map", "1:a"]);

    if let Some(chain) = overlay_chain {
        cmd = cmd.video_filter(chain);
    }

    cmd = cmd
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .video_bitrate(&encoding.video_bitrate)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .output_args(["-pix_fmt", "yuv420p"])
        .output_args(["-movflags", "+faststart"])
        .output_args(encoding.extra_args.clone())
        .duration(duration_secs);

    info!(
        output = %output.display(),
        duration_secs,
        "Encoding final video"
    );

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}
