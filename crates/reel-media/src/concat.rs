//! Segment concatenation via the concat demuxer.
//!
//! Normalized segments share codec, resolution, fps and pixel format, so
//! concatenation is a stream copy rather than a re-encode.

use std::path::{Path, PathBuf};

use reel_models::ClipSegment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Build the concat demuxer manifest for a list of files. Single quotes in
/// paths are escaped per the concat demuxer's quoting rules.
pub fn concat_manifest(paths: &[PathBuf]) -> String {
    let mut manifest = String::new();
    for path in paths {
        let escaped = path.to_string_lossy().replace('\'', r"'\''");
        manifest.push_str(&format!("file '{}'\n", escaped));
    }
    manifest
}

/// Concatenate normalized segments in order into a single silent track.
pub async fn concat_segments(
    segments: &[ClipSegment],
    manifest_path: impl AsRef<Path>,
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    if segments.is_empty() {
        return Err(MediaError::invalid_media("no segments to concatenate"));
    }

    let output = output.as_ref();

    // Single segment: no demuxer run needed.
    if segments.len() == 1 {
        tokio::fs::copy(&segments[0].path, output).await?;
        return Ok(());
    }

    let manifest_path = manifest_path.as_ref();
    let paths: Vec<PathBuf> = segments.iter().map(|s| s.path.clone()).collect();
    tokio::fs::write(manifest_path, concat_manifest(&paths)).await?;

    let cmd = FfmpegCommand::new(output)
        .file_input_with_args(manifest_path, ["-f", "concat", "-safe", "0"])
        .output_args(["-c", "copy"]);

    FfmpegRunner::new().with_timeout(timeout_secs).run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lines_in_order() {
        let paths = vec![
            PathBuf::from("/tmp/job/seg_000.mp4"),
            PathBuf::from("/tmp/job/seg_001.mp4"),
        ];
        let manifest = concat_manifest(&paths);
        assert_eq!(
            manifest,
            "file '/tmp/job/seg_000.mp4'\nfile '/tmp/job/seg_001.mp4'\n"
        );
    }

    #[test]
    fn test_manifest_escapes_single_quotes() {
        let paths = vec![PathBuf::from("/tmp/it's here/seg.mp4")];
        let manifest = concat_manifest(&paths);
        assert_eq!(manifest, "file '/tmp/it'\\''s here/seg.mp4'\n");
    }

    #[tokio::test]
    async fn test_concat_empty_list_fails() {
        let err = concat_segments(&[], "/tmp/list.txt", "/tmp/out.mp4", 30)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::InvalidMedia(_)));
    }
}
