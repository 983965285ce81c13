//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// One input to an FFmpeg invocation.
#[derive(Debug, Clone)]
enum InputSource {
    /// A file on disk.
    File(PathBuf),
    /// A lavfi virtual source (e.g. `color=c=0x4B0082:s=1080x1920:d=10`).
    Lavfi(String),
}

#[derive(Debug, Clone)]
struct Input {
    source: InputSource,
    /// Arguments placed before this input's `-i`.
    args: Vec<String>,
}

/// Builder for FFmpeg commands. Supports multiple inputs so muxing and
/// lavfi synthesis use the same code path as single-input transforms.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    output: PathBuf,
    /// Arguments placed after all inputs.
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command writing to `output`.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add a file input.
    pub fn file_input(self, path: impl AsRef<Path>) -> Self {
        self.file_input_with_args(path, Vec::<String>::new())
    }

    /// Add a file input with arguments placed before its `-i`
    /// (e.g. `-ss`, `-t`, `-stream_loop`).
    pub fn file_input_with_args<I, S>(mut self, path: impl AsRef<Path>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs.push(Input {
            source: InputSource::File(path.as_ref().to_path_buf()),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a lavfi virtual input.
    pub fn lavfi_input(mut self, spec: impl Into<String>) -> Self {
        self.inputs.push(Input {
            source: InputSource::Lavfi(spec.into()),
            args: Vec::new(),
        });
        self
    }

    /// Add an output argument (after all inputs).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set encoding preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set video bitrate.
    pub fn video_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:v").output_arg(bitrate)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Drop all audio streams.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.args.clone());
            match &input.source {
                InputSource::File(path) => {
                    args.push("-i".to_string());
                    args.push(path.to_string_lossy().to_string());
                }
                InputSource::Lavfi(spec) => {
                    args.push("-f".to_string());
                    args.push("lavfi".to_string());
                    args.push("-i".to_string());
                    args.push(spec.clone());
                }
            }
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with a hard timeout.
pub struct FfmpegRunner {
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner without a timeout.
    pub fn new() -> Self {
        Self { timeout_secs: None }
    }

    /// Set a hard timeout; the process is killed when it elapses.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain stderr concurrently so a chatty encode can't fill the pipe
        // and deadlock the child.
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("stderr pipe not captured", None, None))?;
        let stderr_handle = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let status = self.wait_for_completion(&mut child).await?;
        let stderr_output = stderr_handle.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some(stderr_output),
                status.code(),
            ))
        }
    }

    /// Wait for the child process, killing it on timeout.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> MediaResult<std::process::ExitStatus> {
        match self.timeout_secs {
            Some(timeout_secs) => {
                let timeout = tokio::time::timeout(
                    std::time::Duration::from_secs(timeout_secs),
                    child.wait(),
                );
                match timeout.await {
                    Ok(result) => Ok(result?),
                    Err(_) => {
                        warn!(
                            "FFmpeg timed out after {} seconds, killing process",
                            timeout_secs
                        );
                        let _ = child.kill().await;
                        Err(MediaError::Timeout(timeout_secs))
                    }
                }
            }
            None => Ok(child.wait().await?),
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_builder() {
        let cmd = FfmpegCommand::new("out.mp4")
            .file_input_with_args("in.mp4", ["-stream_loop", "2"])
            .video_codec("libx264")
            .crf(23)
            .duration(4.5)
            .no_audio();

        let args = cmd.build_args();
        let joined = args.join(" ");
        assert!(joined.contains("-stream_loop 2 -i in.mp4"));
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-t 4.500"));
        assert!(joined.contains("-an"));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_input_args_precede_their_input() {
        let cmd = FfmpegCommand::new("out.mp4")
            .file_input("bg.mp4")
            .file_input_with_args("voice.mp3", ["-ss", "0"]);

        let args = cmd.build_args();
        let bg = args.iter().position(|a| a == "bg.mp4").unwrap();
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let voice = args.iter().position(|a| a == "voice.mp3").unwrap();
        assert!(bg < ss && ss < voice);
    }

    #[test]
    fn test_lavfi_input() {
        let cmd = FfmpegCommand::new("out.mp4")
            .lavfi_input("color=c=0x4B0082:s=1080x1920:d=10")
            .video_codec("libx264");

        let joined = cmd.build_args().join(" ");
        assert!(joined.contains("-f lavfi -i color=c=0x4B0082:s=1080x1920:d=10"));
    }
}
