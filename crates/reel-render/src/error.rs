//! Render job error types.
//!
//! Only two failures propagate out of a render job: narration exhaustion
//! and the final encode. Everything else is absorbed by the fallback and
//! degradation mechanisms inside the pipeline.

use thiserror::Error;

use reel_media::MediaError;
use reel_models::script::ScriptError;
use reel_providers::TtsError;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The script failed validation before the job started.
    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),

    /// Both narration providers exhausted. The job cannot proceed.
    #[error("narration synthesis failed: {0}")]
    VoiceSynthesis(#[from] TtsError),

    /// The final mux/encode step failed. There is no fallback after
    /// compositing, so this surfaces to the caller.
    #[error("final encode failed: {0}")]
    Encode(#[source] MediaError),

    /// The media engine itself is unusable (FFmpeg missing or broken).
    /// Background acquisition cannot even synthesize a placeholder.
    #[error("media engine failure: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// True when the calling scheduler should treat this as a voice
    /// failure (retry with different providers) rather than an encode
    /// failure (alert an operator).
    pub fn is_voice_failure(&self) -> bool {
        matches!(self, Self::VoiceSynthesis(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_split() {
        let voice = RenderError::VoiceSynthesis(TtsError::Exhausted("x".to_string()));
        assert!(voice.is_voice_failure());

        let encode = RenderError::Encode(MediaError::FfmpegNotFound);
        assert!(!encode.is_voice_failure());
    }
}
