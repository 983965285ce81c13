//! Render script model.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The content to render: one script per render job, immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Script {
    /// Short attention-grabbing line, shown as an overlay at the start.
    pub hook: String,
    /// Full text to be voiced. Drives the total video duration.
    /// May be empty, in which case it is synthesized from hook + CTA.
    #[serde(default)]
    pub narration: String,
    /// Call-to-action line, shown as an overlay near the end.
    pub cta: String,
    /// Free-text search/prompt seed for background acquisition.
    pub topic: String,
}

/// Validation errors for scripts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script hook is empty")]
    EmptyHook,
    #[error("script CTA is empty")]
    EmptyCta,
    #[error("script topic is empty")]
    EmptyTopic,
}

impl Script {
    /// Create a script with all four fields.
    pub fn new(
        hook: impl Into<String>,
        narration: impl Into<String>,
        cta: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            hook: hook.into(),
            narration: narration.into(),
            cta: cta.into(),
            topic: topic.into(),
        }
    }

    /// Check that the fields required by acquisition and composition
    /// are non-empty. Narration alone may be empty (it is synthesized).
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.hook.trim().is_empty() {
            return Err(ScriptError::EmptyHook);
        }
        if self.cta.trim().is_empty() {
            return Err(ScriptError::EmptyCta);
        }
        if self.topic.trim().is_empty() {
            return Err(ScriptError::EmptyTopic);
        }
        Ok(())
    }

    /// The text that is actually voiced. When narration is missing it is
    /// synthesized from the hook and CTA so the job can still proceed.
    pub fn effective_narration(&self) -> String {
        let narration = self.narration.trim();
        if narration.is_empty() {
            format!("{}. {}.", self.hook.trim(), self.cta.trim())
        } else {
            narration.to_string()
        }
    }
}
