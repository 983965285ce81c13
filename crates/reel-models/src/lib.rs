//! Shared data models for the ReelForge render pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Render scripts (hook/narration/CTA/topic)
//! - Output targets and encoding configuration
//! - Acquired media segments and background tracks
//! - Timed text overlays

pub mod encoding;
pub mod job;
pub mod overlay;
pub mod script;
pub mod segment;
pub mod target;

// Re-export common types
pub use encoding::EncodingConfig;
pub use job::{JobId, JobStage};
pub use overlay::{
    truncate_to_words, OverlaySpec, OverlayStyle, VerticalAnchor, CTA_DURATION_SECS,
    HOOK_DURATION_SECS, MAX_CTA_CHARS, MAX_HOOK_CHARS,
};
pub use script::Script;
pub use segment::{AudioTrack, BackgroundTrack, ClipSegment, SourceProvider};
pub use target::RenderTarget;
