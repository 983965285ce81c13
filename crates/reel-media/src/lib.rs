#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the ReelForge render pipeline.
//!
//! This crate provides:
//! - Type-safe multi-input FFmpeg command building
//! - FFprobe media inspection (video and audio)
//! - Clip normalization (scale-to-cover, center-crop, loop/trim)
//! - Synthetic gradient background generation
//! - Segment concatenation
//! - Timed drawtext overlays
//! - Final audio/video muxing

pub mod command;
pub mod concat;
pub mod error;
pub mod mux;
pub mod normalize;
pub mod overlay;
pub mod probe;
pub mod synthetic;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use concat::concat_segments;
pub use error::{MediaError, MediaResult};
pub use mux::mux_final;
pub use normalize::{needs_normalization, normalize_segment};
pub use overlay::{build_overlay_chain, find_font_file};
pub use probe::{probe_media, MediaInfo};
pub use synthetic::generate_synthetic_segment;
