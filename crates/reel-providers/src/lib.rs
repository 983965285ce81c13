//! Provider clients for the ReelForge render pipeline.
//!
//! This crate provides:
//! - The `ContentSource` trait implemented by every background provider
//! - AI text-to-video client (generate, poll, download)
//! - Stock-footage search clients (primary and secondary)
//! - Local asset fallback source
//! - Streaming download with a minimum-size integrity check
//! - Two-tier narration synthesis (neural primary, basic fallback)
//!
//! Per the fallback contract, "no results" is an empty `Ok` and transport
//! failures are typed errors the acquirer logs and absorbs; nothing in
//! this crate aborts a render job except narration exhaustion.

pub mod ai_video;
pub mod download;
pub mod error;
pub mod local;
pub mod prompt;
pub mod source;
pub mod stock;
pub mod tts;

pub use ai_video::{AiVideoConfig, AiVideoSource};
pub use download::{download_to_file, MIN_CLIP_BYTES};
pub use error::{ProviderError, ProviderResult};
pub use local::LocalAssetSource;
pub use prompt::build_visual_prompt;
pub use source::ContentSource;
pub use stock::{StockPrimaryConfig, StockPrimarySource, StockSecondaryConfig, StockSecondarySource};
pub use tts::{FallbackTtsConfig, NarrationSynthesizer, NeuralTtsConfig, TtsError};
