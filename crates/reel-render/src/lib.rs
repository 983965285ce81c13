//! Render pipeline orchestration for ReelForge.
//!
//! Wires the provider fallback chain, clip normalization, overlay
//! composition and final assembly into a single sequential render job.
//! The sole public entry point is [`VideoAssembler::render`].

pub mod acquirer;
pub mod assembler;
pub mod composer;
pub mod config;
pub mod error;
pub mod logging;

pub use acquirer::BackgroundAcquirer;
pub use assembler::VideoAssembler;
pub use composer::compose_overlays;
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use logging::JobLogger;
