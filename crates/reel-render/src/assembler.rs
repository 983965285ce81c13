//! End-to-end render orchestration.
//!
//! One [`VideoAssembler::render`] call takes a validated script through
//! narration synthesis, background acquisition, overlay composition and
//! the final mux, producing a single vertical video file. Renders are
//! serialized process-wide because FFmpeg encodes saturate the CPU on
//! the small hosts this runs on.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tempfile::TempDir;
use tokio::sync::Mutex;
use tracing::info;

use reel_media::{build_overlay_chain, find_font_file, mux_final};
use reel_models::{EncodingConfig, JobId, JobStage, RenderTarget, Script};
use reel_providers::{
    AiVideoConfig, AiVideoSource, ContentSource, FallbackTtsConfig, LocalAssetSource,
    NarrationSynthesizer, NeuralTtsConfig, StockPrimaryConfig, StockPrimarySource,
    StockSecondaryConfig, StockSecondarySource,
};

use crate::acquirer::BackgroundAcquirer;
use crate::composer::compose_overlays;
use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::logging::JobLogger;

/// Serializes render jobs within the process. An async mutex because the
/// guard is held across the whole render, including its await points.
fn render_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Full render pipeline. Construct once per process configuration and
/// call [`render`](Self::render) per job.
pub struct VideoAssembler {
    config: RenderConfig,
    synthesizer: NarrationSynthesizer,
    acquirer: BackgroundAcquirer,
    encoding: EncodingConfig,
}

impl VideoAssembler {
    /// Build the assembler from resolved configuration. Provider tiers
    /// with no API key configured are left out of the fallback chain.
    pub fn from_config(config: RenderConfig) -> Self {
        let synthesizer = NarrationSynthesizer::new(
            Some(NeuralTtsConfig {
                base_url: config.neural_tts_base_url.clone(),
                api_key: config.neural_tts_api_key.clone(),
                ..NeuralTtsConfig::default()
            }),
            FallbackTtsConfig {
                base_url: config.fallback_tts_base_url.clone(),
                ..FallbackTtsConfig::default()
            },
        );

        let mut sources: Vec<Box<dyn ContentSource>> = Vec::new();
        if let Some(ai) = AiVideoSource::new(AiVideoConfig {
            base_url: config.ai_video_base_url.clone(),
            api_key: config.ai_video_api_key.clone(),
            request_timeout: config.search_timeout,
            download_timeout: config.download_timeout,
            ..AiVideoConfig::default()
        }) {
            sources.push(Box::new(ai));
        }
        if let Some(stock) = StockPrimarySource::new(StockPrimaryConfig {
            base_url: config.stock_primary_base_url.clone(),
            api_key: config.stock_primary_api_key.clone(),
            search_timeout: config.search_timeout,
            download_timeout: config.download_timeout,
        }) {
            sources.push(Box::new(stock));
        }
        if let Some(stock) = StockSecondarySource::new(StockSecondaryConfig {
            base_url: config.stock_secondary_base_url.clone(),
            api_key: config.stock_secondary_api_key.clone(),
            search_timeout: config.search_timeout,
            download_timeout: config.download_timeout,
        }) {
            sources.push(Box::new(stock));
        }
        sources.push(Box::new(LocalAssetSource::new(&config.local_asset_path)));

        let acquirer = BackgroundAcquirer::new(sources, config.clone());

        Self {
            config,
            synthesizer,
            acquirer,
            encoding: EncodingConfig::default(),
        }
    }

    /// Render `script` into a vertical video at `output_path`.
    ///
    /// Narration length drives the final duration, clamped to the
    /// target's cap. Missing fonts, failed providers and unreadable
    /// clips all degrade; only script validation, narration exhaustion
    /// and the final encode fail the job.
    pub async fn render(
        &self,
        script: &Script,
        target: &RenderTarget,
        output_path: &Path,
    ) -> RenderResult<PathBuf> {
        script.validate()?;

        let job_id = JobId::new();
        let logger = JobLogger::new(&job_id);
        let _run_guard = render_lock().lock().await;

        std::fs::create_dir_all(&self.config.work_dir)?;
        let work_dir = TempDir::with_prefix_in(format!("job_{}_", job_id), &self.config.work_dir)?;

        logger.log_stage(JobStage::SynthesizingAudio);
        let narration = script.effective_narration();
        let audio = match self
            .synthesizer
            .synthesize(&narration, work_dir.path().join("narration.mp3"))
            .await
        {
            Ok(audio) => audio,
            Err(e) => {
                logger.log_error(JobStage::SynthesizingAudio, &e.to_string());
                return Err(e.into());
            }
        };
        let total_secs = target.clamp_duration(audio.duration_secs);
        logger.log_progress(
            JobStage::SynthesizingAudio,
            &format!("Narration ready, {:.2}s", audio.duration_secs),
        );

        logger.log_stage(JobStage::AcquiringBackground);
        let background = self
            .acquirer
            .acquire(&script.topic, total_secs, target, work_dir.path())
            .await?;
        if background.is_fully_synthetic() {
            logger.log_warning(
                JobStage::AcquiringBackground,
                "All providers failed, rendering on synthetic background",
            );
        }

        logger.log_stage(JobStage::Compositing);
        let overlays = compose_overlays(script, total_secs);
        let font = find_font_file();
        let overlay_chain = build_overlay_chain(&overlays, target, font.as_deref());
        if overlay_chain.is_none() && !overlays.is_empty() {
            logger.log_warning(
                JobStage::Compositing,
                "No usable font found, skipping text overlays",
            );
        }

        logger.log_stage(JobStage::Encoding);
        let final_path = work_dir.path().join("final.mp4");
        mux_final(
            &background.path,
            &audio.path,
            overlay_chain.as_deref(),
            &self.encoding,
            total_secs,
            &final_path,
            self.config.encode_timeout_secs,
        )
        .await
        .map_err(|e| {
            logger.log_error(JobStage::Encoding, &e.to_string());
            RenderError::Encode(e)
        })?;

        move_into_place(&final_path, output_path)?;
        logger.log_completion(&format!(
            "Rendered {:.2}s video to {}",
            total_secs,
            output_path.display()
        ));

        Ok(output_path.to_path_buf())
    }
}

/// Move the finished file out of the job temp dir. Rename first; falls
/// back to copy+delete when the output lives on another filesystem.
fn move_into_place(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)?;
            info!(output = %to.display(), "Moved output across filesystems");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_into_place_renames() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        std::fs::write(&src, b"data").unwrap();
        let dst = dir.path().join("out/b.mp4");

        move_into_place(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(std::fs::read(&dst).unwrap(), b"data");
    }

    #[test]
    fn test_render_future_is_spawnable() {
        // Concurrent callers serialize on the render lock via tokio::spawn,
        // which requires the render future to be Send.
        fn assert_send<T: Send>(_: T) {}

        let assembler = VideoAssembler::from_config(RenderConfig::default());
        let script = Script::new("hook", "narration", "cta", "topic");
        let target = RenderTarget::vertical_720();
        let output = PathBuf::from("/tmp/out.mp4");
        assert_send(assembler.render(&script, &target, &output));
    }

    #[test]
    fn test_assembler_builds_without_keys() {
        // With no API keys only the local tier remains; construction
        // must still succeed.
        let assembler = VideoAssembler::from_config(RenderConfig::default());
        assert_eq!(assembler.encoding.codec, "libx264");
    }
}
