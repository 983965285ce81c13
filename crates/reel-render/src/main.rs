//! Render pipeline binary.
//!
//! Usage: `reel-render <script.json> <output.mp4>`
//!
//! Reads a script from a JSON file, renders narrated vertical video
//! over acquired background footage, and writes the result.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_models::{RenderTarget, Script};
use reel_render::{RenderConfig, VideoAssembler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reel=info".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let (script_path, output_path) = match (args.next(), args.next()) {
        (Some(s), Some(o)) => (PathBuf::from(s), PathBuf::from(o)),
        _ => bail!("usage: reel-render <script.json> <output.mp4>"),
    };

    let script_json = std::fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read script file {}", script_path.display()))?;
    let script: Script =
        serde_json::from_str(&script_json).context("failed to parse script JSON")?;

    let config = RenderConfig::from_env();
    info!(work_dir = %config.work_dir.display(), "Starting render");

    let assembler = VideoAssembler::from_config(config);
    let target = RenderTarget::vertical_1080();

    match assembler.render(&script, &target, &output_path).await {
        Ok(path) => {
            info!(output = %path.display(), "Render complete");
            Ok(())
        }
        Err(e) => {
            error!("Render failed: {}", e);
            Err(e.into())
        }
    }
}
