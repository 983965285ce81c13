//! AI text-to-video provider client.
//!
//! Generator-style flow: submit a prompt, poll the job status endpoint
//! with a fixed sleep between bounded attempts, then download the result.
//! Highest quality in the fallback chain, also the slowest and most
//! rate-limited, so it is tried first and abandoned quickly on failure.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use reel_models::{ClipSegment, SourceProvider};

use crate::download::{download_to_file, MIN_CLIP_BYTES};
use crate::error::{ProviderError, ProviderResult};
use crate::prompt::build_visual_prompt;
use crate::source::ContentSource;

const PROVIDER: &str = "ai_video";

/// Maximum generation length a single request may ask for, in seconds.
const MAX_GENERATION_SECS: u64 = 10;

/// Configuration for the AI video generator client.
#[derive(Debug, Clone)]
pub struct AiVideoConfig {
    /// API base URL.
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Timeout for the generate and status calls.
    pub request_timeout: Duration,
    /// Timeout for the result download.
    pub download_timeout: Duration,
    /// Sleep between status polls.
    pub poll_interval: Duration,
    /// Maximum status polls before the job is treated as failed.
    pub max_poll_attempts: u32,
}

impl Default for AiVideoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.klingai.com".to_string(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(15),
            download_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(3),
            max_poll_attempts: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    duration: u64,
    aspect_ratio: &'a str,
    mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: Option<String>,
    video_url: Option<String>,
}

/// Client for a generate-then-poll text-to-video API.
pub struct AiVideoSource {
    http: Client,
    config: AiVideoConfig,
}

impl AiVideoSource {
    /// Create a new client. Returns `None` when no API key is configured,
    /// so the acquirer simply skips this tier.
    pub fn new(config: AiVideoConfig) -> Option<Self> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            http: Client::new(),
            config,
        })
    }

    /// Submit a generation job, returning its task id.
    async fn submit(&self, prompt: &str, duration_hint: f64) -> ProviderResult<String> {
        let url = format!("{}/v1/videos/text2video", self.config.base_url);
        let request = GenerateRequest {
            prompt,
            duration: (duration_hint.ceil() as u64).clamp(1, MAX_GENERATION_SECS),
            aspect_ratio: "9:16",
            mode: "standard",
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::unavailable(
                PROVIDER,
                format!("generate returned HTTP {}", response.status()),
            ));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

        body.task_id
            .ok_or_else(|| ProviderError::malformed(PROVIDER, "missing task_id"))
    }

    /// Poll the status endpoint until a terminal state or the attempt cap.
    async fn poll_until_ready(&self, task_id: &str) -> ProviderResult<String> {
        let url = format!("{}/v1/videos/{}", self.config.base_url, task_id);

        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(self.config.poll_interval).await;

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .timeout(self.config.request_timeout)
                .send()
                .await?;

            if !response.status().is_success() {
                // Transient status-endpoint hiccup; keep polling.
                debug!(
                    attempt,
                    status = %response.status(),
                    "Generation status call failed, retrying"
                );
                continue;
            }

            let body: StatusResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::malformed(PROVIDER, e.to_string()))?;

            match body.status.as_deref() {
                Some("succeeded") => {
                    return body.video_url.ok_or_else(|| {
                        ProviderError::malformed(PROVIDER, "succeeded without video_url")
                    });
                }
                Some("failed") => {
                    return Err(ProviderError::GenerationFailed { provider: PROVIDER })
                }
                other => {
                    debug!(attempt, status = ?other, "Generation still running");
                }
            }
        }

        Err(ProviderError::GenerationTimedOut {
            provider: PROVIDER,
            attempts: self.config.max_poll_attempts,
        })
    }
}

#[async_trait]
impl ContentSource for AiVideoSource {
    fn provider(&self) -> SourceProvider {
        SourceProvider::AiVideo
    }

    async fn fetch_clips(
        &self,
        query: &str,
        _max_results: usize,
        target_duration_hint: f64,
        work_dir: &Path,
    ) -> ProviderResult<Vec<ClipSegment>> {
        let prompt = build_visual_prompt(query, query);
        info!(prompt = %prompt, "Submitting AI video generation");

        let task_id = self.submit(&prompt, target_duration_hint).await?;
        let video_url = self.poll_until_ready(&task_id).await?;

        let dest = work_dir.join("ai_video_000.mp4");
        match download_to_file(
            &self.http,
            &video_url,
            &dest,
            self.config.download_timeout,
            MIN_CLIP_BYTES,
        )
        .await
        {
            Ok(_) => Ok(vec![ClipSegment::unprobed(SourceProvider::AiVideo, dest)]),
            Err(e) => {
                warn!(error = %e, "AI video download failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> AiVideoConfig {
        AiVideoConfig {
            base_url,
            api_key: "test-key".to_string(),
            poll_interval: Duration::from_millis(5),
            max_poll_attempts: 3,
            ..AiVideoConfig::default()
        }
    }

    #[test]
    fn test_missing_key_disables_source() {
        assert!(AiVideoSource::new(AiVideoConfig::default()).is_none());
    }

    #[tokio::test]
    async fn test_generation_and_download() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/videos/text2video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "succeeded",
                "video_url": format!("{}/result.mp4", server.uri()),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/result.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 20_000]))
            .mount(&server)
            .await;

        let source = AiVideoSource::new(test_config(server.uri())).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let clips = source
            .fetch_clips("ai tools", 1, 4.0, dir.path())
            .await
            .unwrap();

        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].provider, SourceProvider::AiVideo);
        assert!(clips[0].path.exists());
    }

    #[tokio::test]
    async fn test_failed_generation_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/videos/text2video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t2"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/t2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
            .mount(&server)
            .await;

        let source = AiVideoSource::new(test_config(server.uri())).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = source
            .fetch_clips("ai tools", 1, 4.0, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::GenerationFailed { .. }));
    }

    #[tokio::test]
    async fn test_polling_is_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/videos/text2video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"task_id": "t3"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/videos/t3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})),
            )
            .mount(&server)
            .await;

        let source = AiVideoSource::new(test_config(server.uri())).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = source
            .fetch_clips("ai tools", 1, 4.0, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::GenerationTimedOut { attempts: 3, .. }
        ));
    }
}
