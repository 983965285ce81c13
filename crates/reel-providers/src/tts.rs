//! Narration synthesis with a two-tier provider fallback.
//!
//! The primary is a neural TTS API tried with a small bounded retry that
//! rotates across voice presets. On exhaustion the synthesizer falls back
//! unconditionally to a basic always-available endpoint. This is the only
//! pipeline step allowed to fail a whole render job: with no audio there
//! is no duration and nothing downstream can proceed.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use reel_media::probe::get_duration;
use reel_models::AudioTrack;

/// Minimum byte size for a synthesized audio file to be considered valid.
const MIN_AUDIO_BYTES: u64 = 1_000;

/// Errors from narration synthesis.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Both providers exhausted. Fatal to the render job.
    #[error("all narration providers exhausted: {0}")]
    Exhausted(String),

    #[error("synthesized audio could not be measured: {0}")]
    Probe(#[from] reel_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration for the primary neural TTS provider.
#[derive(Debug, Clone)]
pub struct NeuralTtsConfig {
    /// API base URL.
    pub base_url: String,
    /// API key sent in the `xi-api-key` header.
    pub api_key: String,
    /// Voice presets rotated across retry attempts.
    pub voice_ids: Vec<String>,
    /// Attempts before falling back (one per voice rotation step).
    pub max_attempts: u32,
    /// Timeout per attempt.
    pub request_timeout: Duration,
}

impl Default for NeuralTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            voice_ids: vec![
                "21m00Tcm4TlvDq8ikWAM".to_string(),
                "AZnzlk1XvdvUeBnXmlld".to_string(),
                "EXAVITQu4vr4xnSDxMaL".to_string(),
            ],
            max_attempts: 3,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Configuration for the always-available fallback TTS provider.
#[derive(Debug, Clone)]
pub struct FallbackTtsConfig {
    /// Base URL of the basic TTS endpoint.
    pub base_url: String,
    /// Timeout for the single fallback call.
    pub request_timeout: Duration,
}

impl Default for FallbackTtsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Two-tier narration synthesizer.
pub struct NarrationSynthesizer {
    http: Client,
    primary: Option<NeuralTtsConfig>,
    fallback: FallbackTtsConfig,
}

impl NarrationSynthesizer {
    /// Create a synthesizer. `primary` is skipped entirely when it has no
    /// API key configured.
    pub fn new(primary: Option<NeuralTtsConfig>, fallback: FallbackTtsConfig) -> Self {
        let primary = primary.filter(|p| !p.api_key.trim().is_empty());
        Self {
            http: Client::new(),
            primary,
            fallback,
        }
    }

    /// Synthesize narration audio for `text`, writing it to `output`, and
    /// measure its duration. The measured duration becomes authoritative
    /// for the rest of the render job.
    pub async fn synthesize(
        &self,
        text: &str,
        output: impl AsRef<Path>,
    ) -> Result<AudioTrack, TtsError> {
        let output = output.as_ref();
        self.fetch_audio(text, output).await?;

        let duration_secs = get_duration(output).await?;
        info!(duration_secs, "Narration synthesized");

        Ok(AudioTrack {
            path: output.to_path_buf(),
            duration_secs,
        })
    }

    /// Write synthesized audio bytes to `output`, trying primary voices
    /// then the fallback endpoint.
    pub async fn fetch_audio(&self, text: &str, output: &Path) -> Result<(), TtsError> {
        let mut primary_failure = String::from("primary not configured");

        if let Some(primary) = &self.primary {
            for attempt in 0..primary.max_attempts {
                let voice = &primary.voice_ids[attempt as usize % primary.voice_ids.len()];
                match self.try_neural(primary, voice, text, output).await {
                    Ok(()) => return Ok(()),
                    Err(message) => {
                        warn!(
                            attempt = attempt + 1,
                            voice = %voice,
                            error = %message,
                            "Neural TTS attempt failed"
                        );
                        primary_failure = message;
                    }
                }
            }
            warn!("Neural TTS exhausted, falling back to basic provider");
        }

        match self.try_fallback(text, output).await {
            Ok(()) => Ok(()),
            Err(fallback_failure) => Err(TtsError::Exhausted(format!(
                "primary: {}; fallback: {}",
                primary_failure, fallback_failure
            ))),
        }
    }

    async fn try_neural(
        &self,
        config: &NeuralTtsConfig,
        voice_id: &str,
        text: &str,
        output: &Path,
    ) -> Result<(), String> {
        let url = format!("{}/v1/text-to-speech/{}", config.base_url, voice_id);
        let body = json!({
            "text": text,
            "model_id": "eleven_monolingual_v1",
            "voice_settings": {"stability": 0.5, "similarity_boost": 0.5},
        });

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", &config.api_key)
            .json(&body)
            .timeout(config.request_timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        write_audio(output, &bytes).await
    }

    async fn try_fallback(&self, text: &str, output: &Path) -> Result<(), String> {
        let url = format!(
            "{}/api/tts?text={}&lang=en",
            self.fallback.base_url,
            urlencoding::encode(text)
        );

        let response = self
            .http
            .get(&url)
            .timeout(self.fallback.request_timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;
        write_audio(output, &bytes).await
    }
}

async fn write_audio(output: &Path, bytes: &[u8]) -> Result<(), String> {
    if (bytes.len() as u64) < MIN_AUDIO_BYTES {
        return Err(format!("audio response too small: {} bytes", bytes.len()));
    }
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }
    tokio::fs::write(output, bytes)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn neural(base_url: String) -> NeuralTtsConfig {
        NeuralTtsConfig {
            base_url,
            api_key: "key".to_string(),
            ..NeuralTtsConfig::default()
        }
    }

    fn fallback(base_url: String) -> FallbackTtsConfig {
        FallbackTtsConfig {
            base_url,
            ..FallbackTtsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
            .and(header("xi-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 5_000]))
            .expect(1)
            .mount(&server)
            .await;

        let synth =
            NarrationSynthesizer::new(Some(neural(server.uri())), fallback(server.uri()));
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("voice.mp3");
        synth.fetch_audio("hello world", &out).await.unwrap();
        assert_eq!(std::fs::metadata(&out).unwrap().len(), 5_000);
    }

    #[tokio::test]
    async fn test_primary_exhaustion_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1/text-to-speech/.*"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4_000]))
            .expect(1)
            .mount(&server)
            .await;

        let synth =
            NarrationSynthesizer::new(Some(neural(server.uri())), fallback(server.uri()));
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("voice.mp3");
        synth.fetch_audio("hello world", &out).await.unwrap();
        assert_eq!(std::fs::metadata(&out).unwrap().len(), 4_000);
    }

    #[tokio::test]
    async fn test_both_tiers_failing_is_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let synth =
            NarrationSynthesizer::new(Some(neural(server.uri())), fallback(server.uri()));
        let dir = tempfile::tempdir().unwrap();
        let err = synth
            .fetch_audio("hello", &dir.path().join("voice.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::Exhausted(_)));
    }

    #[tokio::test]
    async fn test_tiny_primary_response_treated_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1/text-to-speech/.*"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 10]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4_000]))
            .mount(&server)
            .await;

        let synth =
            NarrationSynthesizer::new(Some(neural(server.uri())), fallback(server.uri()));
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("voice.mp3");
        synth.fetch_audio("hello", &out).await.unwrap();
        // The undersized primary response was rejected; fallback bytes won.
        assert_eq!(std::fs::metadata(&out).unwrap().len(), 4_000);
    }

    #[tokio::test]
    async fn test_unconfigured_primary_goes_straight_to_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4_000]))
            .expect(1)
            .mount(&server)
            .await;

        let synth = NarrationSynthesizer::new(None, fallback(server.uri()));
        let dir = tempfile::tempdir().unwrap();
        synth
            .fetch_audio("hello", &dir.path().join("voice.mp3"))
            .await
            .unwrap();
    }
}
