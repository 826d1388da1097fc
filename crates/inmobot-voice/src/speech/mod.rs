// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech backends and the ordered fallback chain over them.

pub mod deepgram;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use inmobot_config::model::InmobotConfig;
use inmobot_core::types::{
    AdapterType, HealthStatus, SynthesizedAudio, VoiceInfo, VoiceParams,
};
use inmobot_core::{InmobotError, PluginAdapter, SpeechProvider};

pub use deepgram::DeepgramSpeech;
pub use openai::OpenAiSpeech;

pub(crate) const SPEECH_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn speech_error(
    message: &str,
    err: impl std::error::Error + Send + Sync + 'static,
) -> InmobotError {
    InmobotError::Speech {
        message: format!("{message}: {err}"),
        source: Some(Box::new(err)),
    }
}

/// The requested voice when the backend offers it, else the backend default.
pub(crate) fn pick_voice<'a>(
    params: &'a VoiceParams,
    voices: &[VoiceInfo],
    default: &'a str,
) -> &'a str {
    params
        .voice
        .as_deref()
        .filter(|v| voices.iter().any(|info| info.id == *v))
        .unwrap_or(default)
}

/// Reads a synthesis response body as MP3 audio.
pub(crate) async fn read_audio(
    backend: &str,
    response: reqwest::Response,
) -> Result<SynthesizedAudio, InmobotError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InmobotError::Speech {
            message: format!("{backend} returned {status}: {body}"),
            source: None,
        });
    }

    let data = response
        .bytes()
        .await
        .map_err(|e| speech_error("failed to read synthesized audio", e))?;
    if data.is_empty() {
        return Err(InmobotError::Speech {
            message: format!("{backend} returned empty audio"),
            source: None,
        });
    }

    Ok(SynthesizedAudio {
        data: data.to_vec(),
        content_type: "audio/mpeg".to_string(),
    })
}

/// A configured key, or the environment variable when the key is absent or blank.
fn resolve_key(configured: &Option<String>, env_var: &str) -> Option<String> {
    configured
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()))
}

/// Tries each speech backend in order until one succeeds.
pub struct SpeechFallback {
    backends: Vec<Arc<dyn SpeechProvider>>,
}

impl SpeechFallback {
    pub fn new(backends: Vec<Arc<dyn SpeechProvider>>) -> Self {
        Self { backends }
    }

    /// Builds the chain from configuration, preferred backend first.
    ///
    /// Backends without an API key are left out; an empty chain answers
    /// every request with [`InmobotError::Unavailable`].
    pub fn from_config(config: &InmobotConfig) -> Result<Self, InmobotError> {
        let deepgram_key = resolve_key(&config.voice.deepgram_api_key, "DEEPGRAM_API_KEY");
        let openai_key = resolve_key(&config.openai.api_key, "OPENAI_API_KEY");
        Self::with_keys(config, deepgram_key.as_deref(), openai_key.as_deref())
    }

    fn with_keys(
        config: &InmobotConfig,
        deepgram_key: Option<&str>,
        openai_key: Option<&str>,
    ) -> Result<Self, InmobotError> {
        let voice = &config.voice;
        let mut deepgram: Option<Arc<dyn SpeechProvider>> = None;
        if let Some(key) = deepgram_key {
            deepgram = Some(Arc::new(DeepgramSpeech::new(key, voice)?));
        }
        let mut openai: Option<Arc<dyn SpeechProvider>> = None;
        if let Some(key) = openai_key {
            openai = Some(Arc::new(OpenAiSpeech::new(
                key,
                &config.openai.base_url,
                voice,
            )?));
        }

        let ordered = if voice.provider.eq_ignore_ascii_case("openai") {
            [openai, deepgram]
        } else {
            [deepgram, openai]
        };
        let backends: Vec<_> = ordered.into_iter().flatten().collect();
        info!(
            backends = ?backends.iter().map(|b| b.name().to_string()).collect::<Vec<_>>(),
            "speech backends configured"
        );
        Ok(Self::new(backends))
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    fn no_backends() -> InmobotError {
        InmobotError::Unavailable("no speech backend configured".into())
    }
}

#[async_trait]
impl PluginAdapter for SpeechFallback {
    fn name(&self) -> &str {
        "speech"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(match self.backends.len() {
            0 => HealthStatus::Unhealthy("no speech backend configured".into()),
            1 => HealthStatus::Degraded(format!(
                "only {} is configured, no fallback",
                self.backends[0].name()
            )),
            _ => HealthStatus::Healthy,
        })
    }
}

#[async_trait]
impl SpeechProvider for SpeechFallback {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, InmobotError> {
        let mut last_error = None;
        for backend in &self.backends {
            match backend.transcribe(audio, mime_type).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "transcription failed, trying next backend");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(Self::no_backends))
    }

    async fn synthesize(
        &self,
        text: &str,
        params: &VoiceParams,
    ) -> Result<SynthesizedAudio, InmobotError> {
        let mut last_error = None;
        for backend in &self.backends {
            match backend.synthesize(text, params).await {
                Ok(audio) => return Ok(audio),
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "synthesis failed, trying next backend");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(Self::no_backends))
    }

    fn voices(&self) -> &'static [VoiceInfo] {
        self.backends.first().map(|b| b.voices()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, provider: &str) -> InmobotConfig {
        let mut config = InmobotConfig::default();
        config.voice.provider = provider.to_string();
        config.voice.deepgram_base_url = format!("{}/dg", server.uri());
        config.openai.base_url = format!("{}/oa", server.uri());
        config
    }

    #[test]
    fn pick_voice_falls_back_to_default() {
        let params = VoiceParams {
            voice: Some("nova".into()),
            speed: None,
        };
        assert_eq!(pick_voice(&params, openai::OPENAI_VOICES, "alloy"), "nova");
        assert_eq!(
            pick_voice(&params, deepgram::DEEPGRAM_VOICES, "aura-asteria-es"),
            "aura-asteria-es"
        );
        assert_eq!(pick_voice(&VoiceParams::default(), &[], "x"), "x");
    }

    #[test]
    fn configured_key_wins_over_blank() {
        assert_eq!(
            resolve_key(&Some(" dg-key ".into()), "INMOBOT_TEST_UNSET_KEY"),
            Some("dg-key".to_string())
        );
        assert_eq!(resolve_key(&Some("  ".into()), "INMOBOT_TEST_UNSET_KEY"), None);
        assert_eq!(resolve_key(&None, "INMOBOT_TEST_UNSET_KEY"), None);
    }

    #[test]
    fn provider_preference_orders_backends() {
        let config = InmobotConfig::default();
        let chain = SpeechFallback::with_keys(&config, Some("dg"), Some("sk")).unwrap();
        assert_eq!(chain.backend_names(), vec!["deepgram", "openai-speech"]);

        let mut config = InmobotConfig::default();
        config.voice.provider = "openai".into();
        let chain = SpeechFallback::with_keys(&config, Some("dg"), Some("sk")).unwrap();
        assert_eq!(chain.backend_names(), vec!["openai-speech", "deepgram"]);

        let chain = SpeechFallback::with_keys(&config, None, Some("sk")).unwrap();
        assert_eq!(chain.backend_names(), vec!["openai-speech"]);
    }

    #[tokio::test]
    async fn empty_chain_is_unavailable() {
        let chain = SpeechFallback::new(Vec::new());
        assert!(chain.is_empty());
        assert!(chain.voices().is_empty());
        let err = chain.transcribe(b"x", "audio/webm").await.unwrap_err();
        assert!(matches!(err, InmobotError::Unavailable(_)));
        assert!(matches!(
            chain.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn falls_back_to_second_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dg/listen"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oa/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "hola" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let chain =
            SpeechFallback::with_keys(&config_for(&server, "deepgram"), Some("dg"), Some("sk"))
                .unwrap();
        let text = chain.transcribe(b"audio", "audio/webm").await.unwrap();
        assert_eq!(text, "hola");
    }

    #[tokio::test]
    async fn all_backends_failing_returns_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let chain =
            SpeechFallback::with_keys(&config_for(&server, "openai"), Some("dg"), Some("sk"))
                .unwrap();
        let err = chain
            .synthesize("Hola.", &VoiceParams::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Deepgram"), "got: {err}");
    }
}
