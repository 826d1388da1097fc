// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deepgram speech backend (`/listen` and `/speak`).

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use inmobot_config::model::VoiceConfig;
use inmobot_core::types::{
    AdapterType, HealthStatus, SynthesizedAudio, VoiceInfo, VoiceParams,
};
use inmobot_core::{InmobotError, PluginAdapter, SpeechProvider};

use super::{SPEECH_TIMEOUT, pick_voice, read_audio, speech_error};

pub const DEEPGRAM_VOICES: &[VoiceInfo] = &[
    VoiceInfo {
        id: "aura-asteria-es",
        label: "Asteria (Español, Femenina)",
    },
    VoiceInfo {
        id: "aura-luna-es",
        label: "Luna (Español, Femenina)",
    },
    VoiceInfo {
        id: "aura-orion-es",
        label: "Orion (Español, Masculina)",
    },
    VoiceInfo {
        id: "aura-stella-en",
        label: "Stella (Inglés, Femenina)",
    },
    VoiceInfo {
        id: "aura-zeus-en",
        label: "Zeus (Inglés, Masculina)",
    },
];

#[derive(Debug, Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<ListenChannel>,
}

#[derive(Debug, Deserialize)]
struct ListenChannel {
    #[serde(default)]
    alternatives: Vec<ListenAlternative>,
}

#[derive(Debug, Deserialize)]
struct ListenAlternative {
    #[serde(default)]
    transcript: String,
}

/// Deepgram transcription and synthesis.
#[derive(Debug, Clone)]
pub struct DeepgramSpeech {
    client: reqwest::Client,
    base_url: String,
    stt_model: String,
    tts_model: String,
    language: String,
}

impl DeepgramSpeech {
    pub fn new(api_key: &str, config: &VoiceConfig) -> Result<Self, InmobotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Token {api_key}")).map_err(|e| {
                InmobotError::Config(format!("invalid Deepgram API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(SPEECH_TIMEOUT)
            .build()
            .map_err(|e| speech_error("failed to build Deepgram HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.deepgram_base_url.trim_end_matches('/').to_string(),
            stt_model: config.deepgram_stt_model.clone(),
            tts_model: config.deepgram_tts_model.clone(),
            language: config.language.clone(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, InmobotError> {
        Url::parse_with_params(&format!("{}/{path}", self.base_url), params)
            .map_err(|e| InmobotError::Config(format!("invalid Deepgram base URL: {e}")))
    }
}

#[async_trait]
impl PluginAdapter for DeepgramSpeech {
    fn name(&self) -> &str {
        "deepgram"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechProvider for DeepgramSpeech {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, InmobotError> {
        let url = self.endpoint(
            "listen",
            &[
                ("model", self.stt_model.as_str()),
                ("language", self.language.as_str()),
                ("smart_format", "true"),
                ("punctuate", "true"),
            ],
        )?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, mime_type)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| speech_error("Deepgram request failed", e))?;

        let status = response.status();
        debug!(status = %status, bytes = audio.len(), "deepgram transcription response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InmobotError::Speech {
                message: format!("Deepgram returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: ListenResponse = response
            .json()
            .await
            .map_err(|e| speech_error("failed to parse Deepgram transcription", e))?;

        Ok(parsed
            .results
            .channels
            .into_iter()
            .next()
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|a| a.transcript.trim().to_string())
            .unwrap_or_default())
    }

    async fn synthesize(
        &self,
        text: &str,
        params: &VoiceParams,
    ) -> Result<SynthesizedAudio, InmobotError> {
        let model = pick_voice(params, self.voices(), &self.tts_model);
        let url = self.endpoint("speak", &[("model", model), ("encoding", "mp3")])?;

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| speech_error("Deepgram request failed", e))?;

        read_audio("Deepgram", response).await
    }

    fn voices(&self) -> &'static [VoiceInfo] {
        DEEPGRAM_VOICES
    }
}
