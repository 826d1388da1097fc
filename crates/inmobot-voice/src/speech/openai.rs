// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI speech backend (`/audio/transcriptions` and `/audio/speech`).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::debug;

use inmobot_config::model::VoiceConfig;
use inmobot_core::types::{
    AdapterType, HealthStatus, SynthesizedAudio, VoiceInfo, VoiceParams,
};
use inmobot_core::{InmobotError, PluginAdapter, SpeechProvider};

use super::{SPEECH_TIMEOUT, pick_voice, read_audio, speech_error};

pub const OPENAI_VOICES: &[VoiceInfo] = &[
    VoiceInfo {
        id: "alloy",
        label: "Alloy (Neutral)",
    },
    VoiceInfo {
        id: "echo",
        label: "Echo (Masculina)",
    },
    VoiceInfo {
        id: "fable",
        label: "Fable (Británica)",
    },
    VoiceInfo {
        id: "onyx",
        label: "Onyx (Masculina profunda)",
    },
    VoiceInfo {
        id: "nova",
        label: "Nova (Femenina cálida)",
    },
    VoiceInfo {
        id: "shimmer",
        label: "Shimmer (Femenina suave)",
    },
];

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    speed: f32,
    response_format: &'static str,
}

/// File extension the transcription endpoint expects for a MIME type.
fn file_extension(mime_type: &str) -> &'static str {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/flac" => "flac",
        _ => "webm",
    }
}

/// Whisper transcription and OpenAI text-to-speech.
#[derive(Debug, Clone)]
pub struct OpenAiSpeech {
    client: reqwest::Client,
    base_url: String,
    stt_model: String,
    tts_model: String,
    default_voice: String,
    language: String,
    speed: f32,
}

impl OpenAiSpeech {
    pub fn new(api_key: &str, base_url: &str, config: &VoiceConfig) -> Result<Self, InmobotError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                InmobotError::Config(format!("invalid OpenAI API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(SPEECH_TIMEOUT)
            .build()
            .map_err(|e| speech_error("failed to build OpenAI HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            stt_model: config.openai_stt_model.clone(),
            tts_model: config.openai_tts_model.clone(),
            default_voice: config.openai_voice.clone(),
            language: config.language.clone(),
            speed: config.speed,
        })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiSpeech {
    fn name(&self) -> &str {
        "openai-speech"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechProvider for OpenAiSpeech {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, InmobotError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(format!("audio.{}", file_extension(mime_type)))
            .mime_str(mime_type)
            .map_err(|e| speech_error("invalid audio MIME type", e))?;
        let form = Form::new()
            .part("file", part)
            .text("model", self.stt_model.clone())
            .text("language", self.language.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| speech_error("OpenAI transcription request failed", e))?;

        let status = response.status();
        debug!(status = %status, bytes = audio.len(), "openai transcription response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InmobotError::Speech {
                message: format!("OpenAI transcription returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| speech_error("failed to parse OpenAI transcription", e))?;
        Ok(parsed.text.trim().to_string())
    }

    async fn synthesize(
        &self,
        text: &str,
        params: &VoiceParams,
    ) -> Result<SynthesizedAudio, InmobotError> {
        let request = SpeechRequest {
            model: &self.tts_model,
            voice: pick_voice(params, self.voices(), &self.default_voice),
            input: text,
            speed: params.speed.unwrap_or(self.speed),
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| speech_error("OpenAI speech request failed", e))?;

        read_audio("OpenAI speech", response).await
    }

    fn voices(&self) -> &'static [VoiceInfo] {
        OPENAI_VOICES
    }
}
