// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures: a small Lima catalog, a lead store that always fails
//! and a scripted speech backend.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use inmobot_core::types::{
    AdapterType, HealthStatus, Objective, PropertyType, SynthesizedAudio, VoiceInfo, VoiceParams,
};
use inmobot_core::{InmobotError, Lead, LeadStore, PluginAdapter, Property, SpeechProvider};

fn property(
    id: &str,
    title: &str,
    zone: &str,
    property_type: PropertyType,
    price: u64,
    bedrooms: u32,
    objective: Objective,
) -> Property {
    Property {
        id: id.to_string(),
        title: title.to_string(),
        zone: zone.to_string(),
        property_type,
        price,
        bedrooms,
        bathrooms: bedrooms.saturating_sub(1).max(1),
        area: f64::from(bedrooms) * 40.0,
        description: format!("{title} en {zone}"),
        features: vec!["Cochera".to_string()],
        objective,
        price_type: (objective == Objective::Alquiler).then(|| "mensual".to_string()),
    }
}

/// Five properties across Miraflores, San Isidro, Surco and La Molina.
pub fn fixture_catalog() -> Vec<Property> {
    vec![
        property(
            "prop-001",
            "Costa del Sol",
            "Miraflores",
            PropertyType::Departamento,
            201_000,
            3,
            Objective::Venta,
        ),
        property(
            "prop-002",
            "Torre Pardo",
            "Miraflores",
            PropertyType::Departamento,
            320_000,
            2,
            Objective::Venta,
        ),
        property(
            "prop-003",
            "Parque Olivar",
            "San Isidro",
            PropertyType::Departamento,
            2_200,
            2,
            Objective::Alquiler,
        ),
        property(
            "prop-004",
            "Casa Los Álamos",
            "Surco",
            PropertyType::Casa,
            450_000,
            4,
            Objective::Venta,
        ),
        property(
            "prop-005",
            "Casa Camacho",
            "La Molina",
            PropertyType::Casa,
            380_000,
            3,
            Objective::Venta,
        ),
    ]
}

/// A lead store whose every operation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingLeadStore;

#[async_trait]
impl PluginAdapter for FailingLeadStore {
    fn name(&self) -> &str {
        "failing-leads"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LeadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Unhealthy("always fails".into()))
    }
}

#[async_trait]
impl LeadStore for FailingLeadStore {
    async fn load(&self) -> Result<Vec<Lead>, InmobotError> {
        Err(InmobotError::storage(std::io::Error::other("disk unavailable")))
    }

    async fn save(&self, _leads: &[Lead]) -> Result<(), InmobotError> {
        Err(InmobotError::storage(std::io::Error::other("disk unavailable")))
    }
}

static MOCK_VOICES: &[VoiceInfo] = &[VoiceInfo {
    id: "mock-voice",
    label: "Mock",
}];

/// Speech backend with scripted transcripts that records synthesized text.
///
/// An empty transcript queue yields an empty transcript.
pub struct MockSpeech {
    transcripts: Arc<Mutex<VecDeque<Result<String, InmobotError>>>>,
    spoken: Arc<Mutex<Vec<String>>>,
    fail_synthesis: bool,
}

impl MockSpeech {
    pub fn new() -> Self {
        Self {
            transcripts: Arc::new(Mutex::new(VecDeque::new())),
            spoken: Arc::new(Mutex::new(Vec::new())),
            fail_synthesis: false,
        }
    }

    pub fn with_transcripts<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = transcripts.into_iter().map(|t| Ok(t.into())).collect();
        Self {
            transcripts: Arc::new(Mutex::new(queue)),
            ..Self::new()
        }
    }

    /// Make every synthesis call fail.
    pub fn failing_synthesis(mut self) -> Self {
        self.fail_synthesis = true;
        self
    }

    pub async fn push_transcription_error(&self, error: InmobotError) {
        self.transcripts.lock().await.push_back(Err(error));
    }

    /// Text passed to `synthesize`, oldest first.
    pub async fn spoken(&self) -> Vec<String> {
        self.spoken.lock().await.clone()
    }
}

impl Default for MockSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockSpeech {
    fn name(&self) -> &str {
        "mock-speech"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Speech
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechProvider for MockSpeech {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str) -> Result<String, InmobotError> {
        self.transcripts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn synthesize(
        &self,
        text: &str,
        _params: &VoiceParams,
    ) -> Result<SynthesizedAudio, InmobotError> {
        self.spoken.lock().await.push(text.to_string());
        if self.fail_synthesis {
            return Err(InmobotError::Speech {
                message: "mock synthesis failure".into(),
                source: None,
            });
        }
        Ok(SynthesizedAudio {
            data: text.as_bytes().to_vec(),
            content_type: "audio/mpeg".to_string(),
        })
    }

    fn voices(&self) -> &'static [VoiceInfo] {
        MOCK_VOICES
    }
}
