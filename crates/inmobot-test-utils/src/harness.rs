// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete [`AgentService`] with a scripted
//! completion provider, the fixture catalog, an in-memory or JSON-file
//! lead store and an optional mock speech backend.

use std::sync::Arc;

use inmobot_agent::{AgentParts, AgentService, TurnReply, VoiceReply};
use inmobot_config::InmobotConfig;
use inmobot_core::{Channel, CompletionProvider, InmobotError, Lead, LeadIdentity, LeadStore};
use inmobot_storage::{JsonLeadStore, MemoryLeadStore, StaticCatalog};

use crate::fixtures::{MockSpeech, fixture_catalog};
use crate::mock_provider::MockCompletionProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    texts: Vec<String>,
    config: InmobotConfig,
    speech: Option<MockSpeech>,
    json_leads: bool,
    no_provider: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            texts: Vec::new(),
            config: InmobotConfig::default(),
            speech: None,
            json_leads: false,
            no_provider: false,
        }
    }

    /// Set plain-text provider replies. More can be scripted through
    /// [`TestHarness::provider`] after building.
    pub fn with_mock_responses<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts = texts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config(mut self, config: InmobotConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the same system prompt on every channel.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        for channel in Channel::ALL {
            let settings = match channel {
                Channel::Web => &mut self.config.channels.web,
                Channel::Telegram => &mut self.config.channels.telegram,
                Channel::Voice => &mut self.config.channels.voice,
            };
            settings.system_prompt = Some(prompt.to_string());
        }
        self
    }

    pub fn with_speech(mut self, speech: MockSpeech) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Persist leads to a JSON file in the harness temp dir.
    pub fn with_json_leads(mut self) -> Self {
        self.json_leads = true;
        self
    }

    /// Build without a completion provider, as when no key is configured.
    pub fn without_provider(mut self) -> Self {
        self.no_provider = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, InmobotError> {
        let temp_dir = tempfile::TempDir::new().map_err(InmobotError::storage)?;

        let provider = Arc::new(MockCompletionProvider::with_texts(self.texts));
        let memory_leads = MemoryLeadStore::new();
        let lead_store: Arc<dyn LeadStore> = if self.json_leads {
            Arc::new(JsonLeadStore::new(temp_dir.path().join("leads.json")))
        } else {
            Arc::new(memory_leads.clone())
        };
        let speech = self.speech.map(Arc::new);

        let parts = AgentParts {
            provider: (!self.no_provider)
                .then(|| provider.clone() as Arc<dyn CompletionProvider>),
            catalog: Arc::new(StaticCatalog::new(fixture_catalog())),
            lead_store: lead_store.clone(),
            speech: speech.clone().map(|s| s as Arc<dyn inmobot_core::SpeechProvider>),
        };
        let service = AgentService::new(&self.config, parts).await;

        Ok(TestHarness {
            service,
            provider,
            lead_store,
            speech,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around one [`AgentService`].
pub struct TestHarness {
    /// The service under test.
    pub service: AgentService,
    /// The scripted completion provider.
    pub provider: Arc<MockCompletionProvider>,
    /// The lead store behind the service's lead manager.
    pub lead_store: Arc<dyn LeadStore>,
    /// The mock speech backend, when configured.
    pub speech: Option<Arc<MockSpeech>>,
    pub config: InmobotConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a web message under `session_id`.
    pub async fn send_message(&self, session_id: &str, text: &str) -> TurnReply {
        self.send_on(Channel::Web, &LeadIdentity::session(session_id), text)
            .await
    }

    pub async fn send_on(&self, channel: Channel, identity: &LeadIdentity, text: &str) -> TurnReply {
        self.service.handle_message(channel, identity, text).await
    }

    pub async fn send_voice(&self, call_id: &str, audio: &[u8]) -> VoiceReply {
        self.service
            .handle_voice(&LeadIdentity::session(call_id), audio, "audio/ogg")
            .await
    }

    /// Stored leads straight from the store; errors read as empty.
    pub async fn stored_leads(&self) -> Vec<Lead> {
        self.lead_store.load().await.unwrap_or_default()
    }
}
