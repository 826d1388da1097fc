// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for InmoBot.
//!
//! [`AgentService`] is the entry point channels talk to. It owns the
//! per-session histories, resolves the channel profile, runs the
//! [`Orchestrator`] and, for voice, wraps the exchange with transcription,
//! normalization and synthesis.

pub mod orchestrator;
pub mod profile;
pub mod prompt;
pub mod session;

use std::sync::Arc;

use inmobot_config::InmobotConfig;
use inmobot_core::types::VoiceParams;
use inmobot_core::{
    CatalogStore, Channel, CompletionProvider, LeadDataDelta, LeadIdentity, LeadStore,
    SpeechProvider,
};
use inmobot_leads::{LeadManager, ScoringPolicy};
use inmobot_tools::ToolDispatcher;
use inmobot_voice::VoiceNormalizer;
use tracing::{debug, info, warn};

pub use orchestrator::{Exchange, Orchestrator};
pub use profile::{ChannelProfile, ChannelProfiles};
pub use session::{SessionStore, telegram_identity, trim_history, voice_identity, web_identity};

/// Spoken when the caller's audio could not be understood.
pub const REPEAT_PROMPT: &str = "Disculpa, no pude escucharte bien. ¿Podrías repetirlo, por favor?";

/// The adapters an [`AgentService`] is assembled from.
pub struct AgentParts {
    /// `None` when no completion key is configured.
    pub provider: Option<Arc<dyn CompletionProvider>>,
    pub catalog: Arc<dyn CatalogStore>,
    pub lead_store: Arc<dyn LeadStore>,
    /// `None` disables the voice pipeline.
    pub speech: Option<Arc<dyn SpeechProvider>>,
}

/// Reply to a text message.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    /// The session the message was recorded under.
    pub session_id: String,
    pub reply: String,
    pub delta: LeadDataDelta,
    pub degraded: bool,
}

/// Reply to a voice message.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceReply {
    /// What the caller said; empty when nothing was understood.
    pub transcript: String,
    /// The normalized text that was (or would have been) spoken.
    pub text: String,
    /// Synthesized audio, absent when synthesis failed.
    pub audio: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub delta: LeadDataDelta,
}

/// Handles messages for every channel.
pub struct AgentService {
    orchestrator: Orchestrator,
    profiles: ChannelProfiles,
    sessions: SessionStore,
    leads: Arc<LeadManager>,
    speech: Option<Arc<dyn SpeechProvider>>,
    normalizer: VoiceNormalizer,
    voice_params: VoiceParams,
}

impl AgentService {
    pub async fn new(config: &InmobotConfig, parts: AgentParts) -> Self {
        let leads = Arc::new(LeadManager::new(
            parts.lead_store,
            ScoringPolicy::new(config.scoring.clone()),
        ));
        let tools = Arc::new(ToolDispatcher::new(parts.catalog, leads.clone()));
        let orchestrator = Orchestrator::new(
            parts.provider,
            tools,
            config.agent.fallback_reply.clone(),
            config.agent.unavailable_reply.clone(),
        );

        info!(
            agent = config.agent.name,
            completion = orchestrator.has_provider(),
            speech = parts.speech.is_some(),
            "agent service ready"
        );

        Self {
            orchestrator,
            profiles: ChannelProfiles::load(config).await,
            sessions: SessionStore::new(config.agent.max_history_turns),
            leads,
            speech: parts.speech,
            normalizer: VoiceNormalizer::new(config.voice.max_spoken_chars),
            voice_params: VoiceParams {
                voice: None,
                speed: Some(config.voice.speed),
            },
        }
    }

    /// Answers one text message.
    ///
    /// An identity without a session id gets a fresh one, returned in the
    /// reply so the caller can continue the conversation.
    pub async fn handle_message(
        &self,
        channel: Channel,
        identity: &LeadIdentity,
        message: &str,
    ) -> TurnReply {
        let identity = match &identity.session_id {
            Some(_) => identity.clone(),
            None => LeadIdentity {
                session_id: Some(uuid::Uuid::new_v4().to_string()),
                ..identity.clone()
            },
        };
        let session_id = identity.session_id.clone().unwrap_or_default();

        let history = self.sessions.history(channel, &session_id);
        let mut history = history.lock().await;
        debug!(%channel, session_id, turns = history.len(), "handling message");

        let exchange = self
            .orchestrator
            .converse(message, &history, self.profiles.get(channel), &identity)
            .await;

        *history = exchange.history;
        self.sessions.trim(&mut history);

        TurnReply {
            session_id,
            reply: exchange.reply,
            delta: exchange.delta,
            degraded: exchange.degraded,
        }
    }

    /// Answers one voice message: transcribe, converse, normalize, speak.
    pub async fn handle_voice(
        &self,
        identity: &LeadIdentity,
        audio: &[u8],
        mime_type: &str,
    ) -> VoiceReply {
        let Some(speech) = &self.speech else {
            warn!("voice message received but no speech backend is configured");
            return text_only(
                String::new(),
                self.spoken(REPEAT_PROMPT),
                LeadDataDelta::default(),
            );
        };

        let transcript = match speech.transcribe(audio, mime_type).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, "transcription failed");
                String::new()
            }
        };

        let (text, delta) = if transcript.is_empty() {
            (self.spoken(REPEAT_PROMPT), LeadDataDelta::default())
        } else {
            info!(chars = transcript.len(), "caller transcribed");
            let turn = self
                .handle_message(Channel::Voice, identity, &transcript)
                .await;
            (self.spoken(&turn.reply), turn.delta)
        };

        match speech.synthesize(&text, &self.voice_params).await {
            Ok(audio) => VoiceReply {
                transcript,
                text,
                audio: Some(audio.data),
                content_type: Some(audio.content_type),
                delta,
            },
            Err(e) => {
                warn!(error = %e, "synthesis failed, replying without audio");
                text_only(transcript, text, delta)
            }
        }
    }

    /// `text` as it would be spoken on a call.
    pub fn spoken(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    pub fn leads(&self) -> &Arc<LeadManager> {
        &self.leads
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn profile(&self, channel: Channel) -> &ChannelProfile {
        self.profiles.get(channel)
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn speech(&self) -> Option<&Arc<dyn SpeechProvider>> {
        self.speech.as_ref()
    }
}

fn text_only(transcript: String, text: String, delta: LeadDataDelta) -> VoiceReply {
    VoiceReply {
        transcript,
        text,
        audio: None,
        content_type: None,
        delta,
    }
}
