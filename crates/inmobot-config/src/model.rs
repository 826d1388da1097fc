// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for InmoBot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use inmobot_core::Channel;
use serde::{Deserialize, Serialize};

/// Top-level InmoBot configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InmobotConfig {
    /// Assistant identity and conversation limits.
    #[serde(default)]
    pub agent: AgentConfig,

    /// OpenAI chat completion settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Catalog and lead file locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-channel conversation profiles.
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Lead scoring weights and temperature thresholds.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Speech backends and spoken-text limits.
    #[serde(default)]
    pub voice: VoiceConfig,
}

impl InmobotConfig {
    /// Profile settings for one channel.
    pub fn channel(&self, channel: Channel) -> &ChannelConfig {
        match channel {
            Channel::Web => &self.channels.web,
            Channel::Telegram => &self.channels.telegram,
            Channel::Voice => &self.channels.voice,
        }
    }
}

/// Assistant identity and conversation limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name the assistant introduces itself with.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reply sent when a completion call fails mid-turn.
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Reply sent when no completion provider is configured.
    #[serde(default = "default_unavailable_reply")]
    pub unavailable_reply: String,

    /// Session histories longer than this are trimmed from the front.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            fallback_reply: default_fallback_reply(),
            unavailable_reply: default_unavailable_reply(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

fn default_agent_name() -> String {
    "InmoBot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fallback_reply() -> String {
    "Lo siento, ocurrió un error al procesar tu mensaje. Por favor intenta de nuevo.".to_string()
}

fn default_unavailable_reply() -> String {
    "Lo siento, el servicio no está disponible en este momento. Por favor intenta más tarde."
        .to_string()
}

fn default_max_history_turns() -> usize {
    40
}

/// OpenAI chat completion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. Falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API base URL (override for proxies and tests).
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_timeout() -> u64 {
    60
}

/// Catalog and lead file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding the property catalog.
    #[serde(default = "default_properties_path")]
    pub properties_path: String,

    /// JSON file holding the lead collection.
    #[serde(default = "default_leads_path")]
    pub leads_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            properties_path: default_properties_path(),
            leads_path: default_leads_path(),
        }
    }
}

fn data_file(name: &str) -> String {
    dirs::data_dir()
        .map(|p| p.join("inmobot").join(name))
        .unwrap_or_else(|| std::path::PathBuf::from(name))
        .to_string_lossy()
        .into_owned()
}

fn default_properties_path() -> String {
    data_file("properties.json")
}

fn default_leads_path() -> String {
    data_file("leads.json")
}

/// The three channel profiles.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelsConfig {
    #[serde(default = "ChannelConfig::text")]
    pub web: ChannelConfig,

    #[serde(default = "ChannelConfig::text")]
    pub telegram: ChannelConfig,

    #[serde(default = "ChannelConfig::voice")]
    pub voice: ChannelConfig,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            web: ChannelConfig::text(),
            telegram: ChannelConfig::text(),
            voice: ChannelConfig::voice(),
        }
    }
}

/// Conversation profile for one channel.
///
/// Voice defaults trade verbosity for latency: a small token budget and a
/// lower sampling temperature.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Token budget for the first (tool-enabled) completion round.
    #[serde(default = "default_text_max_tokens")]
    pub max_tokens: u32,

    /// Token budget for the follow-up round after tools ran.
    #[serde(default = "default_text_followup_tokens")]
    pub followup_max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_text_temperature")]
    pub temperature: f32,

    /// Whether catalog listings use emoji markers.
    #[serde(default = "default_true")]
    pub emoji: bool,

    /// Persist captured lead data in the background instead of inline.
    #[serde(default)]
    pub defer_lead_persistence: bool,

    /// Inline system prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system prompt.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl ChannelConfig {
    /// Defaults for web chat and messaging channels.
    pub fn text() -> Self {
        Self {
            max_tokens: default_text_max_tokens(),
            followup_max_tokens: default_text_followup_tokens(),
            temperature: default_text_temperature(),
            emoji: true,
            defer_lead_persistence: false,
            system_prompt: None,
            system_prompt_file: None,
        }
    }

    /// Defaults for voice calls.
    pub fn voice() -> Self {
        Self {
            max_tokens: 120,
            followup_max_tokens: 100,
            temperature: 0.5,
            emoji: false,
            defer_lead_persistence: true,
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_text_max_tokens() -> u32 {
    800
}

fn default_text_followup_tokens() -> u32 {
    600
}

fn default_text_temperature() -> f32 {
    0.8
}

fn default_true() -> bool {
    true
}

/// Lead scoring weights and temperature thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    pub name_points: u32,
    pub phone_points: u32,
    pub email_points: u32,
    pub budget_points: u32,
    pub zone_points: u32,
    /// Awarded for a property type or a bedroom count.
    pub preference_points: u32,
    pub interested_property_points: u32,
    pub wants_visit_points: u32,
    pub engagement_points: u32,
    /// User turns needed for the engagement bonus.
    pub engagement_min_messages: usize,
    /// Highest score still classified cold.
    pub cold_max: u32,
    /// Highest score still classified warm.
    pub warm_max: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_points: 25,
            phone_points: 30,
            email_points: 15,
            budget_points: 10,
            zone_points: 5,
            preference_points: 5,
            interested_property_points: 10,
            wants_visit_points: 20,
            engagement_points: 10,
            engagement_min_messages: 3,
            cold_max: 30,
            warm_max: 60,
        }
    }
}

/// Speech backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    /// Preferred backend: `deepgram` or `openai`. The other one is the fallback.
    #[serde(default = "default_voice_provider")]
    pub provider: String,

    /// Deepgram API key. Falls back to the `DEEPGRAM_API_KEY` environment variable.
    #[serde(default)]
    pub deepgram_api_key: Option<String>,

    #[serde(default = "default_deepgram_base_url")]
    pub deepgram_base_url: String,

    /// Deepgram speech-to-text model.
    #[serde(default = "default_deepgram_stt_model")]
    pub deepgram_stt_model: String,

    /// Deepgram text-to-speech voice model.
    #[serde(default = "default_deepgram_tts_model")]
    pub deepgram_tts_model: String,

    /// OpenAI transcription model.
    #[serde(default = "default_openai_stt_model")]
    pub openai_stt_model: String,

    /// OpenAI speech model.
    #[serde(default = "default_openai_tts_model")]
    pub openai_tts_model: String,

    /// OpenAI voice name.
    #[serde(default = "default_openai_voice")]
    pub openai_voice: String,

    /// Transcription language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Speech rate multiplier.
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Longest text sent to a synthesizer.
    #[serde(default = "default_max_spoken_chars")]
    pub max_spoken_chars: usize,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: default_voice_provider(),
            deepgram_api_key: None,
            deepgram_base_url: default_deepgram_base_url(),
            deepgram_stt_model: default_deepgram_stt_model(),
            deepgram_tts_model: default_deepgram_tts_model(),
            openai_stt_model: default_openai_stt_model(),
            openai_tts_model: default_openai_tts_model(),
            openai_voice: default_openai_voice(),
            language: default_language(),
            speed: default_speed(),
            max_spoken_chars: default_max_spoken_chars(),
        }
    }
}

fn default_voice_provider() -> String {
    "deepgram".to_string()
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com/v1".to_string()
}

fn default_deepgram_stt_model() -> String {
    "nova-2".to_string()
}

fn default_deepgram_tts_model() -> String {
    "aura-asteria-es".to_string()
}

fn default_openai_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_openai_tts_model() -> String {
    "tts-1".to_string()
}

fn default_openai_voice() -> String {
    "nova".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_speed() -> f32 {
    1.0
}

fn default_max_spoken_chars() -> usize {
    500
}
