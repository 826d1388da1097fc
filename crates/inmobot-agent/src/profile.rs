// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-channel conversation profiles.
//!
//! A profile bundles everything that differs between channels: the system
//! instruction, token budgets, sampling temperature and how tool results
//! are presented.

use inmobot_config::InmobotConfig;
use inmobot_core::Channel;
use tracing::{info, warn};

use crate::prompt::{text_prompt, voice_prompt};

/// Resolved settings for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelProfile {
    pub channel: Channel,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub followup_max_tokens: u32,
    pub temperature: f32,
    pub emoji: bool,
    pub defer_lead_persistence: bool,
}

impl ChannelProfile {
    /// Builds the profile for `channel`, reading its prompt file if configured.
    pub async fn load(channel: Channel, config: &InmobotConfig) -> Self {
        let settings = config.channel(channel);
        let system_prompt = load_system_prompt(
            channel,
            &config.agent.name,
            &settings.system_prompt,
            &settings.system_prompt_file,
        )
        .await;

        Self {
            channel,
            system_prompt,
            max_tokens: settings.max_tokens,
            followup_max_tokens: settings.followup_max_tokens,
            temperature: settings.temperature,
            emoji: settings.emoji,
            defer_lead_persistence: settings.defer_lead_persistence,
        }
    }
}

/// Profiles for every channel, selected by [`Channel`].
#[derive(Debug, Clone)]
pub struct ChannelProfiles {
    web: ChannelProfile,
    telegram: ChannelProfile,
    voice: ChannelProfile,
}

impl ChannelProfiles {
    pub async fn load(config: &InmobotConfig) -> Self {
        Self {
            web: ChannelProfile::load(Channel::Web, config).await,
            telegram: ChannelProfile::load(Channel::Telegram, config).await,
            voice: ChannelProfile::load(Channel::Voice, config).await,
        }
    }

    pub fn get(&self, channel: Channel) -> &ChannelProfile {
        match channel {
            Channel::Web => &self.web,
            Channel::Telegram => &self.telegram,
            Channel::Voice => &self.voice,
        }
    }
}

/// Loads a system prompt following priority: file > inline > built-in.
async fn load_system_prompt(
    channel: Channel,
    agent_name: &str,
    inline_prompt: &Option<String>,
    prompt_file: &Option<String>,
) -> String {
    if let Some(file_path) = prompt_file {
        match tokio::fs::read_to_string(file_path).await {
            Ok(content) => {
                let trimmed = content.trim().to_string();
                if !trimmed.is_empty() {
                    info!(path = file_path, %channel, "loaded system prompt from file");
                    return trimmed;
                }
            }
            Err(e) => {
                warn!(
                    path = file_path,
                    error = %e,
                    "failed to read system prompt file, falling back"
                );
            }
        }
    }

    if let Some(prompt) = inline_prompt
        && !prompt.trim().is_empty()
    {
        return prompt.clone();
    }

    if channel.is_voice() {
        voice_prompt(agent_name)
    } else {
        text_prompt(agent_name)
    }
}
