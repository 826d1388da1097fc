// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./inmobot.toml` > `~/.config/inmobot/inmobot.toml` >
//! `/etc/inmobot/inmobot.toml`, with environment variable overrides via the
//! `INMOBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::InmobotConfig;

/// Environment key prefixes and the config section each maps to.
///
/// Longer prefixes come first so `channels_voice_` wins over `voice_`.
const ENV_SECTIONS: &[(&str, &str)] = &[
    ("channels_web_", "channels.web."),
    ("channels_telegram_", "channels.telegram."),
    ("channels_voice_", "channels.voice."),
    ("agent_", "agent."),
    ("openai_", "openai."),
    ("storage_", "storage."),
    ("scoring_", "scoring."),
    ("voice_", "voice."),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/inmobot/inmobot.toml` (system-wide)
/// 3. `~/.config/inmobot/inmobot.toml` (user XDG config)
/// 4. `./inmobot.toml` (local directory)
/// 5. `INMOBOT_*` environment variables
pub fn load_config() -> Result<InmobotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<InmobotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InmobotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<InmobotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(InmobotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the default config hierarchy.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(InmobotConfig::default()))
        .merge(Toml::file("/etc/inmobot/inmobot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("inmobot/inmobot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("inmobot.toml"))
        .merge(env_provider())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config key.
///
/// `channels_voice_max_tokens` becomes `channels.voice.max_tokens`; the rest
/// of the name keeps its underscores so `voice_deepgram_api_key` maps to
/// `voice.deepgram_api_key`.
pub fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS
        .iter()
        .find_map(|(prefix, section)| {
            key.strip_prefix(prefix)
                .map(|rest| format!("{section}{rest}"))
        })
        .unwrap_or(key)
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names
/// themselves contain underscores.
fn env_provider() -> Env {
    Env::prefixed("INMOBOT_").map(|key| map_env_key(key.as_str()).into())
}
