// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as token budgets, temperature ranges and threshold order.

use inmobot_core::Channel;

use crate::diagnostic::ConfigError;
use crate::model::InmobotConfig;

/// Speech backends the voice section may name.
pub const VOICE_PROVIDERS: &[&str] = &["deepgram", "openai"];

/// Shortest spoken-text limit that still fits a sentence plus the continuation cue.
pub const MIN_SPOKEN_CHARS: usize = 80;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &InmobotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.properties_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.properties_path must not be empty".to_string(),
        });
    }

    if config.storage.leads_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.leads_path must not be empty".to_string(),
        });
    }

    if config.agent.fallback_reply.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "agent.fallback_reply must not be empty".to_string(),
        });
    }

    if config.agent.max_history_turns < 2 {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.max_history_turns must be at least 2, got {}",
                config.agent.max_history_turns
            ),
        });
    }

    for channel in Channel::ALL {
        let profile = config.channel(channel);
        let section = format!("channels.{channel}");

        if !(0.0..=2.0).contains(&profile.temperature) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{section}.temperature must be between 0 and 2, got {}",
                    profile.temperature
                ),
            });
        }

        if profile.max_tokens == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{section}.max_tokens must be positive"),
            });
        }

        if profile.followup_max_tokens == 0 || profile.followup_max_tokens > profile.max_tokens {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{section}.followup_max_tokens must be between 1 and max_tokens ({}), got {}",
                    profile.max_tokens, profile.followup_max_tokens
                ),
            });
        }
    }

    let scoring = &config.scoring;
    if scoring.cold_max >= scoring.warm_max || scoring.warm_max >= 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "scoring thresholds must satisfy cold_max < warm_max < 100, got {} and {}",
                scoring.cold_max, scoring.warm_max
            ),
        });
    }

    if !VOICE_PROVIDERS.contains(&config.voice.provider.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "voice.provider `{}` is not supported (expected one of: {})",
                config.voice.provider,
                VOICE_PROVIDERS.join(", ")
            ),
        });
    }

    if config.voice.max_spoken_chars < MIN_SPOKEN_CHARS {
        errors.push(ConfigError::Validation {
            message: format!(
                "voice.max_spoken_chars must be at least {MIN_SPOKEN_CHARS}, got {}",
                config.voice.max_spoken_chars
            ),
        });
    }

    if !(0.25..=4.0).contains(&config.voice.speed) {
        errors.push(ConfigError::Validation {
            message: format!(
                "voice.speed must be between 0.25 and 4.0, got {}",
                config.voice.speed
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&InmobotConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = InmobotConfig::default();
        config.storage.leads_path = " ".into();
        config.channels.voice.temperature = 3.5;
        config.channels.web.followup_max_tokens = 900;
        config.voice.provider = "polly".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {errors:?}");
        let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(rendered.iter().any(|e| e.contains("channels.voice.temperature")));
        assert!(rendered.iter().any(|e| e.contains("channels.web.followup_max_tokens")));
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let mut config = InmobotConfig::default();
        config.scoring.cold_max = 70;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("cold_max < warm_max"));
    }
}
