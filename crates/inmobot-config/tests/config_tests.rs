// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the InmoBot configuration system.

use inmobot_config::diagnostic::ConfigError;
use inmobot_config::model::InmobotConfig;
use inmobot_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use inmobot_core::Channel;

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
name = "Asesora"
log_level = "debug"
max_history_turns = 20

[openai]
api_key = "sk-test"
model = "gpt-4o"

[storage]
properties_path = "/tmp/props.json"
leads_path = "/tmp/leads.json"

[channels.voice]
max_tokens = 150
system_prompt = "Habla despacio."

[scoring]
phone_points = 35

[voice]
provider = "openai"
openai_voice = "shimmer"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "Asesora");
    assert_eq!(config.agent.max_history_turns, 20);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.storage.leads_path, "/tmp/leads.json");
    assert_eq!(config.scoring.phone_points, 35);
    assert_eq!(config.scoring.name_points, 25);
    assert_eq!(config.voice.provider, "openai");
    assert_eq!(config.voice.openai_voice, "shimmer");

    // Overriding one voice key keeps the other voice defaults.
    let voice = config.channel(Channel::Voice);
    assert_eq!(voice.max_tokens, 150);
    assert_eq!(voice.followup_max_tokens, 100);
    assert_eq!(voice.temperature, 0.5);
    assert!(!voice.emoji);
    assert!(voice.defer_lead_persistence);
    assert_eq!(voice.system_prompt.as_deref(), Some("Habla despacio."));
}

#[test]
fn empty_toml_uses_channel_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    let web = config.channel(Channel::Web);
    assert_eq!(web.max_tokens, 800);
    assert_eq!(web.temperature, 0.8);
    assert!(web.emoji);
    assert!(!web.defer_lead_persistence);

    let voice = config.channel(Channel::Voice);
    assert_eq!(voice.max_tokens, 120);
    assert!(voice.followup_max_tokens < voice.max_tokens);

    assert_eq!(config.agent.name, "InmoBot");
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.voice.max_spoken_chars, 500);
    assert_eq!(config.scoring.cold_max, 30);
    assert_eq!(config.scoring.warm_max, 60);
}

#[test]
fn unknown_field_in_nested_channel_is_rejected() {
    let toml = r#"
[channels.voice]
max_tokns = 90
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    assert!(err.to_string().contains("max_tokns"), "got: {err}");
}

#[test]
fn unknown_key_diagnostic_carries_suggestion() {
    let toml = r#"
[agent]
naem = "x"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "naem");
            assert_eq!(suggestion.as_deref(), Some("name"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn invalid_values_fail_validation() {
    let toml = r#"
[channels.telegram]
temperature = 2.5

[voice]
provider = "polly"
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn dotted_override_sets_nested_channel_key() {
    use figment::{Figment, providers::Serialized};

    let config: InmobotConfig = Figment::new()
        .merge(Serialized::defaults(InmobotConfig::default()))
        .merge(("channels.voice.temperature", 0.3))
        .extract()
        .expect("should merge dotted override");

    assert_eq!(config.channel(Channel::Voice).temperature, 0.3);
    assert_eq!(config.channel(Channel::Web).temperature, 0.8);
}

#[test]
fn loads_and_validates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inmobot.toml");
    std::fs::write(&path, "[agent]\nname = \"Archivo\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.agent.name, "Archivo");
}
