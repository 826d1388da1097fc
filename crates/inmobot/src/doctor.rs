// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inmobot doctor` command implementation.
//!
//! Runs the health check of every adapter the agent would be assembled
//! from and prints one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use inmobot_config::InmobotConfig;
use inmobot_core::{HealthStatus, InmobotError, PluginAdapter};
use inmobot_openai::OpenAiProvider;
use inmobot_storage::{JsonCatalogStore, JsonLeadStore};
use inmobot_voice::SpeechFallback;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn from_health(name: &str, health: Result<HealthStatus, InmobotError>, start: Instant) -> Self {
        let (status, message) = match health {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, "healthy".to_string()),
            Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
            Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        };
        Self {
            name: name.to_string(),
            status,
            message,
            duration: start.elapsed(),
        }
    }
}

/// Run the `inmobot doctor` command.
pub async fn run_doctor(config: &InmobotConfig, plain: bool) -> Result<(), InmobotError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config).await;

    println!();
    println!("  inmobot doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", render_line(result, use_color));
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

pub async fn run_checks(config: &InmobotConfig) -> Vec<CheckResult> {
    vec![
        check_adapter("Catalog", &JsonCatalogStore::from_config(&config.storage)).await,
        check_adapter("Lead store", &JsonLeadStore::from_config(&config.storage)).await,
        check_completion(config).await,
        check_speech(config).await,
    ]
}

async fn check_adapter(name: &str, adapter: &dyn PluginAdapter) -> CheckResult {
    let start = Instant::now();
    CheckResult::from_health(name, adapter.health_check().await, start)
}

async fn check_completion(config: &InmobotConfig) -> CheckResult {
    let start = Instant::now();
    match OpenAiProvider::new(config) {
        Ok(provider) => {
            let mut result = CheckResult::from_health("Completion", provider.health_check().await, start);
            if result.status == CheckStatus::Pass {
                result.message = format!("model {}", config.openai.model);
            }
            result
        }
        Err(e) => CheckResult {
            name: "Completion".to_string(),
            status: CheckStatus::Fail,
            message: e.to_string(),
            duration: start.elapsed(),
        },
    }
}

async fn check_speech(config: &InmobotConfig) -> CheckResult {
    let start = Instant::now();
    match SpeechFallback::from_config(config) {
        Ok(fallback) => {
            let mut result = CheckResult::from_health("Speech", fallback.health_check().await, start);
            if !fallback.is_empty() {
                result.message = format!("{} ({})", result.message, fallback.backend_names().join(", "));
            }
            result
        }
        Err(e) => CheckResult::from_health("Speech", Err(e), start),
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    use colored::Colorize;

    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (&result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
    };
    format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
}
