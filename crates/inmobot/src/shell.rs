// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `inmobot chat` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Every line goes through [`AgentService::handle_message`] on the chosen
//! channel. On the voice channel the reply is printed the way it would be
//! spoken.

use colored::Colorize;
use inmobot_agent::{AgentService, telegram_identity, voice_identity, web_identity};
use inmobot_core::{Channel, InmobotError, LeadDataDelta, LeadIdentity};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Builds the identity a real channel would present for this session.
pub fn chat_identity(
    channel: Channel,
    session: Option<String>,
    username: Option<String>,
) -> LeadIdentity {
    match (channel, session) {
        (Channel::Web, Some(session)) => LeadIdentity::session(session),
        (Channel::Web, None) => web_identity(),
        (Channel::Telegram, session) => {
            let chat_id = session.unwrap_or_else(|| "local".to_string());
            telegram_identity(&chat_id, username.as_deref())
        }
        (Channel::Voice, Some(session)) => voice_identity(&session),
        (Channel::Voice, None) => voice_identity(&uuid::Uuid::new_v4().to_string()),
    }
}

/// Runs the `inmobot chat` interactive REPL.
pub async fn run_chat(
    service: &AgentService,
    channel: Channel,
    session: Option<String>,
    username: Option<String>,
) -> Result<(), InmobotError> {
    let identity = chat_identity(channel, session, username);
    let session_id = identity.session_id.clone().unwrap_or_default();

    let mut rl = DefaultEditor::new()
        .map_err(|e| InmobotError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("inmobot chat ({channel})").bold().green());
    println!("session {}", session_id.dimmed());
    println!("Type {} to exit, {} to start over.\n", "/quit".yellow(), "/reset".yellow());

    let prompt = format!("{}> ", "tú".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed == "/reset" {
                    service.sessions().reset(channel, &session_id);
                    println!("{}", "conversation cleared".dimmed());
                    continue;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let turn = service.handle_message(channel, &identity, trimmed).await;
                debug!(session_id, degraded = turn.degraded, "turn complete");

                let reply = if channel.is_voice() {
                    service.spoken(&turn.reply)
                } else {
                    turn.reply
                };
                println!("{}> {reply}", "inmobot".cyan());
                if let Some(note) = captured_note(&turn.delta) {
                    println!("{}", format!("[{note}]").dimmed());
                }
                println!();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    Ok(())
}

/// One-line summary of the lead fields captured by a turn.
fn captured_note(delta: &LeadDataDelta) -> Option<String> {
    let fields = delta.saved_fields();
    (!fields.is_empty()).then(|| format!("captured: {}", fields.join(", ")))
}
