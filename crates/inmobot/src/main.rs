// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! InmoBot - real-estate lead qualification assistant.
//!
//! This is the binary entry point: an interactive chat REPL plus commands
//! for inspecting leads, the catalog and the effective configuration.

mod doctor;
mod leads;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use inmobot_agent::{AgentParts, AgentService};
use inmobot_config::InmobotConfig;
use inmobot_core::{
    CatalogStore, Channel, CompletionProvider, InmobotError, LeadStatus, SpeechProvider,
};
use inmobot_openai::OpenAiProvider;
use inmobot_storage::{JsonCatalogStore, JsonLeadStore};
use inmobot_voice::{SpeechFallback, VoiceNormalizer};
use tracing::warn;

/// InmoBot - real-estate lead qualification assistant.
#[derive(Parser, Debug)]
#[command(name = "inmobot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the assistant in the terminal.
    Chat {
        /// Conversation style to use: web, telegram or voice.
        #[arg(long, default_value = "web")]
        channel: Channel,
        /// Resume or name the session (a chat id on telegram).
        #[arg(long)]
        session: Option<String>,
        /// Platform username for telegram sessions.
        #[arg(long)]
        username: Option<String>,
    },
    /// List captured leads.
    Leads {
        /// Only hot leads.
        #[arg(long)]
        hot: bool,
        /// Only leads first seen on this channel.
        #[arg(long)]
        channel: Option<Channel>,
        /// Show one lead in full.
        #[arg(long)]
        id: Option<String>,
        /// Case-insensitive match on name, phone, email or zone.
        #[arg(long)]
        search: Option<String>,
        /// Print totals per channel and temperature.
        #[arg(long)]
        stats: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Move a lead through the sales lifecycle.
    SetStatus {
        id: String,
        /// new, contacted, qualified, visit_scheduled, won or lost.
        status: LeadStatus,
    },
    /// Print the property catalog.
    Properties {
        /// Use the plain layout read on voice calls.
        #[arg(long)]
        plain: bool,
    },
    /// Show how a reply would be spoken on a call.
    Normalize {
        text: String,
        /// Spoken length limit; defaults to `voice.max_spoken_chars`.
        #[arg(long)]
        max_chars: Option<usize>,
    },
    /// Print the effective configuration as TOML.
    Config,
    /// Check configuration, stores and external services.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => inmobot_config::load_and_validate_path(path),
        None => inmobot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            inmobot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: InmobotConfig) -> Result<(), InmobotError> {
    match command {
        Some(Commands::Chat {
            channel,
            session,
            username,
        }) => {
            let service = build_service(&config).await;
            shell::run_chat(&service, channel, session, username).await
        }
        Some(Commands::Leads {
            hot,
            channel,
            id,
            search,
            stats,
            json,
        }) => {
            let manager = leads::lead_manager(&config);
            let filter = leads::LeadFilter {
                hot,
                channel,
                id,
                search,
            };
            if stats {
                leads::print_stats(&manager, json).await
            } else {
                leads::print_leads(&manager, &filter, json).await
            }
        }
        Some(Commands::SetStatus { id, status }) => {
            let lead = leads::lead_manager(&config).set_status(&id, status).await?;
            println!("{} -> {}", lead.id, lead.status);
            Ok(())
        }
        Some(Commands::Properties { plain }) => {
            let catalog = JsonCatalogStore::from_config(&config.storage);
            let properties = catalog.list_properties().await?;
            println!(
                "{}",
                inmobot_tools::render::render_catalog(&properties, !plain)
            );
            Ok(())
        }
        Some(Commands::Normalize { text, max_chars }) => {
            let normalizer =
                VoiceNormalizer::new(max_chars.unwrap_or(config.voice.max_spoken_chars));
            println!("{}", normalizer.normalize(&text));
            Ok(())
        }
        Some(Commands::Config) => {
            let rendered = toml::to_string_pretty(&redacted(config))
                .map_err(|e| InmobotError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("inmobot: use --help for available commands");
            Ok(())
        }
    }
}

/// Assembles the agent from configured adapters.
///
/// A missing completion key or speech key leaves that adapter out; the
/// service then answers with the unavailable reply or skips audio.
async fn build_service(config: &InmobotConfig) -> AgentService {
    let provider: Option<Arc<dyn CompletionProvider>> = match OpenAiProvider::new(config) {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            warn!(error = %e, "completion provider unavailable");
            None
        }
    };

    let speech: Option<Arc<dyn SpeechProvider>> = match SpeechFallback::from_config(config) {
        Ok(fallback) if !fallback.is_empty() => Some(Arc::new(fallback)),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "speech backends unavailable");
            None
        }
    };

    let parts = AgentParts {
        provider,
        catalog: Arc::new(JsonCatalogStore::from_config(&config.storage)),
        lead_store: Arc::new(JsonLeadStore::from_config(&config.storage)),
        speech,
    };
    AgentService::new(config, parts).await
}

/// Blanks secrets before the config is printed.
fn redacted(mut config: InmobotConfig) -> InmobotConfig {
    if config.openai.api_key.is_some() {
        config.openai.api_key = Some("<redacted>".to_string());
    }
    if config.voice.deepgram_api_key.is_some() {
        config.voice.deepgram_api_key = Some("<redacted>".to_string());
    }
    config
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("inmobot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
