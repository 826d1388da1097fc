// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two-round completion protocol.
//!
//! Round 1 offers the tools. If the model calls any, the calls are recorded
//! verbatim, dispatched in order, their results appended, and round 2 asks
//! for the final wording with tools disabled and a smaller budget.

use std::sync::Arc;

use inmobot_core::types::{CompletionRequest, CompletionResponse, ToolChoice};
use inmobot_core::{
    CompletionProvider, ConversationTurn, InmobotError, LeadDataDelta, LeadIdentity,
};
use inmobot_tools::{ToolContext, ToolDispatcher};
use tracing::{debug, info, warn};

use crate::profile::ChannelProfile;

/// Result of one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub reply: String,
    /// The prior history plus this exchange, or the prior history untouched
    /// when the exchange degraded.
    pub history: Vec<ConversationTurn>,
    /// Lead data captured by every tool call in the exchange.
    pub delta: LeadDataDelta,
    /// True when the reply is a canned apology.
    pub degraded: bool,
}

impl Exchange {
    fn degraded(reply: &str, history: &[ConversationTurn]) -> Self {
        Self {
            reply: reply.to_string(),
            history: history.to_vec(),
            delta: LeadDataDelta::default(),
            degraded: true,
        }
    }
}

/// Drives the completion provider and the tool dispatcher for one exchange.
pub struct Orchestrator {
    provider: Option<Arc<dyn CompletionProvider>>,
    tools: Arc<ToolDispatcher>,
    fallback_reply: String,
    unavailable_reply: String,
}

impl Orchestrator {
    /// `provider` is `None` when no completion service is configured; every
    /// exchange then answers with `unavailable_reply`.
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        tools: Arc<ToolDispatcher>,
        fallback_reply: String,
        unavailable_reply: String,
    ) -> Self {
        Self {
            provider,
            tools,
            fallback_reply,
            unavailable_reply,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider(&self) -> Option<&Arc<dyn CompletionProvider>> {
        self.provider.as_ref()
    }

    pub fn tools(&self) -> &Arc<ToolDispatcher> {
        &self.tools
    }

    /// Answers `message` given the session's prior `history`. Never fails.
    pub async fn converse(
        &self,
        message: &str,
        history: &[ConversationTurn],
        profile: &ChannelProfile,
        identity: &LeadIdentity,
    ) -> Exchange {
        let Some(provider) = &self.provider else {
            warn!(channel = %profile.channel, "no completion provider configured");
            return Exchange::degraded(&self.unavailable_reply, history);
        };

        let mut turns = Vec::with_capacity(history.len() + 4);
        turns.extend_from_slice(history);
        turns.push(ConversationTurn::user(message));

        match self
            .run_rounds(provider.as_ref(), &mut turns, profile, identity)
            .await
        {
            Ok((reply, delta)) => {
                turns.push(ConversationTurn::assistant(reply.clone()));
                Exchange {
                    reply,
                    history: turns,
                    delta,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(channel = %profile.channel, error = %e, "completion failed, replying with fallback");
                let reply = match e {
                    InmobotError::Unavailable(_) => &self.unavailable_reply,
                    _ => &self.fallback_reply,
                };
                Exchange::degraded(reply, history)
            }
        }
    }

    async fn run_rounds(
        &self,
        provider: &dyn CompletionProvider,
        turns: &mut Vec<ConversationTurn>,
        profile: &ChannelProfile,
        identity: &LeadIdentity,
    ) -> Result<(String, LeadDataDelta), InmobotError> {
        let first = provider.complete(self.request(profile, turns, true)).await?;
        log_usage(&first, 1);

        if first.tool_calls.is_empty() {
            return Ok((self.reply_text(first.content), LeadDataDelta::default()));
        }

        info!(
            channel = %profile.channel,
            tool_calls = first.tool_calls.len(),
            "model requested tools"
        );
        turns.push(ConversationTurn::tool_request(
            first.content.clone(),
            first.tool_calls.clone(),
        ));

        let ctx = ToolContext {
            channel: profile.channel,
            identity,
            history: turns.as_slice(),
            emoji: profile.emoji,
            defer_persistence: profile.defer_lead_persistence,
        };
        let (outcomes, delta) = self.tools.dispatch_batch(&first.tool_calls, &ctx).await;
        for outcome in outcomes {
            turns.push(ConversationTurn::tool_result(outcome.call_id, outcome.content));
        }

        let second = provider.complete(self.request(profile, turns, false)).await?;
        log_usage(&second, 2);
        if !second.tool_calls.is_empty() {
            debug!(
                ignored = second.tool_calls.len(),
                "tool calls in the follow-up round are ignored"
            );
        }
        Ok((self.reply_text(second.content), delta))
    }

    fn request(
        &self,
        profile: &ChannelProfile,
        turns: &[ConversationTurn],
        with_tools: bool,
    ) -> CompletionRequest {
        let (tools, tool_choice, max_tokens) = if with_tools {
            (self.tools.definitions(), ToolChoice::Auto, profile.max_tokens)
        } else {
            (Vec::new(), ToolChoice::None, profile.followup_max_tokens)
        };
        CompletionRequest {
            system_instruction: profile.system_prompt.clone(),
            messages: turns.to_vec(),
            tools,
            tool_choice,
            max_tokens,
            temperature: profile.temperature,
        }
    }

    /// The model's text, or the fallback when it came back blank.
    fn reply_text(&self, content: Option<String>) -> String {
        match content.map(|c| c.trim().to_string()) {
            Some(text) if !text.is_empty() => text,
            _ => {
                warn!("completion returned no text, using fallback reply");
                self.fallback_reply.clone()
            }
        }
    }
}

fn log_usage(response: &CompletionResponse, round: u8) {
    if let Some(usage) = response.usage {
        debug!(
            round,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "completion usage"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inmobot_core::types::{Role, TokenUsage};
    use inmobot_core::{Channel, ToolCall};
    use inmobot_leads::{LeadManager, ScoringPolicy};
    use inmobot_storage::{MemoryLeadStore, StaticCatalog};
    use inmobot_test_utils::{MockCompletionProvider, fixture_catalog};
    use tracing_test::traced_test;

    fn profile(channel: Channel) -> ChannelProfile {
        ChannelProfile {
            channel,
            system_prompt: "Eres InmoBot.".into(),
            max_tokens: 800,
            followup_max_tokens: 600,
            temperature: 0.8,
            emoji: true,
            defer_lead_persistence: false,
        }
    }

    fn orchestrator(
        provider: Option<Arc<MockCompletionProvider>>,
    ) -> (Orchestrator, MemoryLeadStore) {
        let store = MemoryLeadStore::new();
        let leads = Arc::new(LeadManager::new(
            Arc::new(store.clone()),
            ScoringPolicy::default(),
        ));
        let tools = Arc::new(ToolDispatcher::new(
            Arc::new(StaticCatalog::new(fixture_catalog())),
            leads,
        ));
        let provider = provider.map(|p| p as Arc<dyn CompletionProvider>);
        let orchestrator = Orchestrator::new(
            provider,
            tools,
            "Lo siento, ocurrió un error.".into(),
            "Servicio no disponible.".into(),
        );
        (orchestrator, store)
    }

    fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    #[tokio::test]
    async fn plain_reply_appends_two_turns() {
        let mock = Arc::new(MockCompletionProvider::with_texts(["¡Hola! ¿En qué zona buscas?"]));
        let (orchestrator, _) = orchestrator(Some(mock.clone()));
        let identity = LeadIdentity::session("s1");

        let exchange = orchestrator
            .converse("Hola", &[], &profile(Channel::Web), &identity)
            .await;

        assert_eq!(exchange.reply, "¡Hola! ¿En qué zona buscas?");
        assert!(!exchange.degraded);
        assert_eq!(exchange.history.len(), 2);
        assert_eq!(exchange.history[0], ConversationTurn::user("Hola"));
        assert_eq!(exchange.history[1].role, Role::Assistant);

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tool_choice, ToolChoice::Auto);
        assert_eq!(requests[0].tools.len(), 3);
        assert_eq!(requests[0].max_tokens, 800);
        assert_eq!(requests[0].system_instruction, "Eres InmoBot.");
    }

    #[tokio::test]
    async fn tool_round_records_calls_and_results() {
        let mock = Arc::new(MockCompletionProvider::new());
        mock.push_tool_calls(vec![
            call("call_a", "save_lead_info", r#"{"name":"Juan","phone":"600123456"}"#),
            call("call_b", "search_properties", r#"{"zone":"Miraflores"}"#),
        ])
        .await;
        mock.push_text("Gracias Juan, encontré opciones en Miraflores.").await;
        let (orchestrator, store) = orchestrator(Some(mock.clone()));
        let identity = LeadIdentity::session("s2");

        let exchange = orchestrator
            .converse(
                "Soy Juan, 600123456, busco en Miraflores",
                &[],
                &profile(Channel::Web),
                &identity,
            )
            .await;

        let roles: Vec<Role> = exchange.history.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::Tool, Role::Tool, Role::Assistant]
        );
        assert_eq!(exchange.history[1].tool_calls.len(), 2);
        assert!(exchange.history[1].content.is_none());
        assert_eq!(exchange.history[2].tool_call_id.as_deref(), Some("call_a"));
        assert_eq!(exchange.history[3].tool_call_id.as_deref(), Some("call_b"));
        assert_eq!(exchange.delta.name.as_deref(), Some("Juan"));
        assert_eq!(exchange.reply, "Gracias Juan, encontré opciones en Miraflores.");

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[1].tools.is_empty());
        assert_eq!(requests[1].tool_choice, ToolChoice::None);
        assert_eq!(requests[1].max_tokens, 600);
        assert_eq!(requests[1].messages.len(), 4);

        let leads = store.snapshot().await;
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].message_count, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn failure_keeps_history_untouched() {
        let mock = Arc::new(MockCompletionProvider::new());
        mock.push_error(InmobotError::Provider {
            message: "API returned 500".into(),
            source: None,
        })
        .await;
        let (orchestrator, _) = orchestrator(Some(mock));
        let prior = vec![ConversationTurn::user("Hola"), ConversationTurn::assistant("¡Hola!")];

        let exchange = orchestrator
            .converse(
                "¿Tienen casas?",
                &prior,
                &profile(Channel::Telegram),
                &LeadIdentity::session("s3"),
            )
            .await;

        assert!(exchange.degraded);
        assert_eq!(exchange.reply, "Lo siento, ocurrió un error.");
        assert_eq!(exchange.history, prior);
        assert!(exchange.delta.is_empty());
        assert!(logs_contain("completion failed"));
    }

    #[tokio::test]
    async fn second_round_failure_degrades() {
        let mock = Arc::new(MockCompletionProvider::new());
        mock.push_tool_calls(vec![call("c1", "show_catalog", "{}")]).await;
        mock.push_error(InmobotError::Unavailable("timeout".into())).await;
        let (orchestrator, _) = orchestrator(Some(mock));

        let exchange = orchestrator
            .converse("Catálogo", &[], &profile(Channel::Web), &LeadIdentity::session("s4"))
            .await;
        assert!(exchange.degraded);
        assert_eq!(exchange.reply, "Servicio no disponible.");
        assert!(exchange.history.is_empty());
    }

    #[tokio::test]
    async fn missing_provider_is_unavailable() {
        let (orchestrator, _) = orchestrator(None);
        assert!(!orchestrator.has_provider());
        let exchange = orchestrator
            .converse("Hola", &[], &profile(Channel::Voice), &LeadIdentity::session("s5"))
            .await;
        assert!(exchange.degraded);
        assert_eq!(exchange.reply, "Servicio no disponible.");
    }

    #[tokio::test]
    async fn blank_content_uses_fallback() {
        let mock = Arc::new(MockCompletionProvider::new());
        mock.push_response(CompletionResponse {
            content: Some("   ".into()),
            tool_calls: Vec::new(),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 0,
            }),
        })
        .await;
        let (orchestrator, _) = orchestrator(Some(mock));
        let exchange = orchestrator
            .converse("Hola", &[], &profile(Channel::Web), &LeadIdentity::session("s6"))
            .await;
        assert!(!exchange.degraded);
        assert_eq!(exchange.reply, "Lo siento, ocurrió un error.");
        assert_eq!(exchange.history.len(), 2);
    }
}
