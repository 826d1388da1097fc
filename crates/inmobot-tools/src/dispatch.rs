// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executes the model's tool calls against the catalog and lead manager.

use std::sync::Arc;

use tracing::{Instrument, debug, info, warn};

use inmobot_core::types::ToolDefinition;
use inmobot_core::{
    CatalogStore, Channel, ConversationTurn, LeadDataDelta, LeadIdentity, Property,
    ToolCall,
};
use inmobot_leads::LeadManager;

use crate::invocation::ToolInvocation;
use crate::kind::{ToolKind, tool_definitions};
use crate::render::{render_catalog, render_search};
use crate::search::SearchCriteria;

/// Who is talking and how results should be presented.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub channel: Channel,
    pub identity: &'a LeadIdentity,
    /// History up to and including the assistant turn that requested tools.
    pub history: &'a [ConversationTurn],
    pub emoji: bool,
    /// Persist captured lead data in the background instead of awaiting it.
    pub defer_persistence: bool,
}

/// The result of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub call_id: String,
    pub content: String,
    pub delta: LeadDataDelta,
}

/// Runs tool calls. Never fails: every problem becomes result text the
/// model can read.
pub struct ToolDispatcher {
    catalog: Arc<dyn CatalogStore>,
    leads: Arc<LeadManager>,
}

impl ToolDispatcher {
    pub fn new(catalog: Arc<dyn CatalogStore>, leads: Arc<LeadManager>) -> Self {
        Self { catalog, leads }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    pub fn leads(&self) -> &Arc<LeadManager> {
        &self.leads
    }

    /// Runs `calls` in order.
    ///
    /// Returns one outcome per call plus the delta accumulated across the
    /// whole batch.
    pub async fn dispatch_batch(
        &self,
        calls: &[ToolCall],
        ctx: &ToolContext<'_>,
    ) -> (Vec<ToolOutcome>, LeadDataDelta) {
        let mut cumulative = LeadDataDelta::default();
        let mut outcomes = Vec::with_capacity(calls.len());
        for call in calls {
            let (content, delta) = self
                .invoke(&call.name, &call.arguments, &mut cumulative, ctx)
                .await;
            outcomes.push(ToolOutcome {
                call_id: call.id.clone(),
                content,
                delta,
            });
        }
        (outcomes, cumulative)
    }

    /// Runs one call, merging any captured lead data into `cumulative`.
    ///
    /// Returns the result text and this call's own contribution.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &str,
        cumulative: &mut LeadDataDelta,
        ctx: &ToolContext<'_>,
    ) -> (String, LeadDataDelta) {
        let invocation = match ToolInvocation::parse(name, arguments) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!(tool = name, error = %e, "ignoring tool call");
                return (rejection_text(name), LeadDataDelta::default());
            }
        };
        debug!(tool = %invocation.kind(), channel = %ctx.channel, "invoking tool");

        match invocation {
            ToolInvocation::ShowCatalog => {
                let catalog = self.load_catalog().await;
                (render_catalog(&catalog, ctx.emoji), LeadDataDelta::default())
            }
            ToolInvocation::SearchProperties(criteria) => {
                (self.search(&criteria, ctx.emoji).await, LeadDataDelta::default())
            }
            ToolInvocation::SaveLeadInfo(delta) => {
                cumulative.merge(&delta);
                let text = self.save_lead(&delta, cumulative, ctx).await;
                (text, delta)
            }
        }
    }

    async fn load_catalog(&self) -> Vec<Property> {
        match self.catalog.list_properties().await {
            Ok(properties) => properties,
            Err(e) => {
                warn!(error = %e, "catalog unavailable, treating as empty");
                Vec::new()
            }
        }
    }

    async fn search(&self, criteria: &SearchCriteria, emoji: bool) -> String {
        let catalog = self.load_catalog().await;
        let outcome = criteria.run(&catalog);
        render_search(&outcome, emoji)
    }

    async fn save_lead(
        &self,
        delta: &LeadDataDelta,
        merged: &LeadDataDelta,
        ctx: &ToolContext<'_>,
    ) -> String {
        let saved = delta.saved_fields();
        if merged.is_empty() {
            return "No se recibió información nueva del cliente.".to_string();
        }

        if ctx.defer_persistence {
            let leads = Arc::clone(&self.leads);
            let channel = ctx.channel;
            let identity = ctx.identity.clone();
            let merged = merged.clone();
            let history = ctx.history.to_vec();
            tokio::spawn(
                async move {
                    if let Err(e) = leads.upsert(channel, &identity, &merged, &history).await {
                        warn!(%channel, error = %e, "background lead persistence failed");
                    }
                }
                .in_current_span(),
            );
        } else if let Err(e) = self
            .leads
            .upsert(ctx.channel, ctx.identity, merged, ctx.history)
            .await
        {
            warn!(channel = %ctx.channel, error = %e, "lead persistence failed");
            return PERSISTENCE_FAILED.to_string();
        }

        info!(channel = %ctx.channel, fields = ?saved, "lead info captured");
        confirmation_text(&saved)
    }
}

fn confirmation_text(saved: &[&str]) -> String {
    if saved.is_empty() {
        "Información guardada.".to_string()
    } else {
        format!("Información guardada: {}", saved.join(", "))
    }
}

const PERSISTENCE_FAILED: &str =
    "No se pudo guardar la información en este momento; continúa la conversación con normalidad.";

fn rejection_text(name: &str) -> String {
    if name.parse::<ToolKind>().is_ok() {
        format!("No se pudieron interpretar los argumentos de {name}; no se realizó ninguna acción.")
    } else {
        format!("Herramienta desconocida: {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use inmobot_leads::ScoringPolicy;
    use inmobot_storage::StaticCatalog;
    use inmobot_test_utils::FailingLeadStore;
    use tracing_test::traced_test;

    fn failing_dispatcher() -> ToolDispatcher {
        let leads = LeadManager::new(Arc::new(FailingLeadStore), ScoringPolicy::default());
        ToolDispatcher::new(Arc::new(StaticCatalog::new(Vec::new())), Arc::new(leads))
    }

    fn context<'a>(
        channel: Channel,
        identity: &'a LeadIdentity,
        history: &'a [ConversationTurn],
        defer_persistence: bool,
    ) -> ToolContext<'a> {
        ToolContext {
            channel,
            identity,
            history,
            emoji: !channel.is_voice(),
            defer_persistence,
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_save_is_reported_to_the_model() {
        let dispatcher = failing_dispatcher();
        let identity = LeadIdentity::session("web-1");
        let history = [ConversationTurn::user("Soy Juan, 600123456")];
        let mut cumulative = LeadDataDelta::default();

        let (text, delta) = dispatcher
            .invoke(
                "save_lead_info",
                r#"{"name":"Juan","phone":"600123456"}"#,
                &mut cumulative,
                &context(Channel::Web, &identity, &history, false),
            )
            .await;

        assert_eq!(text, PERSISTENCE_FAILED);
        assert_eq!(delta.name.as_deref(), Some("Juan"));
        assert_eq!(cumulative.phone.as_deref(), Some("600123456"));
        assert!(logs_contain("lead persistence failed"));
        assert!(!logs_contain("lead info captured"));
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_background_save_is_only_logged() {
        let dispatcher = failing_dispatcher();
        let identity = LeadIdentity::session("call-1");
        let history = [ConversationTurn::user("Me llamo Ana")];
        let mut cumulative = LeadDataDelta::default();

        let (text, _) = dispatcher
            .invoke(
                "save_lead_info",
                r#"{"name":"Ana"}"#,
                &mut cumulative,
                &context(Channel::Voice, &identity, &history, true),
            )
            .await;
        assert_eq!(text, "Información guardada: name");

        for _ in 0..50 {
            if logs_contain("background lead persistence failed") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(logs_contain("background lead persistence failed"));
    }

    #[test]
    fn confirmation_lists_fields() {
        assert_eq!(
            confirmation_text(&["name", "phone"]),
            "Información guardada: name, phone"
        );
        assert_eq!(confirmation_text(&[]), "Información guardada.");
    }

    #[test]
    fn rejection_distinguishes_unknown_tools() {
        assert!(rejection_text("save_lead_info").contains("argumentos"));
        assert_eq!(rejection_text("hack"), "Herramienta desconocida: hack");
    }
}
