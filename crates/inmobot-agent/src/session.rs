// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation histories keyed by channel and session id.
//!
//! Each history sits behind its own async mutex. A request holds the lock
//! for its whole exchange, so two in-flight messages on the same session
//! are serialized while different sessions proceed independently.

use std::sync::Arc;

use dashmap::DashMap;
use inmobot_core::types::Role;
use inmobot_core::{Channel, ConversationTurn, LeadIdentity};
use tokio::sync::Mutex;
use tracing::debug;

/// A session's history, locked for the duration of an exchange.
pub type SharedHistory = Arc<Mutex<Vec<ConversationTurn>>>;

/// Get-or-create store of per-session histories.
pub struct SessionStore {
    sessions: DashMap<(Channel, String), SharedHistory>,
    max_history_turns: usize,
}

impl SessionStore {
    pub fn new(max_history_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_history_turns,
        }
    }

    /// The history for `(channel, session_id)`, created empty on first use.
    pub fn history(&self, channel: Channel, session_id: &str) -> SharedHistory {
        self.sessions
            .entry((channel, session_id.to_string()))
            .or_insert_with(|| {
                debug!(%channel, session_id, "new conversation session");
                Arc::new(Mutex::new(Vec::new()))
            })
            .clone()
    }

    /// A copy of the current history; empty for unknown sessions.
    pub async fn snapshot(&self, channel: Channel, session_id: &str) -> Vec<ConversationTurn> {
        let entry = self
            .sessions
            .get(&(channel, session_id.to_string()))
            .map(|e| e.value().clone());
        match entry {
            Some(history) => history.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Forgets a session. Returns whether it existed.
    pub fn reset(&self, channel: Channel, session_id: &str) -> bool {
        self.sessions
            .remove(&(channel, session_id.to_string()))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops the oldest turns beyond the configured limit.
    pub fn trim(&self, history: &mut Vec<ConversationTurn>) {
        trim_history(history, self.max_history_turns);
    }
}

/// Trims `history` to at most `max_turns`, cutting only before a user turn.
///
/// Cutting elsewhere could orphan tool results from the assistant turn that
/// requested them. If no user turn lies inside the window the history is
/// left as is.
pub fn trim_history(history: &mut Vec<ConversationTurn>, max_turns: usize) {
    if max_turns == 0 || history.len() <= max_turns {
        return;
    }
    let earliest = history.len() - max_turns;
    if let Some(offset) = history[earliest..]
        .iter()
        .position(|turn| turn.role == Role::User)
    {
        history.drain(..earliest + offset);
    }
}

/// Identity for a new web chat: a fresh random session id.
pub fn web_identity() -> LeadIdentity {
    LeadIdentity::session(uuid::Uuid::new_v4().to_string())
}

/// Identity for a messaging-platform chat.
pub fn telegram_identity(chat_id: &str, username: Option<&str>) -> LeadIdentity {
    let identity = LeadIdentity::session(format!("telegram_{chat_id}")).with_chat_id(chat_id);
    match username.map(|u| u.trim_start_matches('@')).filter(|u| !u.is_empty()) {
        Some(username) => identity.with_username(username),
        None => identity,
    }
}

/// Identity for a voice call.
pub fn voice_identity(call_id: &str) -> LeadIdentity {
    LeadIdentity::session(call_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inmobot_core::ToolCall;

    fn exchange(n: usize) -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user(format!("pregunta {n}")),
            ConversationTurn::tool_request(
                None,
                vec![ToolCall {
                    id: format!("call_{n}"),
                    name: "show_catalog".into(),
                    arguments: "{}".into(),
                }],
            ),
            ConversationTurn::tool_result(format!("call_{n}"), "catálogo"),
            ConversationTurn::assistant(format!("respuesta {n}")),
        ]
    }

    #[test]
    fn trim_cuts_at_user_turn() {
        let mut history: Vec<_> = (0..3).flat_map(exchange).collect();
        trim_history(&mut history, 6);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].text(), "pregunta 2");
        assert_eq!(history[0].role, Role::User);
    }

    #[test]
    fn trim_keeps_short_histories() {
        let mut history = exchange(0);
        trim_history(&mut history, 40);
        assert_eq!(history.len(), 4);
        trim_history(&mut history, 0);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn trim_without_user_turn_in_window_keeps_everything() {
        let mut history = exchange(0);
        trim_history(&mut history, 2);
        assert_eq!(history.len(), 4);
    }

    #[tokio::test]
    async fn sessions_are_keyed_by_channel_and_id() {
        let store = SessionStore::new(40);
        store
            .history(Channel::Web, "abc")
            .lock()
            .await
            .push(ConversationTurn::user("Hola"));

        assert_eq!(store.snapshot(Channel::Web, "abc").await.len(), 1);
        assert!(store.snapshot(Channel::Voice, "abc").await.is_empty());
        assert_eq!(store.len(), 1);

        assert!(store.reset(Channel::Web, "abc"));
        assert!(!store.reset(Channel::Web, "abc"));
        assert!(store.is_empty());
    }

    #[test]
    fn channel_identities() {
        let web = web_identity();
        assert_eq!(web.session_id.as_ref().map(String::len), Some(36));

        let tg = telegram_identity("555", Some("@juanp"));
        assert_eq!(tg.session_id.as_deref(), Some("telegram_555"));
        assert_eq!(tg.chat_id.as_deref(), Some("555"));
        assert_eq!(tg.platform_username.as_deref(), Some("juanp"));

        assert!(telegram_identity("7", None).platform_username.is_none());
        assert_eq!(voice_identity("call-1").session_id.as_deref(), Some("call-1"));
    }
}
