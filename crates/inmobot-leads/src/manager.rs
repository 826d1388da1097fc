// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lead manager: upsert, listings and lifecycle updates.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use inmobot_core::types::count_user_turns;
use inmobot_core::{
    Channel, ConversationTurn, InmobotError, Lead, LeadDataDelta, LeadIdentity, LeadStatus,
    LeadStore, Temperature,
};

use crate::identity::{MatchKey, resolve};
use crate::scoring::ScoringPolicy;

/// Aggregate counts over the lead collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total: usize,
    pub web: usize,
    pub telegram: usize,
    pub voice: usize,
    pub cold: usize,
    pub warm: usize,
    pub hot: usize,
}

/// Owns the lead collection's load-merge-save cycle.
///
/// Upserts within one process are serialized by an internal lock. Separate
/// processes sharing a store file still race, and the last writer wins.
pub struct LeadManager {
    store: Arc<dyn LeadStore>,
    policy: ScoringPolicy,
    write_lock: Mutex<()>,
}

impl LeadManager {
    pub fn new(store: Arc<dyn LeadStore>, policy: ScoringPolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Loads the collection, treating a read failure as "no leads".
    async fn load_or_empty(&self) -> Vec<Lead> {
        match self.store.load().await {
            Ok(leads) => leads,
            Err(e) => {
                warn!(error = %e, "failed to load leads, treating as empty");
                Vec::new()
            }
        }
    }

    /// Records captured data for the lead behind `identity`.
    ///
    /// Creates the lead on first contact. On a match, known values are only
    /// replaced by non-empty ones, the message count and score are
    /// recomputed, and the stored history is replaced by `history`. The full
    /// collection is saved before returning.
    pub async fn upsert(
        &self,
        channel: Channel,
        identity: &LeadIdentity,
        delta: &LeadDataDelta,
        history: &[ConversationTurn],
    ) -> Result<Lead, InmobotError> {
        let _guard = self.write_lock.lock().await;

        // A failed read must not be followed by a save that clobbers the file.
        let mut leads = self.store.load().await?;
        let now = Utc::now();
        let message_count = count_user_turns(history);

        let idx = match resolve(&leads, identity, delta) {
            Some((idx, key)) => {
                let lead = &mut leads[idx];
                debug!(lead_id = %lead.id, matched_by = key.as_str(), "resolved existing lead");
                attach_identity(lead, identity, key);
                idx
            }
            None => {
                let lead = Lead::new(uuid::Uuid::new_v4().to_string(), channel, identity, now);
                info!(lead_id = %lead.id, %channel, "creating new lead");
                leads.push(lead);
                leads.len() - 1
            }
        };

        let lead = &mut leads[idx];
        lead.data.merge(delta);
        lead.message_count = message_count;
        let (score, temperature) = self.policy.evaluate(&lead.data, message_count);
        lead.score = score;
        lead.temperature = temperature;
        lead.conversation_history = history.to_vec();
        lead.updated_at = now;
        let updated = lead.clone();

        self.store.save(&leads).await?;
        info!(
            lead_id = %updated.id,
            score = updated.score,
            temperature = %updated.temperature,
            "lead saved"
        );
        Ok(updated)
    }

    /// All leads, most recently updated first.
    pub async fn get_all(&self) -> Vec<Lead> {
        let mut leads = self.load_or_empty().await;
        leads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        leads
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Lead> {
        self.load_or_empty().await.into_iter().find(|l| l.id == id)
    }

    pub async fn get_by_channel(&self, channel: Channel) -> Vec<Lead> {
        self.get_all()
            .await
            .into_iter()
            .filter(|l| l.channel == channel)
            .collect()
    }

    pub async fn get_hot(&self) -> Vec<Lead> {
        self.get_all()
            .await
            .into_iter()
            .filter(|l| l.temperature == Temperature::Hot)
            .collect()
    }

    /// Case-insensitive search over name, phone, email and zone.
    pub async fn search(&self, query: &str) -> Vec<Lead> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.get_all().await;
        }
        self.get_all()
            .await
            .into_iter()
            .filter(|l| {
                [&l.data.name, &l.data.phone, &l.data.email, &l.data.zone]
                    .into_iter()
                    .flatten()
                    .any(|v| v.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub async fn stats(&self) -> LeadStats {
        let leads = self.load_or_empty().await;
        let mut stats = LeadStats {
            total: leads.len(),
            ..LeadStats::default()
        };
        for lead in &leads {
            match lead.channel {
                Channel::Web => stats.web += 1,
                Channel::Telegram => stats.telegram += 1,
                Channel::Voice => stats.voice += 1,
            }
            match lead.temperature {
                Temperature::Cold => stats.cold += 1,
                Temperature::Warm => stats.warm += 1,
                Temperature::Hot => stats.hot += 1,
            }
        }
        stats
    }

    /// Moves a lead to a new lifecycle status.
    pub async fn set_status(&self, id: &str, status: LeadStatus) -> Result<Lead, InmobotError> {
        let _guard = self.write_lock.lock().await;
        let mut leads = self.store.load().await?;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| InmobotError::NotFound {
                kind: "lead",
                id: id.to_string(),
            })?;
        lead.status = status;
        lead.updated_at = Utc::now();
        let updated = lead.clone();
        self.store.save(&leads).await?;
        info!(lead_id = %id, %status, "lead status changed");
        Ok(updated)
    }
}

/// Records identity keys the matched lead did not have yet.
fn attach_identity(lead: &mut Lead, identity: &LeadIdentity, key: MatchKey) {
    if let Some(session) = identity.session_id.as_deref()
        && !session.trim().is_empty()
        && !lead.owns_session(session)
    {
        if lead.session_id.is_none() {
            lead.session_id = Some(session.to_string());
        } else {
            debug!(lead_id = %lead.id, session_id = session, matched_by = key.as_str(), "linking session");
            lead.linked_sessions.push(session.to_string());
        }
    }
    if lead.platform_username.is_none() {
        lead.platform_username = identity.platform_username.clone();
    }
    if lead.chat_id.is_none() {
        lead.chat_id = identity.chat_id.clone();
    }
}
