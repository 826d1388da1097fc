// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for lead upsert, identity resolution and listings.

use std::sync::Arc;

use async_trait::async_trait;
use inmobot_core::types::{AdapterType, HealthStatus};
use inmobot_core::{
    Channel, ConversationTurn, InmobotError, Lead, LeadDataDelta, LeadIdentity, LeadStatus,
    LeadStore, PluginAdapter, Temperature,
};
use inmobot_leads::{LeadManager, ScoringPolicy};
use inmobot_storage::MemoryLeadStore;
use proptest::prelude::*;

fn manager() -> (LeadManager, MemoryLeadStore) {
    let store = MemoryLeadStore::new();
    let manager = LeadManager::new(Arc::new(store.clone()), ScoringPolicy::default());
    (manager, store)
}

fn history(user_turns: usize) -> Vec<ConversationTurn> {
    (0..user_turns)
        .flat_map(|i| {
            [
                ConversationTurn::user(format!("mensaje {i}")),
                ConversationTurn::assistant("ok"),
            ]
        })
        .collect()
}

#[tokio::test]
async fn fresh_session_creates_one_warm_lead() {
    let (manager, store) = manager();
    let delta = LeadDataDelta {
        name: Some("Juan".into()),
        phone: Some("600123456".into()),
        ..LeadDataDelta::default()
    };

    let lead = manager
        .upsert(
            Channel::Web,
            &LeadIdentity::session("web-1"),
            &delta,
            &history(1),
        )
        .await
        .unwrap();

    assert!(lead.score >= 55);
    assert_eq!(lead.temperature, Temperature::Warm);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.created_at, lead.updated_at);
    assert_eq!(store.snapshot().await.len(), 1);
}

#[tokio::test]
async fn same_session_updates_same_lead() {
    let (manager, store) = manager();
    let identity = LeadIdentity::session("web-1");

    let first = manager
        .upsert(
            Channel::Web,
            &identity,
            &LeadDataDelta {
                name: Some("Ana".into()),
                ..LeadDataDelta::default()
            },
            &history(1),
        )
        .await
        .unwrap();

    let second = manager
        .upsert(
            Channel::Web,
            &identity,
            &LeadDataDelta {
                name: Some(String::new()),
                zone: Some("Surco".into()),
                ..LeadDataDelta::default()
            },
            &history(3),
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.data.name.as_deref(), Some("Ana"));
    assert_eq!(second.data.zone.as_deref(), Some("Surco"));
    assert_eq!(second.message_count, 3);
    // name 25 + zone 5 + engagement 10
    assert_eq!(second.score, 40);
    assert_eq!(second.conversation_history.len(), 6);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(store.snapshot().await.len(), 1);
}

#[tokio::test]
async fn phone_links_leads_across_channels() {
    let (manager, store) = manager();
    let phone = LeadDataDelta {
        phone: Some("987654321".into()),
        ..LeadDataDelta::default()
    };

    let web = manager
        .upsert(Channel::Web, &LeadIdentity::session("web-7"), &phone, &history(1))
        .await
        .unwrap();

    let identity = LeadIdentity::session("telegram_555")
        .with_username("carla")
        .with_chat_id("555");
    let telegram = manager
        .upsert(Channel::Telegram, &identity, &phone, &history(1))
        .await
        .unwrap();

    assert_eq!(web.id, telegram.id);
    assert_eq!(telegram.channel, Channel::Web);
    assert_eq!(telegram.platform_username.as_deref(), Some("carla"));
    assert_eq!(telegram.linked_sessions, vec!["telegram_555".to_string()]);
    assert_eq!(store.snapshot().await.len(), 1);

    // The linked session now resolves directly, even without the phone.
    let again = manager
        .upsert(
            Channel::Telegram,
            &LeadIdentity::session("telegram_555"),
            &LeadDataDelta {
                email: Some("carla@example.com".into()),
                ..LeadDataDelta::default()
            },
            &history(2),
        )
        .await
        .unwrap();
    assert_eq!(again.id, web.id);
}

#[tokio::test]
async fn listings_filter_and_sort() {
    let (manager, _store) = manager();

    let hot = LeadDataDelta {
        name: Some("Luis".into()),
        phone: Some("911".into()),
        email: Some("luis@example.com".into()),
        ..LeadDataDelta::default()
    };
    manager
        .upsert(Channel::Voice, &LeadIdentity::session("v-1"), &hot, &history(1))
        .await
        .unwrap();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let latest = manager
        .upsert(
            Channel::Web,
            &LeadIdentity::session("w-1"),
            &LeadDataDelta {
                zone: Some("Miraflores".into()),
                ..LeadDataDelta::default()
            },
            &history(1),
        )
        .await
        .unwrap();

    let all = manager.get_all().await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, latest.id);

    assert_eq!(manager.get_by_channel(Channel::Voice).await.len(), 1);
    let hot_leads = manager.get_hot().await;
    assert_eq!(hot_leads.len(), 1);
    assert_eq!(hot_leads[0].data.name.as_deref(), Some("Luis"));

    assert_eq!(manager.search("miraFLORES").await.len(), 1);
    assert!(manager.get_by_id(&latest.id).await.is_some());
    assert!(manager.get_by_id("missing").await.is_none());

    let stats = manager.stats().await;
    assert_eq!(stats.total, 2);
    assert_eq!(stats.voice, 1);
    assert_eq!(stats.hot, 1);
    assert_eq!(stats.cold, 1);
}

#[tokio::test]
async fn set_status_updates_lifecycle() {
    let (manager, _store) = manager();
    let lead = manager
        .upsert(
            Channel::Web,
            &LeadIdentity::session("s"),
            &LeadDataDelta {
                name: Some("Rosa".into()),
                ..LeadDataDelta::default()
            },
            &history(1),
        )
        .await
        .unwrap();

    let updated = manager
        .set_status(&lead.id, LeadStatus::VisitScheduled)
        .await
        .unwrap();
    assert_eq!(updated.status, LeadStatus::VisitScheduled);

    let err = manager
        .set_status("nope", LeadStatus::Won)
        .await
        .unwrap_err();
    assert!(matches!(err, InmobotError::NotFound { .. }));
}

struct FailingStore;

#[async_trait]
impl PluginAdapter for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LeadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Unhealthy("down".into()))
    }
}

#[async_trait]
impl LeadStore for FailingStore {
    async fn load(&self) -> Result<Vec<Lead>, InmobotError> {
        Err(InmobotError::storage(std::io::Error::other("disk gone")))
    }

    async fn save(&self, _leads: &[Lead]) -> Result<(), InmobotError> {
        Err(InmobotError::storage(std::io::Error::other("disk gone")))
    }
}

#[tokio::test]
async fn read_failures_list_as_empty() {
    let manager = LeadManager::new(Arc::new(FailingStore), ScoringPolicy::default());
    assert!(manager.get_all().await.is_empty());
    assert_eq!(manager.stats().await.total, 0);

    let err = manager
        .upsert(
            Channel::Web,
            &LeadIdentity::session("s"),
            &LeadDataDelta::default(),
            &[],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InmobotError::Storage { .. }));
}

fn arb_field() -> impl Strategy<Value = usize> {
    0usize..9
}

fn apply(delta: &mut LeadDataDelta, field: usize) {
    match field {
        0 => delta.name = Some("Nombre".into()),
        1 => delta.phone = Some("600000000".into()),
        2 => delta.email = Some("a@b.pe".into()),
        3 => delta.budget_max = Some(250_000),
        4 => delta.zone = Some("San Borja".into()),
        5 => delta.bedrooms = Some(2),
        6 => delta.interested_property = Some("prop-003".into()),
        7 => delta.wants_visit = Some(true),
        _ => delta.property_type = Some("casa".into()),
    }
}

proptest! {
    #[test]
    fn score_is_monotonic_and_bounded(
        fields in proptest::collection::vec(arb_field(), 0..12),
        messages in 0usize..6,
    ) {
        let policy = ScoringPolicy::default();
        let mut delta = LeadDataDelta::default();
        let mut previous = policy.score(&delta, messages);
        for field in fields {
            apply(&mut delta, field);
            let score = policy.score(&delta, messages);
            prop_assert!(score >= previous);
            prop_assert!(score <= 100);
            previous = score;
        }
    }
}
