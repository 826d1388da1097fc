// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for InmoBot, the real-estate lead qualification assistant.
//!
//! This crate provides the error type, the domain types (conversation
//! turns, catalog properties, leads) and the adapter traits implemented by
//! the completion provider, the stores and the speech backends.

pub mod error;
pub mod traits;
pub mod types;

pub use error::InmobotError;
pub use types::{
    AdapterType, Channel, ConversationTurn, HealthStatus, Lead, LeadDataDelta, LeadIdentity,
    LeadStatus, Property, Role, Temperature, ToolCall, Urgency,
};

pub use traits::{CatalogStore, CompletionProvider, LeadStore, PluginAdapter, SpeechProvider};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::types::{Objective, PropertyType};
    use proptest::prelude::*;

    #[test]
    fn inmobot_error_has_all_variants() {
        let _config = InmobotError::Config("test".into());
        let _storage = InmobotError::storage(std::io::Error::other("test"));
        let _provider = InmobotError::Provider {
            message: "test".into(),
            source: None,
        };
        let _speech = InmobotError::Speech {
            message: "test".into(),
            source: None,
        };
        let _tool = InmobotError::ToolArguments {
            tool: "save_lead_info".into(),
            message: "expected object".into(),
        };
        let not_found = InmobotError::NotFound {
            kind: "lead",
            id: "abc".into(),
        };
        assert_eq!(not_found.to_string(), "lead not found: abc");
        assert!(InmobotError::Unavailable("no key".into()).is_unavailable());
        assert!(!InmobotError::Internal("bug".into()).is_unavailable());
    }

    #[test]
    fn channel_display_and_parse() {
        for channel in Channel::ALL {
            let parsed = Channel::from_str(&channel.to_string()).expect("should parse back");
            assert_eq!(parsed, channel);
        }
        assert_eq!(Channel::from_str("VOICE").unwrap(), Channel::Voice);
        assert_eq!(serde_json::to_string(&Channel::Telegram).unwrap(), "\"telegram\"");
    }

    #[test]
    fn urgency_accepts_spanish_and_english() {
        assert_eq!(Urgency::from_str("inmediato").unwrap(), Urgency::Immediate);
        assert_eq!(Urgency::from_str("1-3 meses").unwrap(), Urgency::OneToThreeMonths);
        assert_eq!(Urgency::from_str("3-6mo").unwrap(), Urgency::ThreeToSixMonths);
        assert_eq!(Urgency::from_str("Explorando").unwrap(), Urgency::Exploring);
        let parsed: Urgency = serde_json::from_str("\"1-3 meses\"").unwrap();
        assert_eq!(parsed, Urgency::OneToThreeMonths);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"1-3mo\"");
    }

    #[test]
    fn property_parses_catalog_json() {
        let json = r#"{
            "id": "prop-001",
            "title": "Departamento moderno en Miraflores",
            "zone": "Miraflores",
            "type": "departamento",
            "price": 250000,
            "bedrooms": 3,
            "bathrooms": 2,
            "area": 120,
            "description": "Vista al mar",
            "features": ["Piscina", "Gimnasio"]
        }"#;
        let prop: Property = serde_json::from_str(json).unwrap();
        assert_eq!(prop.property_type, PropertyType::Departamento);
        assert_eq!(prop.objective, Objective::Venta);
        assert_eq!(prop.area, 120.0);
        assert!(prop.price_type.is_none());

        let rental = r#"{"id":"r1","title":"Casa","zone":"Surco","type":"house",
            "price":1800,"bedrooms":4,"objective":"rent","price_type":"mensual"}"#;
        let prop: Property = serde_json::from_str(rental).unwrap();
        assert_eq!(prop.property_type, PropertyType::Casa);
        assert_eq!(prop.objective, Objective::Alquiler);
    }

    #[test]
    fn merge_never_blanks_known_values() {
        let mut lead = LeadDataDelta {
            name: Some("Juan".into()),
            phone: Some("600123456".into()),
            budget_max: Some(300_000),
            ..LeadDataDelta::default()
        };
        let incoming = LeadDataDelta {
            name: Some("  ".into()),
            phone: None,
            budget_max: Some(0),
            email: Some("juan@example.com".into()),
            ..LeadDataDelta::default()
        };
        lead.merge(&incoming);
        assert_eq!(lead.name.as_deref(), Some("Juan"));
        assert_eq!(lead.phone.as_deref(), Some("600123456"));
        assert_eq!(lead.budget_max, Some(300_000));
        assert_eq!(lead.email.as_deref(), Some("juan@example.com"));
    }

    #[test]
    fn saved_fields_skip_falsy_values() {
        let delta = LeadDataDelta {
            name: Some("Ana".into()),
            email: Some(String::new()),
            bedrooms: Some(0),
            wants_visit: Some(false),
            ..LeadDataDelta::default()
        };
        assert_eq!(delta.saved_fields(), vec!["name"]);
        assert!(!delta.is_empty());
        assert!(LeadDataDelta::default().is_empty());
    }

    #[test]
    fn lead_reads_legacy_records() {
        let json = r#"{
            "id": "lead-1",
            "channel": "telegram",
            "telegram_username": "juanp",
            "name": "Juan",
            "status": "nuevo",
            "score": 55,
            "temperature": "tibio",
            "conversation_history": [{"role": "user", "content": "Hola"}],
            "created_at": "2026-01-05T10:00:00Z",
            "updated_at": "2026-01-05T10:05:00Z"
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.platform_username.as_deref(), Some("juanp"));
        assert_eq!(lead.data.name.as_deref(), Some("Juan"));
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.temperature, Temperature::Warm);
        assert!(!lead.owns_session("x"));
    }

    #[test]
    fn count_user_turns_ignores_tool_traffic() {
        let history = vec![
            ConversationTurn::user("Hola"),
            ConversationTurn::tool_request(
                None,
                vec![ToolCall {
                    id: "call_1".into(),
                    name: "show_catalog".into(),
                    arguments: "{}".into(),
                }],
            ),
            ConversationTurn::tool_result("call_1", "Catálogo"),
            ConversationTurn::assistant("Aquí tienes"),
            ConversationTurn::user("Gracias"),
        ];
        assert_eq!(types::count_user_turns(&history), 2);
    }

    fn arb_text() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            "[a-z]{1,8}".prop_map(Some),
        ]
    }

    fn arb_delta() -> impl Strategy<Value = LeadDataDelta> {
        (arb_text(), arb_text(), arb_text(), proptest::option::of(0u64..500_000))
            .prop_map(|(name, phone, zone, budget_max)| LeadDataDelta {
                name,
                phone,
                zone,
                budget_max,
                ..LeadDataDelta::default()
            })
    }

    proptest! {
        #[test]
        fn merge_is_monotonic(base in arb_delta(), incoming in arb_delta()) {
            let before = base.saved_fields();
            let mut merged = base.clone();
            merged.merge(&incoming);
            let after = merged.saved_fields();
            for field in before {
                prop_assert!(after.contains(&field), "lost {field}");
            }
        }
    }
}
