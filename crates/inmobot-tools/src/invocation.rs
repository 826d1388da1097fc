// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed parsing of the model's raw tool-call arguments.
//!
//! Models are sloppy with JSON types: numbers arrive as strings
//! (`"250,000"`), booleans as `"sí"`, and keys in camelCase. Parsing here
//! accepts all of those and drops values it cannot interpret rather than
//! rejecting the whole call.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use inmobot_core::{InmobotError, LeadDataDelta, Urgency};

use crate::kind::ToolKind;
use crate::search::SearchCriteria;

/// A validated tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    ShowCatalog,
    SearchProperties(SearchCriteria),
    SaveLeadInfo(LeadDataDelta),
}

impl ToolInvocation {
    /// Parses a raw call.
    ///
    /// `show_catalog` takes no arguments, so its arguments are never
    /// inspected. An empty argument string is read as `{}`.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, InmobotError> {
        let kind = ToolKind::from_str(name).map_err(|_| InmobotError::ToolArguments {
            tool: name.to_string(),
            message: "unknown tool".into(),
        })?;

        match kind {
            ToolKind::ShowCatalog => Ok(Self::ShowCatalog),
            ToolKind::SearchProperties => {
                let args: SearchArgs = parse_object(name, arguments)?;
                Ok(Self::SearchProperties(args.into()))
            }
            ToolKind::SaveLeadInfo => {
                let args: SaveLeadArgs = parse_object(name, arguments)?;
                Ok(Self::SaveLeadInfo(args.into()))
            }
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ShowCatalog => ToolKind::ShowCatalog,
            Self::SearchProperties(_) => ToolKind::SearchProperties,
            Self::SaveLeadInfo(_) => ToolKind::SaveLeadInfo,
        }
    }
}

fn parse_object<T: for<'de> Deserialize<'de>>(
    tool: &str,
    arguments: &str,
) -> Result<T, InmobotError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    let value: Value = serde_json::from_str(raw).map_err(|e| InmobotError::ToolArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(InmobotError::ToolArguments {
            tool: tool.to_string(),
            message: "expected a JSON object".into(),
        });
    }
    serde_json::from_value(value).map_err(|e| InmobotError::ToolArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchArgs {
    #[serde(deserialize_with = "lenient_string")]
    zone: Option<String>,
    #[serde(alias = "propertyType", alias = "type", deserialize_with = "lenient_string")]
    property_type: Option<String>,
    #[serde(alias = "maxPrice", deserialize_with = "lenient_u64")]
    max_price: Option<u64>,
    #[serde(alias = "minBedrooms", deserialize_with = "lenient_u32")]
    min_bedrooms: Option<u32>,
}

impl From<SearchArgs> for SearchCriteria {
    fn from(args: SearchArgs) -> Self {
        SearchCriteria {
            zone: args.zone,
            property_type: args.property_type,
            max_price: args.max_price,
            min_bedrooms: args.min_bedrooms,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveLeadArgs {
    #[serde(deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    email: Option<String>,
    #[serde(alias = "budgetMin", deserialize_with = "lenient_u64")]
    budget_min: Option<u64>,
    #[serde(alias = "budgetMax", deserialize_with = "lenient_u64")]
    budget_max: Option<u64>,
    #[serde(deserialize_with = "lenient_string")]
    zone: Option<String>,
    #[serde(alias = "propertyType", deserialize_with = "lenient_string")]
    property_type: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    bedrooms: Option<u32>,
    #[serde(deserialize_with = "lenient_urgency")]
    urgency: Option<Urgency>,
    #[serde(alias = "interestedProperty", deserialize_with = "lenient_string")]
    interested_property: Option<String>,
    #[serde(alias = "wantsVisit", deserialize_with = "lenient_bool")]
    wants_visit: Option<bool>,
}

impl From<SaveLeadArgs> for LeadDataDelta {
    fn from(args: SaveLeadArgs) -> Self {
        LeadDataDelta {
            name: args.name,
            phone: args.phone,
            email: args.email,
            budget_min: args.budget_min,
            budget_max: args.budget_max,
            zone: args.zone,
            property_type: args.property_type,
            bedrooms: args.bedrooms,
            urgency: args.urgency,
            interested_property: args.interested_property,
            wants_visit: args.wants_visit,
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(number_from_value))
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(number_from_value)
        .and_then(|n| u32::try_from(n).ok()))
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "si" | "sí" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_urgency<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Urgency>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Urgency::from_str(s.trim()).ok(),
        _ => None,
    })
}

/// Reads a non-negative integer from a JSON number or a formatted string.
///
/// Strings may carry a currency prefix and `,` or `.` thousands separators.
fn number_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => parse_formatted_number(s),
        _ => None,
    }
}

fn parse_formatted_number(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    let cleaned = cleaned.trim_end_matches(|c: char| !c.is_ascii_digit());

    // "250.000" uses the dot as a thousands separator.
    let thousands_dots = cleaned
        .split('.')
        .skip(1)
        .all(|group| group.len() == 3)
        && cleaned.contains('.');
    if thousands_dots {
        return cleaned.replace('.', "").parse().ok();
    }
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| cleaned.parse::<f64>().ok().map(|f| f.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_catalog_ignores_garbage_arguments() {
        let parsed = ToolInvocation::parse("show_catalog", "{not json").unwrap();
        assert_eq!(parsed, ToolInvocation::ShowCatalog);
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = ToolInvocation::parse("drop_table", "{}").unwrap_err();
        assert!(matches!(err, InmobotError::ToolArguments { tool, .. } if tool == "drop_table"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(ToolInvocation::parse("save_lead_info", "{\"name\": ").is_err());
        assert!(ToolInvocation::parse("search_properties", "[1, 2]").is_err());
    }

    #[test]
    fn empty_arguments_mean_no_filters() {
        let parsed = ToolInvocation::parse("search_properties", "").unwrap();
        assert_eq!(
            parsed,
            ToolInvocation::SearchProperties(SearchCriteria::default())
        );
    }

    #[test]
    fn search_accepts_camel_case_and_string_numbers() {
        let parsed = ToolInvocation::parse(
            "search_properties",
            r#"{"zone": "Sol", "propertyType": "casa", "maxPrice": "$200,000", "minBedrooms": "3"}"#,
        )
        .unwrap();
        let ToolInvocation::SearchProperties(criteria) = parsed else {
            panic!("expected search");
        };
        assert_eq!(criteria.zone.as_deref(), Some("Sol"));
        assert_eq!(criteria.property_type.as_deref(), Some("casa"));
        assert_eq!(criteria.max_price, Some(200_000));
        assert_eq!(criteria.min_bedrooms, Some(3));
    }

    #[test]
    fn save_lead_is_lenient_per_field() {
        let parsed = ToolInvocation::parse(
            "save_lead_info",
            r#"{"name": "Juan", "phone": 600123456, "budget_max": "250.000",
                "urgency": "1-3 meses", "wantsVisit": "sí", "bedrooms": "muchas"}"#,
        )
        .unwrap();
        let ToolInvocation::SaveLeadInfo(delta) = parsed else {
            panic!("expected save");
        };
        assert_eq!(delta.name.as_deref(), Some("Juan"));
        assert_eq!(delta.phone.as_deref(), Some("600123456"));
        assert_eq!(delta.budget_max, Some(250_000));
        assert_eq!(delta.urgency, Some(Urgency::OneToThreeMonths));
        assert_eq!(delta.wants_visit, Some(true));
        assert_eq!(delta.bedrooms, None);
    }

    #[test]
    fn formatted_numbers() {
        assert_eq!(parse_formatted_number("250000"), Some(250_000));
        assert_eq!(parse_formatted_number("US$ 1,200,000"), Some(1_200_000));
        assert_eq!(parse_formatted_number("180.000"), Some(180_000));
        assert_eq!(parse_formatted_number("2.5"), Some(3));
        assert_eq!(parse_formatted_number("sin tope"), None);
    }
}
