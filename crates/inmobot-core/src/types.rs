// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by every InmoBot crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    Catalog,
    LeadStore,
    Speech,
}

// --- Conversation types ---

/// The medium a conversation happens on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Channel {
    /// Browser chat widget.
    Web,
    /// Messaging-platform webhook.
    Telegram,
    /// Phone or in-browser voice call.
    Voice,
}

impl Channel {
    /// All channels, in display order.
    pub const ALL: [Channel; 3] = [Channel::Web, Channel::Telegram, Channel::Voice];

    pub fn is_voice(self) -> bool {
        self == Channel::Voice
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Raw JSON arguments exactly as the model produced them.
    pub arguments: String,
}

/// One entry in a session's conversation history.
///
/// Assistant turns that request tools carry `tool_calls`; the tool-result
/// turns that follow carry the matching `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// An assistant turn recording the model's tool-call requests.
    pub fn tool_request(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// The answer to one tool call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Text content, or the empty string.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Number of user-authored turns in a history.
pub fn count_user_turns(history: &[ConversationTurn]) -> usize {
    history.iter().filter(|t| t.role == Role::User).count()
}

// --- Catalog types ---

/// Property category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum PropertyType {
    #[serde(alias = "house")]
    #[strum(to_string = "casa", serialize = "house")]
    Casa,
    #[serde(alias = "apartment", alias = "apartamento", alias = "depa")]
    #[strum(
        to_string = "departamento",
        serialize = "apartment",
        serialize = "apartamento"
    )]
    Departamento,
}

/// Whether a property is offered for sale or for rent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Objective {
    #[default]
    #[serde(alias = "sale")]
    #[strum(to_string = "venta", serialize = "sale")]
    Venta,
    #[serde(alias = "rent", alias = "rental")]
    #[strum(to_string = "alquiler", serialize = "rent", serialize = "rental")]
    Alquiler,
}

/// A read-only catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub zone: String,
    #[serde(rename = "type", alias = "property_type")]
    pub property_type: PropertyType,
    pub price: u64,
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub objective: Objective,
    /// Free-form price qualifier, e.g. "mensual" for rentals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<String>,
}

// --- Lead types ---

/// How soon the prospect intends to move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Urgency {
    #[serde(rename = "immediate", alias = "inmediato")]
    #[strum(to_string = "immediate", serialize = "inmediato")]
    Immediate,
    #[serde(rename = "1-3mo", alias = "1-3 meses")]
    #[strum(to_string = "1-3mo", serialize = "1-3 meses")]
    OneToThreeMonths,
    #[serde(rename = "3-6mo", alias = "3-6 meses")]
    #[strum(to_string = "3-6mo", serialize = "3-6 meses")]
    ThreeToSixMonths,
    #[serde(rename = "exploring", alias = "explorando", alias = "solo explorando")]
    #[strum(
        to_string = "exploring",
        serialize = "explorando",
        serialize = "solo explorando"
    )]
    Exploring,
}

/// Sales lifecycle of a lead.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LeadStatus {
    #[default]
    #[serde(alias = "nuevo")]
    New,
    Contacted,
    Qualified,
    VisitScheduled,
    Won,
    Lost,
}

/// Qualification tier derived from the score.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Temperature {
    #[default]
    #[serde(alias = "frío", alias = "frio")]
    Cold,
    #[serde(alias = "tibio")]
    Warm,
    #[serde(alias = "caliente")]
    Hot,
}

/// A sparse set of lead attributes captured during a conversation.
///
/// Absent, blank and zero values all count as "unknown" and never overwrite
/// a known value when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadDataDelta {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub budget_min: Option<u64>,
    pub budget_max: Option<u64>,
    pub zone: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub urgency: Option<Urgency>,
    pub interested_property: Option<String>,
    pub wants_visit: Option<bool>,
}

fn merge_text(target: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming
        && !value.trim().is_empty()
    {
        *target = Some(value.trim().to_string());
    }
}

fn merge_number<T: Copy + Default + PartialEq>(target: &mut Option<T>, incoming: &Option<T>) {
    if let Some(value) = incoming
        && *value != T::default()
    {
        *target = Some(*value);
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn has_number<T: Copy + Default + PartialEq>(value: &Option<T>) -> bool {
    value.is_some_and(|v| v != T::default())
}

impl LeadDataDelta {
    /// Copies every known value of `other` into `self`.
    pub fn merge(&mut self, other: &LeadDataDelta) {
        merge_text(&mut self.name, &other.name);
        merge_text(&mut self.phone, &other.phone);
        merge_text(&mut self.email, &other.email);
        merge_number(&mut self.budget_min, &other.budget_min);
        merge_number(&mut self.budget_max, &other.budget_max);
        merge_text(&mut self.zone, &other.zone);
        merge_text(&mut self.property_type, &other.property_type);
        merge_number(&mut self.bedrooms, &other.bedrooms);
        if other.urgency.is_some() {
            self.urgency = other.urgency;
        }
        merge_text(&mut self.interested_property, &other.interested_property);
        if other.wants_visit.is_some() {
            self.wants_visit = other.wants_visit;
        }
    }

    /// Names of the fields holding a truthy value, in schema order.
    pub fn saved_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("name", has_text(&self.name)),
            ("phone", has_text(&self.phone)),
            ("email", has_text(&self.email)),
            ("budget_min", has_number(&self.budget_min)),
            ("budget_max", has_number(&self.budget_max)),
            ("zone", has_text(&self.zone)),
            ("property_type", has_text(&self.property_type)),
            ("bedrooms", has_number(&self.bedrooms)),
            ("urgency", self.urgency.is_some()),
            ("interested_property", has_text(&self.interested_property)),
            ("wants_visit", self.wants_visit == Some(true)),
        ];
        checks
            .into_iter()
            .filter_map(|(field, present)| present.then_some(field))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.saved_fields().is_empty() && self.wants_visit.is_none()
    }

    pub fn has_name(&self) -> bool {
        has_text(&self.name)
    }

    pub fn has_phone(&self) -> bool {
        has_text(&self.phone)
    }

    pub fn has_email(&self) -> bool {
        has_text(&self.email)
    }

    pub fn has_budget(&self) -> bool {
        has_number(&self.budget_min) || has_number(&self.budget_max)
    }

    pub fn has_zone(&self) -> bool {
        has_text(&self.zone)
    }

    pub fn has_property_preference(&self) -> bool {
        has_text(&self.property_type) || has_number(&self.bedrooms)
    }

    pub fn has_interested_property(&self) -> bool {
        has_text(&self.interested_property)
    }
}

/// Keys a caller can offer for matching an interaction to an existing lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadIdentity {
    pub session_id: Option<String>,
    pub platform_username: Option<String>,
    pub chat_id: Option<String>,
}

impl LeadIdentity {
    /// Identity carrying only a session id.
    pub fn session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.platform_username = Some(username.into());
        self
    }

    pub fn with_chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }
}

/// The durable lead aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub channel: Channel,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, alias = "telegram_username")]
    pub platform_username: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    /// Other sessions already resolved to this lead.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_sessions: Vec<String>,
    #[serde(flatten)]
    pub data: LeadDataDelta,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub score: u8,
    #[serde(default)]
    pub temperature: Temperature,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// A blank lead for `identity`, stamped at `now`.
    pub fn new(
        id: String,
        channel: Channel,
        identity: &LeadIdentity,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            channel,
            session_id: identity.session_id.clone(),
            platform_username: identity.platform_username.clone(),
            chat_id: identity.chat_id.clone(),
            linked_sessions: Vec::new(),
            data: LeadDataDelta::default(),
            status: LeadStatus::New,
            score: 0,
            temperature: Temperature::Cold,
            message_count: 0,
            conversation_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True if `session_id` is this lead's own or a linked session.
    pub fn owns_session(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
            || self.linked_sessions.iter().any(|s| s == session_id)
    }
}

// --- Completion types ---

/// A function the model may call, in provider-neutral form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// Whether the model may call tools in this round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
}

/// A request to an LLM completion provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub messages: Vec<ConversationTurn>,
    /// Empty when tools are disabled for the round.
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token accounting for a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completion provider's answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<TokenUsage>,
}

// --- Speech types ---

/// Voice selection for speech synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceParams {
    /// Backend-specific voice or model name; `None` uses the backend default.
    pub voice: Option<String>,
    pub speed: Option<f32>,
}

/// Audio produced by a synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// A selectable synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    pub id: &'static str,
    pub label: &'static str,
}
