// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Chat Completions provider for InmoBot.
//!
//! This crate implements [`CompletionProvider`] over `POST /chat/completions`
//! with function calling. Each call is a single round trip.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use inmobot_config::InmobotConfig;
use inmobot_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage, ToolChoice,
};
use inmobot_core::{
    CompletionProvider, ConversationTurn, InmobotError, PluginAdapter, Role, ToolCall,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{
    ChatMessage, ChatRequest, ChatTool, ChatToolCall, FunctionCall, FunctionDefinition,
};

/// OpenAI provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> unavailable.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `[openai]` config section.
    pub fn new(config: &InmobotConfig) -> Result<Self, InmobotError> {
        let api_key = resolve_api_key(&config.openai.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            config.openai.model.clone(),
            &config.openai.base_url,
            Duration::from_secs(config.openai.timeout_secs),
        )?;

        info!(model = config.openai.model, "OpenAI provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    /// Converts a [`CompletionRequest`] into the chat wire format.
    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system_instruction.is_empty() {
            messages.push(ChatMessage::text("system", &request.system_instruction));
        }
        messages.extend(request.messages.iter().map(convert_turn));

        let tools = (!request.tools.is_empty()).then(|| {
            request
                .tools
                .iter()
                .map(|tool| ChatTool {
                    tool_type: "function",
                    function: FunctionDefinition {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    },
                })
                .collect::<Vec<_>>()
        });
        let tool_choice = tools.as_ref().map(|_| match request.tool_choice {
            ToolChoice::Auto => "auto".to_string(),
            ToolChoice::None => "none".to_string(),
        });

        ChatRequest {
            model: self.client.default_model().to_string(),
            messages,
            tools,
            tool_choice,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        // Constructing the client proves the key is present; a real call
        // would spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, InmobotError> {
        let chat_request = self.to_chat_request(&request);
        let response = self.client.complete_chat(&chat_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InmobotError::Provider {
                message: "response contained no choices".into(),
                source: None,
            })?;
        debug!(
            id = response.id.as_deref().unwrap_or_default(),
            finish_reason = choice.finish_reason.as_deref().unwrap_or_default(),
            "completion choice received"
        );

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments,
            })
            .collect();

        Ok(CompletionResponse {
            content: choice.message.content.filter(|c| !c.trim().is_empty()),
            tool_calls,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, InmobotError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            InmobotError::Unavailable(
                "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
            )
        })
}

fn convert_turn(turn: &ConversationTurn) -> ChatMessage {
    match turn.role {
        Role::User => ChatMessage::text("user", turn.text()),
        Role::Assistant if !turn.tool_calls.is_empty() => ChatMessage {
            role: "assistant".into(),
            content: turn.content.clone(),
            tool_calls: Some(
                turn.tool_calls
                    .iter()
                    .map(|call| ChatToolCall {
                        id: call.id.clone(),
                        call_type: "function".into(),
                        function: FunctionCall {
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        },
                    })
                    .collect(),
            ),
            tool_call_id: None,
        },
        Role::Assistant => ChatMessage::text("assistant", turn.text()),
        Role::Tool => ChatMessage {
            role: "tool".into(),
            content: Some(turn.text().to_string()),
            tool_calls: None,
            tool_call_id: turn.tool_call_id.clone(),
        },
    }
}
