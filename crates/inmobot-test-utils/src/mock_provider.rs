// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockCompletionProvider` implements `CompletionProvider` with scripted
//! responses and records every request it receives, so tests can assert
//! on both sides of the two-round protocol without network access.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use inmobot_core::types::{
    AdapterType, CompletionRequest, CompletionResponse, HealthStatus, TokenUsage,
};
use inmobot_core::{CompletionProvider, InmobotError, PluginAdapter, ToolCall};

/// A scripted completion provider.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned.
pub struct MockCompletionProvider {
    outcomes: Arc<Mutex<VecDeque<Result<CompletionResponse, InmobotError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionProvider {
    /// Create a mock provider with an empty queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with plain text replies.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcomes = texts.into_iter().map(|t| Ok(text_response(t))).collect();
        Self {
            outcomes: Arc::new(Mutex::new(outcomes)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_response(&self, response: CompletionResponse) {
        self.outcomes.lock().await.push_back(Ok(response));
    }

    pub async fn push_text(&self, text: impl Into<String>) {
        self.push_response(text_response(text)).await;
    }

    /// Queue a round-1 response that calls tools and carries no text.
    pub async fn push_tool_calls(&self, calls: Vec<ToolCall>) {
        self.push_response(tool_call_response(calls)).await;
    }

    /// Queue a failure for the next call.
    pub async fn push_error(&self, error: InmobotError) {
        self.outcomes.lock().await.push_back(Err(error));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of scripted outcomes not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.outcomes.lock().await.len()
    }

    async fn next_outcome(&self) -> Result<CompletionResponse, InmobotError> {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("mock response")))
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// A text-only response with nominal usage.
pub fn text_response(text: impl Into<String>) -> CompletionResponse {
    CompletionResponse {
        content: Some(text.into()),
        tool_calls: Vec::new(),
        usage: Some(TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        }),
    }
}

pub fn tool_call_response(calls: Vec<ToolCall>) -> CompletionResponse {
    CompletionResponse {
        content: None,
        tool_calls: calls,
        usage: Some(TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        }),
    }
}

/// Shorthand for building a [`ToolCall`].
pub fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

#[async_trait]
impl PluginAdapter for MockCompletionProvider {
    fn name(&self) -> &str {
        "mock-completion"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, InmobotError> {
        self.requests.lock().await.push(request);
        self.next_outcome().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inmobot_core::types::ToolChoice;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instruction: String::new(),
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
            max_tokens: 100,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn fifo_then_default() {
        let provider = MockCompletionProvider::with_texts(["uno", "dos"]);
        provider.push_error(InmobotError::Internal("boom".into())).await;

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("uno"));
        let second = provider.complete(request()).await.unwrap();
        assert_eq!(second.content.as_deref(), Some("dos"));
        assert!(provider.complete(request()).await.is_err());
        let fallback = provider.complete(request()).await.unwrap();
        assert_eq!(fallback.content.as_deref(), Some("mock response"));

        assert_eq!(provider.requests().await.len(), 4);
        assert_eq!(provider.remaining().await, 0);
    }
}
