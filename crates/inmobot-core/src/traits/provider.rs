// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait for function-calling LLM backends.

use async_trait::async_trait;

use crate::error::InmobotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for a chat-completion service with tool calling.
///
/// Implementations perform exactly one round trip per call. Retrying is the
/// caller's decision, and the conversation layer never retries.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, InmobotError>;
}
