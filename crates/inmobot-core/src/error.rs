// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for InmoBot.

use thiserror::Error;

/// The primary error type used across all InmoBot adapter traits and core operations.
///
/// Public conversation entry points never return this type to the end user;
/// they log it and degrade to a usable reply instead.
#[derive(Debug, Error)]
pub enum InmobotError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Lead or catalog store failures (I/O, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM completion provider errors (HTTP failure, bad status, bad payload).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Speech-to-text or text-to-speech backend errors.
    #[error("speech error: {message}")]
    Speech {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external service is not configured or cannot be reached at all.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The model produced tool arguments that could not be parsed.
    #[error("malformed arguments for tool `{tool}`: {message}")]
    ToolArguments { tool: String, message: String },

    /// A requested record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl InmobotError {
    /// Wraps any error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true for failures the user-facing layers treat as "service down".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Provider { .. } | Self::Speech { .. }
        )
    }
}
