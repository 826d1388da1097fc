// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for InmoBot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockCompletionProvider`] - Scripted completion provider that records requests
//! - [`MockSpeech`] - Scripted speech backend
//! - [`FailingLeadStore`] - Lead store whose every call fails
//! - [`TestHarness`] - A full `AgentService` over the mocks

pub mod fixtures;
pub mod harness;
pub mod mock_provider;

pub use fixtures::{FailingLeadStore, MockSpeech, fixture_catalog};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{
    MockCompletionProvider, text_response, tool_call, tool_call_response,
};
