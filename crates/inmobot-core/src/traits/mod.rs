// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for InmoBot's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod provider;
pub mod speech;
pub mod storage;

pub use adapter::PluginAdapter;
pub use provider::CompletionProvider;
pub use speech::SpeechProvider;
pub use storage::{CatalogStore, LeadStore};
