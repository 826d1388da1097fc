// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for the InmoBot property catalog and lead collection.
//!
//! The JSON stores read and write whole files, matching the load-merge-save
//! contract of [`LeadStore`](inmobot_core::LeadStore). The in-memory stores
//! back tests and ephemeral sessions.

pub mod json;
pub mod memory;

pub use json::{JsonCatalogStore, JsonLeadStore};
pub use memory::{MemoryLeadStore, StaticCatalog};
