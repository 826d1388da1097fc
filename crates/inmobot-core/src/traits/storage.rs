// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for the property catalog and the lead collection.

use async_trait::async_trait;

use crate::error::InmobotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Lead, Property};

/// Read-only source of catalog properties.
///
/// Missing backing data yields an empty list, not an error.
#[async_trait]
pub trait CatalogStore: PluginAdapter {
    /// Returns every property in catalog order.
    async fn list_properties(&self) -> Result<Vec<Property>, InmobotError>;
}

/// Whole-collection persistence for leads.
///
/// Every write replaces the full collection. Missing or malformed backing
/// data loads as an empty collection.
#[async_trait]
pub trait LeadStore: PluginAdapter {
    async fn load(&self) -> Result<Vec<Lead>, InmobotError>;

    async fn save(&self, leads: &[Lead]) -> Result<(), InmobotError>;
}
