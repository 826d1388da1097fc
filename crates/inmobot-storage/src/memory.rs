// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use inmobot_core::types::{AdapterType, HealthStatus, Lead, Property};
use inmobot_core::{CatalogStore, InmobotError, LeadStore, PluginAdapter};

/// Lead store that keeps the collection in process memory.
#[derive(Clone, Default)]
pub struct MemoryLeadStore {
    leads: Arc<RwLock<Vec<Lead>>>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, for assertions.
    pub async fn snapshot(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryLeadStore {
    fn name(&self) -> &str {
        "memory-leads"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LeadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn load(&self) -> Result<Vec<Lead>, InmobotError> {
        Ok(self.leads.read().await.clone())
    }

    async fn save(&self, leads: &[Lead]) -> Result<(), InmobotError> {
        *self.leads.write().await = leads.to_vec();
        Ok(())
    }
}

/// A fixed catalog supplied at construction.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    properties: Arc<Vec<Property>>,
}

impl StaticCatalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: Arc::new(properties),
        }
    }
}

#[async_trait]
impl PluginAdapter for StaticCatalog {
    fn name(&self) -> &str {
        "static-catalog"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Catalog
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CatalogStore for StaticCatalog {
    async fn list_properties(&self) -> Result<Vec<Property>, InmobotError> {
        Ok(self.properties.as_ref().clone())
    }
}
