// SPDX-FileCopyrightText: 2026 InmoBot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file implementations of the catalog and lead stores.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use inmobot_config::model::StorageConfig;
use inmobot_core::types::{AdapterType, HealthStatus, Lead, Property};
use inmobot_core::{CatalogStore, InmobotError, LeadStore, PluginAdapter};

/// Reads a JSON array file.
///
/// A missing or malformed file yields an empty list. Other I/O failures are
/// returned to the caller.
async fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, InmobotError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(InmobotError::storage(e)),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    match serde_json::from_slice(&bytes) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed store file, treating as empty");
            Ok(Vec::new())
        }
    }
}

fn file_health(path: &Path) -> HealthStatus {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            HealthStatus::Degraded(format!("directory {} does not exist yet", dir.display()))
        }
        _ => HealthStatus::Healthy,
    }
}

/// Lead collection persisted as a pretty-printed JSON array.
///
/// Saves go through a sibling temp file and a rename, so readers never see
/// a half-written collection.
pub struct JsonLeadStore {
    path: PathBuf,
}

impl JsonLeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.leads_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PluginAdapter for JsonLeadStore {
    fn name(&self) -> &str {
        "json-leads"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::LeadStore
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        Ok(file_health(&self.path))
    }
}

#[async_trait]
impl LeadStore for JsonLeadStore {
    async fn load(&self) -> Result<Vec<Lead>, InmobotError> {
        read_json_array(&self.path).await
    }

    async fn save(&self, leads: &[Lead]) -> Result<(), InmobotError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(InmobotError::storage)?;
        }

        let body = serde_json::to_vec_pretty(leads).map_err(InmobotError::storage)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(InmobotError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(InmobotError::storage)?;

        debug!(path = %self.path.display(), count = leads.len(), "leads saved");
        Ok(())
    }
}

/// Property catalog read once from a JSON array file and cached.
pub struct JsonCatalogStore {
    path: PathBuf,
    cache: OnceCell<Vec<Property>>,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceCell::new(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.properties_path)
    }
}

#[async_trait]
impl PluginAdapter for JsonCatalogStore {
    fn name(&self) -> &str {
        "json-catalog"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Catalog
    }

    async fn health_check(&self) -> Result<HealthStatus, InmobotError> {
        if self.path.exists() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded(format!(
                "catalog file {} not found, catalog is empty",
                self.path.display()
            )))
        }
    }
}

#[async_trait]
impl CatalogStore for JsonCatalogStore {
    async fn list_properties(&self) -> Result<Vec<Property>, InmobotError> {
        let properties = self
            .cache
            .get_or_try_init(|| async {
                let properties: Vec<Property> = read_json_array(&self.path).await?;
                debug!(count = properties.len(), "catalog loaded");
                Ok::<_, InmobotError>(properties)
            })
            .await?;
        Ok(properties.clone())
    }
}
