use super::{ConfigurationRecord, ConfigurationStore, Result};
use crate::error::StoreError;
use ahash::AHashMap;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

type Key = (String, String);

/// Thread-safe in-memory configuration store.
///
/// Ids are sequential numeric strings shared across components, versions
/// start at 1 and grow by one on each update. Nothing survives a restart.
#[derive(Clone)]
pub struct InMemoryConfigurationStore {
    records: Arc<RwLock<AHashMap<Key, ConfigurationRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryConfigurationStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(AHashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryConfigurationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(component_id: &str, configuration_id: &str) -> StoreError {
    StoreError::NotFound {
        component_id: component_id.to_string(),
        configuration_id: configuration_id.to_string(),
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn create(
        &self,
        component_id: &str,
        name: &str,
        description: &str,
        configuration: Value,
    ) -> Result<ConfigurationRecord> {
        let configuration_id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let now = Utc::now();
        let record = ConfigurationRecord {
            component_id: component_id.to_string(),
            configuration_id: configuration_id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            change_description: "Configuration created".to_string(),
            version: 1,
            configuration,
            created: now,
            updated: now,
        };

        let mut records = self.records.write().await;
        records.insert((component_id.to_string(), configuration_id), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        component_id: &str,
        configuration_id: &str,
        name: &str,
        description: &str,
        change_description: &str,
        configuration: Value,
    ) -> Result<ConfigurationRecord> {
        let mut records = self.records.write().await;
        let key = (component_id.to_string(), configuration_id.to_string());
        let record = records
            .get_mut(&key)
            .ok_or_else(|| not_found(component_id, configuration_id))?;

        record.name = name.to_string();
        record.description = description.to_string();
        record.change_description = change_description.to_string();
        record.configuration = configuration;
        record.version += 1;
        record.updated = Utc::now();
        Ok(record.clone())
    }

    async fn get(
        &self,
        component_id: &str,
        configuration_id: &str,
    ) -> Result<ConfigurationRecord> {
        let records = self.records.read().await;
        records
            .get(&(component_id.to_string(), configuration_id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(component_id, configuration_id))
    }

    async fn list(&self, component_id: &str) -> Result<Vec<ConfigurationRecord>> {
        let records = self.records.read().await;
        let mut found: Vec<ConfigurationRecord> = records
            .values()
            .filter(|record| record.component_id == component_id)
            .cloned()
            .collect();
        found.sort_by_key(|record| record.configuration_id.parse::<u64>().unwrap_or(u64::MAX));
        Ok(found)
    }
}
