//! Persistence of flow configurations.
//!
//! The real backend is the platform's storage API, reached through an HTTP
//! client that lives outside this crate. [`ConfigurationStore`] is the seam it
//! plugs into; [`InMemoryConfigurationStore`] backs tests and local tooling.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod memory;

pub use memory::InMemoryConfigurationStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A stored component configuration as the storage API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord {
    pub component_id: String,
    #[serde(alias = "id")]
    pub configuration_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub change_description: String,
    pub version: u32,
    /// The wire configuration, `{"phases": [...], "tasks": [...]}`.
    pub configuration: Value,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    async fn create(
        &self,
        component_id: &str,
        name: &str,
        description: &str,
        configuration: Value,
    ) -> Result<ConfigurationRecord>;

    async fn update(
        &self,
        component_id: &str,
        configuration_id: &str,
        name: &str,
        description: &str,
        change_description: &str,
        configuration: Value,
    ) -> Result<ConfigurationRecord>;

    /// Fails with [`StoreError::NotFound`] when the configuration does not exist.
    async fn get(&self, component_id: &str, configuration_id: &str)
    -> Result<ConfigurationRecord>;

    async fn list(&self, component_id: &str) -> Result<Vec<ConfigurationRecord>>;
}
