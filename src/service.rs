//! Flow operations as exposed to the tool layer.
//!
//! Every write goes through [`FlowCompiler`] first, so a configuration that
//! reaches the store has always passed validation.

use crate::compiler::FlowCompiler;
use crate::error::{ServiceError, StoreError};
use crate::flow::{FlowDefinition, FlowType};
use crate::store::{ConfigurationRecord, ConfigurationStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Returned by every flow write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowToolResponse {
    #[serde(alias = "id")]
    pub flow_id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub version: u32,
}

/// A stored flow parsed back into typed phases and tasks.
#[derive(Debug, Clone)]
pub struct Flow {
    pub flow_type: FlowType,
    pub configuration_id: String,
    pub name: String,
    pub description: String,
    pub version: u32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub definition: FlowDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub flow_type: FlowType,
    pub configuration_id: String,
    pub name: String,
    pub description: String,
    pub version: u32,
    pub phases_count: usize,
    pub tasks_count: usize,
    pub updated: DateTime<Utc>,
}

impl FlowSummary {
    fn from_record(flow_type: FlowType, record: &ConfigurationRecord) -> Self {
        let count = |key: &str| {
            record
                .configuration
                .get(key)
                .and_then(Value::as_array)
                .map_or(0, Vec::len)
        };
        Self {
            flow_type,
            configuration_id: record.configuration_id.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
            version: record.version,
            phases_count: count("phases"),
            tasks_count: count("tasks"),
            updated: record.updated,
        }
    }
}

pub struct FlowService<S> {
    store: S,
}

impl<S: ConfigurationStore> FlowService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a legacy (`keboola.orchestrator`) flow.
    pub async fn create_flow(
        &self,
        name: &str,
        description: &str,
        phases: &[Value],
        tasks: &[Value],
    ) -> Result<FlowToolResponse, ServiceError> {
        self.create(FlowType::Orchestrator, name, description, phases, tasks)
            .await
    }

    /// Creates a conditional (`keboola.flow`) flow.
    pub async fn create_conditional_flow(
        &self,
        name: &str,
        description: &str,
        phases: &[Value],
        tasks: &[Value],
    ) -> Result<FlowToolResponse, ServiceError> {
        self.create(FlowType::Conditional, name, description, phases, tasks)
            .await
    }

    async fn create(
        &self,
        flow_type: FlowType,
        name: &str,
        description: &str,
        phases: &[Value],
        tasks: &[Value],
    ) -> Result<FlowToolResponse, ServiceError> {
        let configuration = compile(flow_type, phases, tasks)?;
        info!(name, %flow_type, "Creating new flow");
        let record = self
            .store
            .create(flow_type.component_id(), name, description, configuration)
            .await?;
        info!(
            name,
            configuration_id = %record.configuration_id,
            %flow_type,
            "Created flow"
        );
        Ok(response(&record))
    }

    /// Replaces the phases and tasks of an existing flow of the given type.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_flow(
        &self,
        flow_type: FlowType,
        configuration_id: &str,
        name: &str,
        description: &str,
        change_description: &str,
        phases: &[Value],
        tasks: &[Value],
    ) -> Result<FlowToolResponse, ServiceError> {
        let configuration = compile(flow_type, phases, tasks)?;
        info!(configuration_id, %flow_type, "Updating flow configuration");
        let record = self
            .store
            .update(
                flow_type.component_id(),
                configuration_id,
                name,
                description,
                change_description,
                configuration,
            )
            .await?;
        info!(
            configuration_id,
            version = record.version,
            "Updated flow configuration"
        );
        Ok(response(&record))
    }

    /// Looks the configuration up under every flow type, conditional first.
    pub async fn get_flow(&self, configuration_id: &str) -> Result<Flow, ServiceError> {
        let (flow_type, record) = self
            .find(configuration_id)
            .await?
            .ok_or_else(|| ServiceError::FlowNotFound(configuration_id.to_string()))?;
        let definition = FlowDefinition::from_configuration(&record.configuration, flow_type)?;
        Ok(Flow {
            flow_type,
            configuration_id: record.configuration_id,
            name: record.name,
            description: record.description,
            version: record.version,
            created: record.created,
            updated: record.updated,
            definition,
        })
    }

    /// Summaries of the flows named in `flow_ids`, or of every flow of both
    /// types when the list is empty. Ids that match no flow are skipped.
    pub async fn list_flows(
        &self,
        flow_ids: &[String],
    ) -> Result<Vec<FlowSummary>, ServiceError> {
        let mut summaries = Vec::new();
        if flow_ids.is_empty() {
            for flow_type in FlowType::ALL {
                let records = self.store.list(flow_type.component_id()).await?;
                summaries.extend(
                    records
                        .iter()
                        .map(|record| FlowSummary::from_record(flow_type, record)),
                );
            }
            return Ok(summaries);
        }

        for configuration_id in flow_ids {
            match self.find(configuration_id).await? {
                Some((flow_type, record)) => {
                    summaries.push(FlowSummary::from_record(flow_type, &record));
                }
                None => warn!(configuration_id = %configuration_id, "Skipping unknown flow"),
            }
        }
        Ok(summaries)
    }

    /// Only `NotFound` moves on to the next type; other store errors propagate.
    async fn find(
        &self,
        configuration_id: &str,
    ) -> Result<Option<(FlowType, ConfigurationRecord)>, ServiceError> {
        for flow_type in FlowType::ALL {
            match self.store.get(flow_type.component_id(), configuration_id).await {
                Ok(record) => {
                    info!(configuration_id, %flow_type, "Found flow");
                    return Ok(Some((flow_type, record)));
                }
                Err(StoreError::NotFound { .. }) => {
                    info!(configuration_id, %flow_type, "Flow not found under this type");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }
}

fn compile(flow_type: FlowType, phases: &[Value], tasks: &[Value]) -> Result<Value, ServiceError> {
    FlowCompiler::new(flow_type)
        .compile(phases, tasks)
        .map(|compiled| compiled.configuration)
        .map_err(|e| {
            warn!(%flow_type, error = %e, "Rejected flow configuration");
            ServiceError::from(e)
        })
}

fn response(record: &ConfigurationRecord) -> FlowToolResponse {
    FlowToolResponse {
        flow_id: record.configuration_id.clone(),
        description: record.description.clone(),
        timestamp: Utc::now(),
        success: true,
        version: record.version,
    }
}
