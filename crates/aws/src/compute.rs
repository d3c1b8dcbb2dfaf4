use crate::error::RemoteOperationError;
use crate::format_timestamp;
use async_trait::async_trait;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types as ec2;
use aws_sdk_ec2::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// One row of a `list_instances` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub id: String,
    pub state: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub launch_time: String,
    pub tags: BTreeMap<String, String>,
}

/// State transition reported by a start/stop call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceStateChange {
    pub instance_id: String,
    pub previous_state: String,
    pub current_state: String,
}

/// Compute subsystem operations. One remote call per method.
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// Lists instances, optionally narrowed by name -> values filters
    /// (e.g. `instance-state-name` -> `["running"]`).
    async fn list_instances(
        &self,
        filters: Option<HashMap<String, Vec<String>>>,
    ) -> Result<Vec<InstanceSummary>, RemoteOperationError>;

    async fn start_instance(
        &self,
        instance_id: &str,
    ) -> Result<InstanceStateChange, RemoteOperationError>;

    async fn stop_instance(
        &self,
        instance_id: &str,
    ) -> Result<InstanceStateChange, RemoteOperationError>;
}

/// EC2-backed [`ComputeClient`]. Owns its client handle; region and
/// credentials are fixed at construction.
pub struct Ec2Compute {
    client: Client,
}

impl Ec2Compute {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(conf: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(conf))
    }
}

#[async_trait]
impl ComputeClient for Ec2Compute {
    async fn list_instances(
        &self,
        filters: Option<HashMap<String, Vec<String>>>,
    ) -> Result<Vec<InstanceSummary>, RemoteOperationError> {
        let mut request = self.client.describe_instances();
        if let Some(filters) = filters {
            debug!(filters = filters.len(), "describing EC2 instances");
            request = request.set_filters(Some(convert_filters(filters)));
        } else {
            debug!("describing EC2 instances");
        }

        let response = request.send().await.map_err(|e| {
            RemoteOperationError::new(
                "ec2 list_instances",
                format!("{}", DisplayErrorContext(&e)),
            )
        })?;

        let mut instances = Vec::new();
        for reservation in response.reservations() {
            for instance in reservation.instances() {
                instances.push(convert_instance(instance));
            }
        }
        Ok(instances)
    }

    async fn start_instance(
        &self,
        instance_id: &str,
    ) -> Result<InstanceStateChange, RemoteOperationError> {
        debug!(instance_id, "starting EC2 instance");
        let response = self
            .client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::with_resource(
                    "ec2 start_instance",
                    instance_id,
                    format!("{}", DisplayErrorContext(&e)),
                )
            })?;

        let change = response.starting_instances().first().ok_or_else(|| {
            RemoteOperationError::with_resource(
                "ec2 start_instance",
                instance_id,
                "no state change in response",
            )
        })?;
        Ok(convert_state_change(instance_id, change))
    }

    async fn stop_instance(
        &self,
        instance_id: &str,
    ) -> Result<InstanceStateChange, RemoteOperationError> {
        debug!(instance_id, "stopping EC2 instance");
        let response = self
            .client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::with_resource(
                    "ec2 stop_instance",
                    instance_id,
                    format!("{}", DisplayErrorContext(&e)),
                )
            })?;

        let change = response.stopping_instances().first().ok_or_else(|| {
            RemoteOperationError::with_resource(
                "ec2 stop_instance",
                instance_id,
                "no state change in response",
            )
        })?;
        Ok(convert_state_change(instance_id, change))
    }
}

fn convert_filters(filters: HashMap<String, Vec<String>>) -> Vec<ec2::Filter> {
    filters
        .into_iter()
        .map(|(name, values)| {
            ec2::Filter::builder()
                .name(name)
                .set_values(Some(values))
                .build()
        })
        .collect()
}

fn convert_instance(instance: &ec2::Instance) -> InstanceSummary {
    InstanceSummary {
        id: instance.instance_id().unwrap_or_default().to_string(),
        state: state_name(instance.state()),
        instance_type: instance
            .instance_type()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default(),
        launch_time: instance
            .launch_time()
            .map(format_timestamp)
            .unwrap_or_default(),
        tags: instance
            .tags()
            .iter()
            .filter_map(|tag| {
                Some((
                    tag.key()?.to_string(),
                    tag.value().unwrap_or_default().to_string(),
                ))
            })
            .collect(),
    }
}

fn convert_state_change(
    instance_id: &str,
    change: &ec2::InstanceStateChange,
) -> InstanceStateChange {
    InstanceStateChange {
        instance_id: change
            .instance_id()
            .unwrap_or(instance_id)
            .to_string(),
        previous_state: state_name(change.previous_state()),
        current_state: state_name(change.current_state()),
    }
}

fn state_name(state: Option<&ec2::InstanceState>) -> String {
    state
        .and_then(|s| s.name())
        .map(|n| n.as_str().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
