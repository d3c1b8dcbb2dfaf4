use crate::{parse_args, render_json, DuplicateNameError, Tool, ToolError, Toolset};
use async_trait::async_trait;
use cloudclaw_aws::ComputeClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Builds the compute toolset. The three tools share one client handle and
/// register in a fixed order: list, start, stop.
pub fn toolset(client: Arc<dyn ComputeClient>) -> Result<Toolset, DuplicateNameError> {
    let mut set = Toolset::new("ec2");
    set.register(Arc::new(Ec2ListInstancesTool::new(client.clone())))?;
    set.register(Arc::new(Ec2StartInstanceTool::new(client.clone())))?;
    set.register(Arc::new(Ec2StopInstanceTool::new(client)))?;
    Ok(set)
}

pub struct Ec2ListInstancesTool {
    client: Arc<dyn ComputeClient>,
}

impl Ec2ListInstancesTool {
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ListInstancesArgs {
    #[serde(default)]
    filters: Option<HashMap<String, Vec<String>>>,
}

#[async_trait]
impl Tool for Ec2ListInstancesTool {
    fn name(&self) -> &str {
        "ec2_list_instances"
    }

    fn description(&self) -> &str {
        "List all EC2 instances with their details including ID, state, type, and tags"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "filters": {
                    "type": "object",
                    "description": "Optional filters for EC2 instances (e.g., {\"instance-state-name\": [\"running\"]})",
                    "additionalProperties": {
                        "type": "array",
                        "items": {"type": "string"}
                    }
                }
            }
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: ListInstancesArgs = parse_args(args)?;
        let instances = self.client.list_instances(args.filters).await?;
        info!(count = instances.len(), "listed EC2 instances");
        render_json(&instances)
    }
}

pub struct Ec2StartInstanceTool {
    client: Arc<dyn ComputeClient>,
}

impl Ec2StartInstanceTool {
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct StartInstanceArgs {
    instance_id: String,
}

#[async_trait]
impl Tool for Ec2StartInstanceTool {
    fn name(&self) -> &str {
        "ec2_start_instance"
    }

    fn description(&self) -> &str {
        "Start an EC2 instance by its instance ID"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "instance_id": {
                    "type": "string",
                    "description": "The ID of the EC2 instance to start"
                }
            },
            "required": ["instance_id"]
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: StartInstanceArgs = parse_args(args)?;
        info!(instance_id = %args.instance_id, "starting EC2 instance");
        let change = self.client.start_instance(&args.instance_id).await?;
        Ok(format!(
            "Starting instance {}. Current state: {}",
            change.instance_id, change.current_state
        ))
    }
}

pub struct Ec2StopInstanceTool {
    client: Arc<dyn ComputeClient>,
}

impl Ec2StopInstanceTool {
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct StopInstanceArgs {
    instance_id: String,
}

#[async_trait]
impl Tool for Ec2StopInstanceTool {
    fn name(&self) -> &str {
        "ec2_stop_instance"
    }

    fn description(&self) -> &str {
        "Stop an EC2 instance by its instance ID"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "instance_id": {
                    "type": "string",
                    "description": "The ID of the EC2 instance to stop"
                }
            },
            "required": ["instance_id"]
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: StopInstanceArgs = parse_args(args)?;
        info!(instance_id = %args.instance_id, "stopping EC2 instance");
        let change = self.client.stop_instance(&args.instance_id).await?;
        Ok(format!(
            "Stopping instance {}. Current state: {}",
            change.instance_id, change.current_state
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudclaw_aws::{InstanceStateChange, InstanceSummary, RemoteOperationError};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubCompute {
        calls: AtomicUsize,
        fail_start: bool,
    }

    #[async_trait]
    impl ComputeClient for StubCompute {
        async fn list_instances(
            &self,
            filters: Option<HashMap<String, Vec<String>>>,
        ) -> Result<Vec<InstanceSummary>, RemoteOperationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let state = filters
                .as_ref()
                .and_then(|f| f.get("instance-state-name"))
                .and_then(|values| values.first())
                .cloned()
                .unwrap_or_else(|| "running".to_string());

            let mut tags = BTreeMap::new();
            tags.insert("Name".to_string(), "web-server".to_string());
            Ok(vec![InstanceSummary {
                id: "i-abc123".to_string(),
                state,
                instance_type: "t2.micro".to_string(),
                launch_time: "2024-03-05 14:30:00".to_string(),
                tags,
            }])
        }

        async fn start_instance(
            &self,
            instance_id: &str,
        ) -> Result<InstanceStateChange, RemoteOperationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_start {
                return Err(RemoteOperationError::with_resource(
                    "ec2 start_instance",
                    instance_id,
                    "InstanceNotFound",
                ));
            }
            Ok(InstanceStateChange {
                instance_id: instance_id.to_string(),
                previous_state: "stopped".to_string(),
                current_state: "pending".to_string(),
            })
        }

        async fn stop_instance(
            &self,
            instance_id: &str,
        ) -> Result<InstanceStateChange, RemoteOperationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(InstanceStateChange {
                instance_id: instance_id.to_string(),
                previous_state: "running".to_string(),
                current_state: "stopping".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn list_renders_instances_as_pretty_json() {
        let stub = Arc::new(StubCompute::default());
        let tool = Ec2ListInstancesTool::new(stub.clone());

        let result = tool.execute(json!({})).await;
        assert!(result.success);
        assert!(result.payload.contains("i-abc123"));
        assert!(result.payload.contains("\"state\": \"running\""));
        assert!(result.payload.contains("\"type\": \"t2.micro\""));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn list_passes_filters_through() {
        let stub = Arc::new(StubCompute::default());
        let tool = Ec2ListInstancesTool::new(stub.clone());

        let result = tool
            .execute(json!({"filters": {"instance-state-name": ["stopped"]}}))
            .await;
        assert!(result.success);
        assert!(result.payload.contains("\"state\": \"stopped\""));
    }

    #[tokio::test]
    async fn start_missing_instance_id_makes_no_remote_call() {
        let stub = Arc::new(StubCompute::default());
        let tool = Ec2StartInstanceTool::new(stub.clone());

        let result = tool.execute(json!({})).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("instance_id"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn start_confirms_state_transition() {
        let stub = Arc::new(StubCompute::default());
        let tool = Ec2StartInstanceTool::new(stub.clone());

        let result = tool.execute(json!({"instance_id": "i-abc123"})).await;
        assert!(result.success);
        assert_eq!(
            result.payload,
            "Starting instance i-abc123. Current state: pending"
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_remote_failure_names_operation_and_resource() {
        let stub = Arc::new(StubCompute {
            fail_start: true,
            ..Default::default()
        });
        let tool = Ec2StartInstanceTool::new(stub.clone());

        let result = tool.execute(json!({"instance_id": "i-xyz999"})).await;
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("ec2 start_instance failed for i-xyz999: InstanceNotFound")
        );
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_confirms_state_transition() {
        let stub = Arc::new(StubCompute::default());
        let tool = Ec2StopInstanceTool::new(stub.clone());

        let result = tool.execute(json!({"instance_id": "i-abc123"})).await;
        assert!(result.success);
        assert_eq!(
            result.payload,
            "Stopping instance i-abc123. Current state: stopping"
        );
    }

    #[tokio::test]
    async fn toolset_registers_in_fixed_order() {
        let set = toolset(Arc::new(StubCompute::default())).unwrap();
        assert_eq!(
            set.names(),
            vec!["ec2_list_instances", "ec2_start_instance", "ec2_stop_instance"]
        );
        assert_eq!(set.name(), "ec2");
    }
}
