use crate::{parse_args, render_json, DuplicateNameError, Tool, ToolError, Toolset};
use async_trait::async_trait;
use cloudclaw_aws::FunctionClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Builds the serverless toolset. Registration order is list, invoke.
pub fn toolset(client: Arc<dyn FunctionClient>) -> Result<Toolset, DuplicateNameError> {
    let mut set = Toolset::new("lambda");
    set.register(Arc::new(LambdaListFunctionsTool::new(client.clone())))?;
    set.register(Arc::new(LambdaInvokeFunctionTool::new(client)))?;
    Ok(set)
}

pub struct LambdaListFunctionsTool {
    client: Arc<dyn FunctionClient>,
}

impl LambdaListFunctionsTool {
    pub fn new(client: Arc<dyn FunctionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for LambdaListFunctionsTool {
    fn name(&self) -> &str {
        "lambda_list_functions"
    }

    fn description(&self) -> &str {
        "List all Lambda functions in your AWS account"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn run(&self, _args: Value) -> Result<String, ToolError> {
        let functions = self.client.list_functions().await?;
        info!(count = functions.len(), "listed Lambda functions");
        render_json(&functions)
    }
}

pub struct LambdaInvokeFunctionTool {
    client: Arc<dyn FunctionClient>,
}

impl LambdaInvokeFunctionTool {
    pub fn new(client: Arc<dyn FunctionClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct InvokeFunctionArgs {
    function_name: String,
    #[serde(default)]
    payload: Option<Value>,
}

#[async_trait]
impl Tool for LambdaInvokeFunctionTool {
    fn name(&self) -> &str {
        "lambda_invoke_function"
    }

    fn description(&self) -> &str {
        "Invoke a Lambda function with optional payload"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "function_name": {
                    "type": "string",
                    "description": "Name of the Lambda function to invoke"
                },
                "payload": {
                    "type": "object",
                    "description": "Payload to send to the function"
                }
            },
            "required": ["function_name"]
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: InvokeFunctionArgs = parse_args(args)?;
        info!(function = %args.function_name, has_payload = args.payload.is_some(), "invoking Lambda function");
        let outcome = self
            .client
            .invoke_function(&args.function_name, args.payload)
            .await?;
        render_json(&outcome)
    }
}
