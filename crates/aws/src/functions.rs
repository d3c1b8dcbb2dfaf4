use crate::error::RemoteOperationError;
use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::operation::invoke::InvokeOutput;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types as lambda;
use aws_sdk_lambda::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of a `list_functions` result. `last_modified` is passed through
/// as the service reports it (ISO 8601).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: String,
    pub runtime: String,
    pub handler: String,
    pub last_modified: String,
    pub description: String,
}

/// Result of a synchronous invocation. `payload` is the decoded response
/// body when the function returned one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeOutcome {
    pub status_code: i32,
    pub executed_version: String,
    pub payload: Option<serde_json::Value>,
}

/// Serverless subsystem operations. One remote call per method.
#[async_trait]
pub trait FunctionClient: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>, RemoteOperationError>;

    /// Invokes a function synchronously with an optional JSON payload.
    async fn invoke_function(
        &self,
        function_name: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<InvokeOutcome, RemoteOperationError>;
}

/// Lambda-backed [`FunctionClient`].
pub struct LambdaFunctions {
    client: Client,
}

impl LambdaFunctions {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(conf: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(conf))
    }
}

#[async_trait]
impl FunctionClient for LambdaFunctions {
    async fn list_functions(&self) -> Result<Vec<FunctionSummary>, RemoteOperationError> {
        debug!("listing Lambda functions");
        let response = self.client.list_functions().send().await.map_err(|e| {
            RemoteOperationError::new(
                "lambda list_functions",
                format!("{}", DisplayErrorContext(&e)),
            )
        })?;

        Ok(response.functions().iter().map(convert_function).collect())
    }

    async fn invoke_function(
        &self,
        function_name: &str,
        payload: Option<serde_json::Value>,
    ) -> Result<InvokeOutcome, RemoteOperationError> {
        debug!(function_name, has_payload = payload.is_some(), "invoking Lambda function");
        let mut request = self.client.invoke().function_name(function_name);
        if let Some(payload) = payload {
            let bytes = serde_json::to_vec(&payload).map_err(|e| {
                RemoteOperationError::with_resource(
                    "lambda invoke_function",
                    function_name,
                    e.to_string(),
                )
            })?;
            request = request.payload(Blob::new(bytes));
        }

        let response = request.send().await.map_err(|e| {
            RemoteOperationError::with_resource(
                "lambda invoke_function",
                function_name,
                format!("{}", DisplayErrorContext(&e)),
            )
        })?;

        Ok(convert_invoke(&response))
    }
}

fn convert_function(config: &lambda::FunctionConfiguration) -> FunctionSummary {
    FunctionSummary {
        name: config.function_name().unwrap_or_default().to_string(),
        runtime: config
            .runtime()
            .map(|r| r.as_str().to_string())
            .unwrap_or_default(),
        handler: config.handler().unwrap_or_default().to_string(),
        last_modified: config.last_modified().unwrap_or_default().to_string(),
        description: config
            .description()
            .filter(|d| !d.is_empty())
            .unwrap_or("No description")
            .to_string(),
    }
}

fn convert_invoke(output: &InvokeOutput) -> InvokeOutcome {
    InvokeOutcome {
        status_code: output.status_code(),
        executed_version: output.executed_version().unwrap_or_default().to_string(),
        payload: decode_payload(output.payload()),
    }
}

/// Decodes a response payload as JSON; a non-JSON body is preserved as a
/// plain string rather than dropped.
fn decode_payload(blob: Option<&Blob>) -> Option<serde_json::Value> {
    let bytes = blob?.as_ref();
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(serde_json::Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
    }
}
