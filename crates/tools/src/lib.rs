pub mod compute_tools;
pub mod function_tools;
pub mod storage_tools;
pub mod toolset;

use async_trait::async_trait;
use cloudclaw_aws::RemoteOperationError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use toolset::{DuplicateNameError, Toolset};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Remote(#[from] RemoteOperationError),
}

/// What the model is told about one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

/// Terminal outcome of a tool execution. Failures are folded in here; no
/// error type crosses the tool boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub payload: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            success: true,
            payload: payload.into(),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: String::new(),
            error: Some(error.into()),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value; // JSON Schema

    /// Validates the argument mapping, performs the single remote call and
    /// renders the payload.
    async fn run(&self, args: Value) -> Result<String, ToolError>;

    /// Folds [`run`](Tool::run) into a [`ToolResult`].
    async fn execute(&self, args: Value) -> ToolResult {
        match self.run(args).await {
            Ok(payload) => ToolResult::success(payload),
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Deserializes an argument mapping into a typed args struct. Failure means
/// no remote call is made.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))
}

/// Pretty-prints a payload the way list tools report collections.
pub(crate) fn render_json<T: Serialize>(value: &T) -> Result<String, ToolError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ToolError::InvalidArgs(format!("Failed to render payload: {}", e)))
}
