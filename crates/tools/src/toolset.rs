use crate::{Tool, ToolSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registration-time name collision. The first registration stays in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNameError {
    pub name: String,
}

impl fmt::Display for DuplicateNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tool '{}' is already registered", self.name)
    }
}

impl std::error::Error for DuplicateNameError {}

/// Ordered, name-indexed set of tools. Registration happens once at startup
/// through `&mut`; afterwards the set is shared read-only behind `Arc`.
/// `describe()` and `definitions()` preserve registration order.
pub struct Toolset {
    name: String,
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolset")
            .field("name", &self.name)
            .field("tools", &self.names())
            .finish()
    }
}

impl Toolset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Merges subsystem toolsets into one registry. Name collisions across
    /// sets fail the merge the same way they fail registration.
    pub fn combined(
        name: impl Into<String>,
        sets: Vec<Toolset>,
    ) -> Result<Self, DuplicateNameError> {
        let mut merged = Self::new(name);
        for set in sets {
            for tool in set.tools {
                merged.register(tool)?;
            }
        }
        Ok(merged)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), DuplicateNameError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(DuplicateNameError { name });
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// Tool specs in registration order, for the model briefing.
    pub fn describe(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Same content as [`describe`](Toolset::describe), as raw JSON values
    /// in the chat-completions function shape.
    pub fn definitions(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.parameters()
                })
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolError;
    use async_trait::async_trait;
    use serde_json::json;

    struct DummyTool {
        name: &'static str,
        description: &'static str,
    }

    impl DummyTool {
        fn boxed(name: &'static str, description: &'static str) -> Arc<dyn Tool> {
            Arc::new(Self { name, description })
        }
    }

    #[async_trait]
    impl Tool for DummyTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        fn parameters(&self) -> Value {
            json!({
                "type": "object",
                "properties": {}
            })
        }

        async fn run(&self, _args: Value) -> Result<String, ToolError> {
            Ok("ok".to_string())
        }
    }

    #[test]
    fn describe_preserves_registration_order() {
        let mut set = Toolset::new("test");
        set.register(DummyTool::boxed("list", "first")).unwrap();
        set.register(DummyTool::boxed("start", "second")).unwrap();
        set.register(DummyTool::boxed("stop", "third")).unwrap();

        let names: Vec<String> = set.describe().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["list", "start", "stop"]);
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_first() {
        let mut set = Toolset::new("test");
        set.register(DummyTool::boxed("list", "original")).unwrap();

        let err = set
            .register(DummyTool::boxed("list", "imposter"))
            .unwrap_err();
        assert_eq!(err.name, "list");
        assert_eq!(err.to_string(), "tool 'list' is already registered");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("list").unwrap().description(), "original");
    }

    #[test]
    fn get_unknown_tool_returns_none() {
        let set = Toolset::new("test");
        assert!(set.get("nope").is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn definitions_match_wire_shape() {
        let mut set = Toolset::new("test");
        set.register(DummyTool::boxed("list", "lists things")).unwrap();

        let defs = set.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0]["name"], "list");
        assert_eq!(defs[0]["description"], "lists things");
        assert_eq!(defs[0]["parameters"]["type"], "object");
    }

    #[test]
    fn combined_merges_in_set_order() {
        let mut a = Toolset::new("a");
        a.register(DummyTool::boxed("one", "")).unwrap();
        let mut b = Toolset::new("b");
        b.register(DummyTool::boxed("two", "")).unwrap();

        let merged = Toolset::combined("all", vec![a, b]).unwrap();
        assert_eq!(merged.names(), vec!["one", "two"]);
        assert_eq!(merged.name(), "all");
    }

    #[test]
    fn combined_rejects_cross_set_collisions() {
        let mut a = Toolset::new("a");
        a.register(DummyTool::boxed("dup", "")).unwrap();
        let mut b = Toolset::new("b");
        b.register(DummyTool::boxed("dup", "")).unwrap();

        let err = Toolset::combined("all", vec![a, b]).unwrap_err();
        assert_eq!(err.name, "dup");
    }
}
