use super::Tool;
use crate::core::ToolRef;
use crate::errors::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// Holds the tools available to a crew and resolves them by name
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolRef>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tool, replacing any tool registered under the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        debug!("Registering tool {}", tool.name());
        self.tools.retain(|t| t.name() != tool.name());
        self.tools.push(tool);
    }

    /// Retrieves a tool by its name
    pub fn get(&self, name: &str) -> Option<ToolRef> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Resolves a list of tool names, failing on the first unknown one
    pub fn resolve(&self, names: &[String]) -> Result<Vec<ToolRef>> {
        names
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| {
                    Error::Config(format!(
                        "unknown tool '{}' (available: {})",
                        name,
                        self.names().join(", ")
                    ))
                })
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StaticTool;
    use super::*;

    #[test]
    fn resolves_known_tools_in_order() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("spec_search", &[]));
        registry.register(StaticTool::new("web_search", &[]));

        let tools = registry
            .resolve(&["web_search".to_string(), "spec_search".to_string()])
            .unwrap();
        let names: Vec<_> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["web_search", "spec_search"]);
    }

    #[test]
    fn unknown_tool_is_a_configuration_error() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("spec_search", &[]));

        let err = registry.resolve(&["ssh".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("spec_search")));
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("web_search", &["old"]));
        registry.register(StaticTool::new("web_search", &["new"]));
        assert_eq!(registry.names(), vec!["web_search"]);
    }
}
