use crate::tools::Tool;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a tool an agent may call
pub type ToolRef = Arc<dyn Tool>;

/// Placeholder substituted with the live user request in goal templates
pub const REQUEST_PLACEHOLDER: &str = "{request}";

/// Builds an agent goal by interpolating the user request into a template.
///
/// Templates without the placeholder are returned unchanged.
pub fn render_goal(template: &str, request: &str) -> String {
    template.replace(REQUEST_PLACEHOLDER, request.trim())
}

/// A reasoning role bound to a goal, a persona and a set of tools.
///
/// Agents are plain configuration: once built they are only read.
#[derive(Clone)]
pub struct Agent {
    role: String,
    goal: String,
    backstory: String,
    allow_delegation: bool,
    cache_enabled: bool,
    tools: Vec<ToolRef>,
}

impl Agent {
    pub fn new(role: impl Into<String>, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            allow_delegation: false,
            cache_enabled: false,
            tools: Vec::new(),
        }
    }

    pub fn with_delegation(mut self, allow: bool) -> Self {
        self.allow_delegation = allow;
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolRef>) -> Self {
        self.tools = tools;
        self
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn allow_delegation(&self) -> bool {
        self.allow_delegation
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn tools(&self) -> &[ToolRef] {
        &self.tools
    }

    /// Looks up one of the agent's bound tools by name
    pub fn tool(&self, name: &str) -> Option<&ToolRef> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("allow_delegation", &self.allow_delegation)
            .field("cache_enabled", &self.cache_enabled)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
