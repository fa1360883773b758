mod crew;
mod parser;

use crate::constants::{DEFAULT_DOCUMENT_PATH, DEFAULT_EMBEDDER_MODEL};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crew::build_crew;
pub use parser::{builtin_crew, load_crew_config};

/// Secrets required to reach the LLM, embedding and search services
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub serper_api_key: String,
    /// Chat model used by every agent
    pub openai_model: String,
}

impl Credentials {
    /// Reads the credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the credentials through `lookup`; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("missing required environment variable {}", key)))
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            serper_api_key: required("SERPER_API_KEY")?,
            openai_model: required("OPENAI_MODEL_NAME")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"***")
            .field("serper_api_key", &"***")
            .field("openai_model", &self.openai_model)
            .finish()
    }
}

/// Runtime settings of the application, assembled from CLI and environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Reference document indexed for the `spec_search` tool
    pub document_path: PathBuf,
    pub embedder_model: String,
    /// Passages returned per document search
    pub top_k: usize,
    /// Crew definition; the built-in OpenRTB crew when unset
    pub crew_path: Option<PathBuf>,
    /// Overrides the crew's memory setting when set
    pub memory: Option<bool>,
    /// JSON schema the final artifact must satisfy
    pub schema_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            document_path: PathBuf::from(DEFAULT_DOCUMENT_PATH),
            embedder_model: DEFAULT_EMBEDDER_MODEL.to_string(),
            top_k: 5,
            crew_path: None,
            memory: None,
            schema_path: None,
        }
    }
}

/// A crew: the agents and the tasks they run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CrewConfig {
    /// Name of the crew, used in logs
    pub name: String,
    /// Whether completed outputs are shared with every later task
    #[serde(default)]
    pub memory: bool,
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<TaskConfig>,
}

/// Configuration of one agent
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AgentConfig {
    /// Unique role, referenced by tasks and delegation
    pub role: String,
    /// Goal template; `{request}` is replaced with the user request
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub allow_delegation: bool,
    /// Reuse tool results for identical queries within a task
    #[serde(default)]
    pub cache: bool,
    /// Names of the tools bound to the agent
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Configuration of one task
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TaskConfig {
    pub id: String,
    pub description: String,
    pub expected_output: String,
    /// Role of the executing agent
    pub agent: String,
    #[serde(default)]
    pub priority: i32,
    /// Human duration such as `60s` or `2m`
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}
