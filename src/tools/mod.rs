mod registry;
mod retrieval;
mod search;
mod vector_store;

pub use registry::*;
pub use retrieval::*;
pub use search::*;
pub use vector_store::*;

use crate::errors::Result;

/// A query-driven collaborator an agent can call while reasoning.
///
/// Tools are shared read-only across the tasks of a run.
#[async_trait::async_trait]
pub trait Tool: std::fmt::Debug + Send + Sync {
    /// Name the agent uses to request the tool
    fn name(&self) -> &str;

    /// One-line usage shown to the agent
    fn description(&self) -> &str;

    /// Returns the results for `query`, most relevant first
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
pub(crate) mod testing {
    pub use super::registry::testing::StaticTool;
    pub use super::vector_store::testing::LetterEmbedder;
}
