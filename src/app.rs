use crate::agents::{AgentExecutor, LlmAgentExecutor};
use crate::config::{build_crew, builtin_crew, load_crew_config, AppConfig, CrewConfig, Credentials};
use crate::core::{Artifact, OutputExtractor, Pipeline};
use crate::errors::{Error, Result};
use crate::llm::{LlmClient, OpenAIEmbedder};
use crate::tools::{RetrievalOptions, RetrievalTool, SearchTool, ToolRegistry};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Request used to build the startup pipeline of [`App::validate`]
const CREW_CHECK_REQUEST: &str = "crew validation";

/// Long-lived collaborators shared by every pipeline run.
///
/// One `App` is built at startup; each user request gets a fresh
/// [`Pipeline`] from [`App::pipeline_for`].
pub struct App {
    crew: CrewConfig,
    tools: ToolRegistry,
    executor: Arc<dyn AgentExecutor>,
    extractor: Arc<OutputExtractor>,
}

impl App {
    pub fn new(
        crew: CrewConfig,
        tools: ToolRegistry,
        executor: Arc<dyn AgentExecutor>,
        extractor: OutputExtractor,
    ) -> Self {
        Self {
            crew,
            tools,
            executor,
            extractor: Arc::new(extractor),
        }
    }

    /// Loads the crew, indexes the reference document and connects the
    /// OpenAI and Serper clients.
    pub async fn bootstrap(config: &AppConfig, credentials: &Credentials) -> Result<Self> {
        let mut crew = match &config.crew_path {
            Some(path) => load_crew_config(path)?,
            None => builtin_crew()?,
        };
        if let Some(memory) = config.memory {
            crew.memory = memory;
        }

        let embedder = Arc::new(OpenAIEmbedder::new(
            &credentials.openai_api_key,
            &config.embedder_model,
        ));
        let retrieval = RetrievalTool::load(
            &config.document_path,
            embedder,
            RetrievalOptions {
                top_k: config.top_k,
                ..RetrievalOptions::default()
            },
        )
        .await;
        if !retrieval.is_available() {
            warn!(
                "Continuing without reference document {}",
                retrieval.source().display()
            );
        }

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(retrieval));
        tools.register(Arc::new(
            SearchTool::new(&credentials.serper_api_key)?.with_num_results(config.top_k),
        ));

        let executor = LlmAgentExecutor::new(LlmClient::openai(
            &credentials.openai_api_key,
            &credentials.openai_model,
        ));

        let extractor = match &config.schema_path {
            Some(path) => {
                info!("Validating artifacts against {}", path.display());
                OutputExtractor::new().with_schema_file(path)?
            }
            None => OutputExtractor::new(),
        };

        let app = Self::new(crew, tools, Arc::new(executor), extractor);
        app.validate()?;
        info!(
            "Crew '{}' ready: {} agents, {} tasks, tools {:?}",
            app.crew.name,
            app.crew.agents.len(),
            app.crew.tasks.len(),
            app.tools.names()
        );
        Ok(app)
    }

    /// Builds a throwaway pipeline so that an invalid crew (unknown tool or
    /// agent, bad timeout, cyclic or dangling dependency) fails at startup
    pub fn validate(&self) -> Result<()> {
        self.pipeline_for(CREW_CHECK_REQUEST).map(|_| ())
    }

    pub fn crew(&self) -> &CrewConfig {
        &self.crew
    }

    /// Builds a fresh pipeline for one user request
    pub fn pipeline_for(&self, request: &str) -> Result<Pipeline> {
        if request.trim().is_empty() {
            return Err(Error::Config("the request must not be empty".to_string()));
        }
        let (tasks, agents, options) = build_crew(&self.crew, request, &self.tools)?;
        Pipeline::new(
            tasks,
            agents,
            self.executor.clone(),
            self.extractor.clone(),
            options,
        )
    }

    /// Runs the whole crew for `request` and returns the run id with the artifact
    pub async fn generate(&self, request: &str) -> Result<(Uuid, Artifact)> {
        let mut pipeline = self.pipeline_for(request)?;
        let run_id = pipeline.run_id();
        info!("Run {} started", run_id);
        let artifact = pipeline.run().await?;
        info!("Run {} produced an artifact", run_id);
        Ok((run_id, artifact))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{app_with, happy_executor};
    use super::*;
    use crate::agents::testing::ScriptedExecutor;

    #[tokio::test]
    async fn generate_returns_terminal_artifact() {
        let app = app_with(happy_executor());

        let (_, artifact) = app.generate("320x50 banner for a mobile app").await.unwrap();

        assert_eq!(artifact.value()["imp"][0]["banner"]["w"], 320);
    }

    #[tokio::test]
    async fn each_request_gets_its_own_run() {
        let app = app_with(happy_executor());

        let first = app.pipeline_for("a").unwrap();
        let second = app.pipeline_for("b").unwrap();

        assert_ne!(first.run_id(), second.run_id());
        assert!(!first.completed());
    }

    #[tokio::test]
    async fn empty_request_is_rejected_before_running() {
        let app = app_with(happy_executor());
        assert!(matches!(app.generate("   ").await, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn prose_final_answer_is_an_extraction_error() {
        let executor = ScriptedExecutor::new()
            .answer("Request Intake Agent", "reqs")
            .answer("Dependency Map Agent", "map")
            .answer("Requirement Adherence Agent", "I could not build it, sorry.");
        let app = app_with(executor);

        let err = app.generate("video ad").await.unwrap_err();

        assert!(err.is_extraction());
    }

    fn credentials() -> Credentials {
        Credentials {
            openai_api_key: "sk-test".to_string(),
            serper_api_key: "serper-test".to_string(),
            openai_model: "gpt-4o".to_string(),
        }
    }

    fn config_with_crew(crew: &CrewConfig) -> (AppConfig, tempfile::NamedTempFile) {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_yaml::to_string(crew).unwrap()).unwrap();
        let config = AppConfig {
            document_path: "/nonexistent/ortb_spec.pdf".into(),
            crew_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };
        (config, file)
    }

    #[tokio::test]
    async fn cyclic_crew_file_fails_at_startup() {
        let mut crew = builtin_crew().unwrap();
        crew.tasks[0]
            .dependencies
            .push("requirement_adherence".to_string());
        let (config, _file) = config_with_crew(&crew);

        let err = App::bootstrap(&config, &credentials()).await.err().unwrap();

        match err {
            Error::Config(msg) => assert!(msg.contains("circular")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_tool_in_crew_file_fails_at_startup() {
        let mut crew = builtin_crew().unwrap();
        crew.agents[2].tools.push("calculator".to_string());
        let (config, _file) = config_with_crew(&crew);

        let result = App::bootstrap(&config, &credentials()).await;

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn valid_crew_file_bootstraps_without_the_document() {
        let (config, _file) = config_with_crew(&builtin_crew().unwrap());

        let app = App::bootstrap(&config, &credentials()).await.unwrap();

        assert_eq!(app.crew().tasks.len(), 3);
        assert!(app.validate().is_ok());
    }
}
