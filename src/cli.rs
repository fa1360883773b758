use crate::config::AppConfig;
use crate::constants::{DEFAULT_DOCUMENT_PATH, DEFAULT_EMBEDDER_MODEL};
use clap::Parser;
use std::path::PathBuf;

/// Turns a free-text ad request into an OpenRTB bid request
#[derive(Parser, Debug)]
#[command(name = "bidcrew", version)]
pub struct Cli {
    /// The request to turn into a bid request; prompted for when omitted
    #[arg(short, long)]
    pub request: Option<String>,

    /// YAML crew definition replacing the built-in OpenRTB crew
    #[arg(short, long)]
    pub crew: Option<PathBuf>,

    /// Reference specification document searched by the agents
    #[arg(long, env = "BIDCREW_DOCUMENT", default_value = DEFAULT_DOCUMENT_PATH)]
    pub document: PathBuf,

    /// OpenAI embedding model used to index the reference document
    #[arg(long, env = "OPENAI_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDER_MODEL)]
    pub embedder_model: String,

    /// Passages returned per document search
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,

    /// Share every completed task output with all later tasks
    #[arg(long, conflicts_with = "no_memory")]
    pub memory: bool,

    /// Disable crew memory even if the crew enables it
    #[arg(long)]
    pub no_memory: bool,

    /// JSON schema the generated bid request must satisfy
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    #[arg(long, default_value_t = String::from("info"))]
    pub logging_level: String,

    /// Also write logs to daily files under logs/
    #[arg(long)]
    pub log_file: bool,

    /// Serve the HTTP API instead of running a single request
    #[arg(long = "api")]
    pub api_enabled: bool,

    /// Port of the HTTP API
    #[arg(long, default_value_t = 3000)]
    pub api_port: u16,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        let memory = match (self.memory, self.no_memory) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        AppConfig {
            document_path: self.document.clone(),
            embedder_model: self.embedder_model.clone(),
            top_k: self.top_k,
            crew_path: self.crew.clone(),
            memory,
            schema_path: self.schema.clone(),
        }
    }
}
