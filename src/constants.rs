use std::time::Duration;

/// Name of the reference-document retrieval tool
pub const SPEC_SEARCH_TOOL: &str = "spec_search";

/// Name of the web search tool
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Serper Google search endpoint
pub const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";

/// Default reference document, relative to the working directory
pub const DEFAULT_DOCUMENT_PATH: &str = "data/ortb_spec_2dot5.pdf";

/// Default OpenAI embedding model for the reference document
pub const DEFAULT_EMBEDDER_MODEL: &str = "text-embedding-3-small";

/// Time budget of a task when the crew does not set one
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Tool requests or delegations an agent may make before it must answer
pub const MAX_AGENT_ITERATIONS: usize = 8;

/// Attempts allowed to produce a well-formed reply
pub const MAX_FORMAT_RETRIES: usize = 2;

/// Character budget of a conversation sent to the LLM
pub const MAX_CONVERSATION_CHARS: usize = 60_000;

/// Leading messages of an agent conversation kept when it is trimmed:
/// the persona prompt and the task prompt carrying upstream outputs
pub const PINNED_MESSAGES: usize = 2;

/// Character budget of the crew memory
pub const MAX_MEMORY_CHARS: usize = 12_000;

/// Character budget of a single tool result fed back to the agent
pub const MAX_TOOL_RESULT_CHARS: usize = 8_000;

/// Marker opening an agent's final answer
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Marker of a tool request line
pub const TOOL_REQUEST_MARKER: &str = "TOOL_REQUEST:";

/// Marker of a delegation line
pub const DELEGATE_MARKER: &str = "DELEGATE:";

/// Format reminder sent when an agent reply matches none of the markers
pub const AGENT_FORMAT_REMINDER: &str = "Reply with exactly one of: a line 'TOOL_REQUEST: <tool> <query>', \
a line 'DELEGATE: <coworker role> | <question>' (only if delegation is allowed), \
or 'Final Answer:' followed by your complete answer.";

/// System prompt used when a coworker answers a delegated question
pub const COWORKER_SYSTEM_PROMPT: &str = "A crew member is asking you for help with their task. \
Answer the question directly and completely using your expertise. Do not ask questions back.";
