use super::CrewConfig;
use crate::constants::DEFAULT_TASK_TIMEOUT;
use crate::core::{render_goal, Agent, PipelineOptions, Task};
use crate::errors::{Error, Result};
use crate::tools::ToolRegistry;
use tracing::debug;

/// Turns a crew definition into the agents and tasks of one run.
///
/// The user request is interpolated into every agent goal and each agent's
/// tool names are resolved against `tools`.
pub fn build_crew(
    crew: &CrewConfig,
    request: &str,
    tools: &ToolRegistry,
) -> Result<(Vec<Task>, Vec<Agent>, PipelineOptions)> {
    let mut agents = Vec::with_capacity(crew.agents.len());
    for config in &crew.agents {
        if agents.iter().any(|a: &Agent| a.role() == config.role) {
            return Err(Error::Config(format!("duplicate agent role '{}'", config.role)));
        }
        let bound = tools.resolve(&config.tools)?;
        debug!("Agent '{}' bound to tools {:?}", config.role, config.tools);
        agents.push(
            Agent::new(
                config.role.clone(),
                render_goal(&config.goal, request),
                config.backstory.clone(),
            )
            .with_delegation(config.allow_delegation)
            .with_cache(config.cache)
            .with_tools(bound),
        );
    }

    let mut tasks = Vec::with_capacity(crew.tasks.len());
    for config in &crew.tasks {
        let timeout = match config.timeout.as_deref() {
            Some(raw) => humantime::parse_duration(raw).map_err(|e| {
                Error::Config(format!("task '{}' has invalid timeout '{}': {}", config.id, raw, e))
            })?,
            None => DEFAULT_TASK_TIMEOUT,
        };
        let task = config.dependencies.iter().fold(
            Task::new(
                config.id.as_str(),
                config.description.clone(),
                config.expected_output.clone(),
                config.agent.clone(),
            )
            .with_priority(config.priority)
            .with_timeout(timeout),
            |task, dep| task.depends_on(dep.as_str()),
        );
        tasks.push(task);
    }

    let options = PipelineOptions {
        name: crew.name.clone(),
        memory: crew.memory,
    };
    Ok((tasks, agents, options))
}
