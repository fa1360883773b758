use super::agent::Agent;
use super::task_context::TaskContext;
use crate::agents::{AgentExecutor, AgentRequest};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Identifier of a task, unique within a crew
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Raw result of a completed task
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutput {
    pub task_id: TaskId,
    pub raw_text: String,
    pub completed_at: DateTime<Utc>,
}

/// A unit of work assigned to one agent
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique identifier of the task
    pub id: TaskId,
    /// What the agent has to do
    pub description: String,
    /// Contract the agent's answer must fulfil
    pub expected_output: String,
    /// Role of the agent executing the task
    pub agent_role: String,
    /// Scheduling hint, lower runs first among ready tasks
    pub priority: i32,
    /// Time budget for the agent's answer
    pub timeout: Duration,
    /// Tasks that must complete before this one, in declaration order
    pub dependencies: Vec<TaskId>,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent_role: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent_role: agent_role.into(),
            priority: 0,
            timeout: crate::constants::DEFAULT_TASK_TIMEOUT,
            dependencies: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn depends_on(mut self, task: impl Into<TaskId>) -> Self {
        let task = task.into();
        if !self.dependencies.contains(&task) {
            self.dependencies.push(task);
        }
        self
    }

    /// Dependencies that have no output in `completed`
    pub fn missing_dependencies(&self, completed: &HashMap<TaskId, TaskOutput>) -> Vec<TaskId> {
        self.dependencies
            .iter()
            .filter(|dep| !completed.contains_key(*dep))
            .cloned()
            .collect()
    }

    /// Runs the task on its agent within the task timeout.
    ///
    /// # Arguments
    /// * `agent` - The agent bound to this task
    /// * `crew` - Every agent of the crew, used for delegation
    /// * `executor` - Backend that turns the agent request into text
    /// * `completed` - Outputs of the tasks completed so far
    /// * `memory` - Crew memory to add to the context, if enabled
    ///
    /// # Errors
    /// * `DependencyViolation` if a dependency has no output yet
    /// * `TaskTimeout` if the agent exceeded the timeout
    /// * `TaskFailure` if the agent or one of its tools failed
    pub async fn execute(
        &self,
        agent: &Agent,
        crew: &[Agent],
        executor: &dyn AgentExecutor,
        completed: &HashMap<TaskId, TaskOutput>,
        memory: Option<String>,
    ) -> Result<TaskOutput> {
        let missing = self.missing_dependencies(completed);
        if !missing.is_empty() {
            return Err(Error::DependencyViolation {
                task: self.id.clone(),
                missing,
            });
        }

        let mut context = TaskContext::new();
        for dep in &self.dependencies {
            if let Some(output) = completed.get(dep) {
                context.push_output(output);
            }
        }
        context.memory = memory;

        let request = AgentRequest {
            agent,
            crew,
            task_description: &self.description,
            expected_output: &self.expected_output,
            context: context.combined_context(),
        };

        info!(task = %self.id, agent = agent.role(), "Executing task");
        debug!(task = %self.id, "Context length: {}", request.context.len());

        match tokio::time::timeout(self.timeout, executor.execute(&request)).await {
            Ok(Ok(raw_text)) => Ok(TaskOutput {
                task_id: self.id.clone(),
                raw_text,
                completed_at: Utc::now(),
            }),
            Ok(Err(e)) => {
                warn!(task = %self.id, "Agent failed: {}", e);
                Err(Error::TaskFailure {
                    task: self.id.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                warn!(task = %self.id, "Agent did not answer within {:?}", self.timeout);
                Err(Error::TaskTimeout {
                    task: self.id.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }
}
