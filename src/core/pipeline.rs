use super::agent::Agent;
use super::dag;
use super::extractor::{Artifact, OutputExtractor};
use super::memory::CrewMemory;
use super::task::{Task, TaskId, TaskOutput};
use super::task_state::TaskState;
use crate::agents::AgentExecutor;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Options of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Name used in logs
    pub name: String,
    /// Share every completed output with all later tasks
    pub memory: bool,
}

/// Progress reported by a successful [`Pipeline::step`]
#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub task_id: TaskId,
    pub agent_role: String,
    pub elapsed: Duration,
    /// Tasks completed so far, this one included
    pub completed: usize,
    pub total: usize,
}

/// Sequential, dependency-ordered executor over a task DAG.
///
/// The pipeline is driven by polling: each call to [`step`](Pipeline::step)
/// runs exactly one ready task to completion or failure, and
/// [`completed`](Pipeline::completed) reports when there is nothing left to do.
/// The first failure aborts the run; later tasks never execute.
pub struct Pipeline {
    run_id: Uuid,
    options: PipelineOptions,
    tasks: Vec<Task>,
    agents: Vec<Agent>,
    executor: Arc<dyn AgentExecutor>,
    extractor: Arc<OutputExtractor>,
    states: Vec<TaskState>,
    outputs: HashMap<TaskId, TaskOutput>,
    execution_order: Vec<TaskId>,
    memory: Option<CrewMemory>,
    aborted: bool,
}

impl Pipeline {
    /// Creates a pipeline after validating the crew.
    ///
    /// # Errors
    /// `Config` if a task id is duplicated, a dependency is unknown, a task
    /// names an agent role that is not part of the crew, or the dependency
    /// graph has a cycle. Nothing runs in that case.
    pub fn new(
        tasks: Vec<Task>,
        agents: Vec<Agent>,
        executor: Arc<dyn AgentExecutor>,
        extractor: Arc<OutputExtractor>,
        options: PipelineOptions,
    ) -> Result<Self> {
        if tasks.is_empty() {
            return Err(Error::Config("a pipeline needs at least one task".to_string()));
        }

        for task in &tasks {
            if !agents.iter().any(|a| a.role() == task.agent_role) {
                return Err(Error::Config(format!(
                    "task '{}' is assigned to unknown agent '{}'",
                    task.id, task.agent_role
                )));
            }
        }

        dag::validate(&tasks)?;

        let memory = options.memory.then(CrewMemory::new);
        let states = vec![TaskState::Pending; tasks.len()];

        let mut pipeline = Self {
            run_id: Uuid::new_v4(),
            options,
            tasks,
            agents,
            executor,
            extractor,
            states,
            outputs: HashMap::new(),
            execution_order: Vec::new(),
            memory,
            aborted: false,
        };
        pipeline.refresh_ready();
        Ok(pipeline)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self, task: &TaskId) -> Option<&TaskState> {
        self.index_of(task).map(|i| &self.states[i])
    }

    pub fn output(&self, task: &TaskId) -> Option<&TaskOutput> {
        self.outputs.get(task)
    }

    /// Task ids in the order they were executed
    pub fn execution_order(&self) -> &[TaskId] {
        &self.execution_order
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// True once every task completed or the run was aborted
    pub fn completed(&self) -> bool {
        self.aborted || self.states.iter().all(|s| *s == TaskState::Completed)
    }

    /// The task the next `step` would execute
    pub fn next_task(&self) -> Option<&Task> {
        if self.aborted {
            return None;
        }
        self.next_ready().map(|i| &self.tasks[i])
    }

    /// Executes the next ready task.
    ///
    /// Returns `Ok(None)` when the pipeline has already completed. On failure
    /// the task is marked `Failed` or `TimedOut`, the run is aborted and the
    /// error is returned.
    pub async fn step(&mut self) -> Result<Option<PipelineEvent>> {
        if self.completed() {
            return Ok(None);
        }

        let Some(idx) = self.next_ready() else {
            // Unreachable with a validated DAG: nothing ready yet work remains.
            self.aborted = true;
            let idx = self
                .states
                .iter()
                .position(|s| *s == TaskState::Pending)
                .unwrap_or(0);
            let task = &self.tasks[idx];
            return Err(Error::DependencyViolation {
                task: task.id.clone(),
                missing: task.missing_dependencies(&self.outputs),
            });
        };

        self.states[idx] = TaskState::Running;
        let started = Instant::now();

        let result = {
            let task = &self.tasks[idx];
            match self.agents.iter().find(|a| a.role() == task.agent_role) {
                Some(agent) => {
                    let memory = self.memory.as_ref().and_then(CrewMemory::for_prompt);
                    info!(
                        "[{}] Running task '{}' with agent '{}'",
                        self.options.name, task.id, agent.role()
                    );
                    task.execute(
                        agent,
                        &self.agents,
                        self.executor.as_ref(),
                        &self.outputs,
                        memory,
                    )
                    .await
                }
                None => Err(Error::Config(format!(
                    "unknown agent '{}'",
                    task.agent_role
                ))),
            }
        };

        let task_id = self.tasks[idx].id.clone();
        self.execution_order.push(task_id.clone());

        match result {
            Ok(output) => {
                let agent_role = self.tasks[idx].agent_role.clone();
                if let Some(memory) = self.memory.as_mut() {
                    memory.remember(&agent_role, &output);
                }
                debug!("Task '{}' output: {}", task_id, output.raw_text);
                self.outputs.insert(task_id.clone(), output);
                self.states[idx] = TaskState::Completed;
                self.refresh_ready();

                let completed = self
                    .states
                    .iter()
                    .filter(|s| **s == TaskState::Completed)
                    .count();
                info!(
                    "[{}] Task '{}' completed ({}/{})",
                    self.options.name,
                    task_id,
                    completed,
                    self.tasks.len()
                );

                Ok(Some(PipelineEvent {
                    task_id,
                    agent_role,
                    elapsed: started.elapsed(),
                    completed,
                    total: self.tasks.len(),
                }))
            }
            Err(e) => {
                self.states[idx] = match &e {
                    Error::TaskTimeout { .. } => TaskState::TimedOut,
                    other => TaskState::Failed(other.to_string()),
                };
                self.aborted = true;
                error!(
                    "[{}] Task '{}' {}; aborting run",
                    self.options.name, task_id, self.states[idx]
                );
                Err(e)
            }
        }
    }

    /// Drives the pipeline to completion and extracts the artifact
    pub async fn run(&mut self) -> Result<Artifact> {
        while !self.completed() {
            self.step().await?;
        }
        self.artifact()
    }

    /// Extracts the artifact from the terminal (last declared) task
    pub fn artifact(&self) -> Result<Artifact> {
        if !self.completed() || self.aborted {
            return Err(Error::Pipeline(
                "the artifact is only available after a successful run".to_string(),
            ));
        }
        let terminal = self
            .tasks
            .last()
            .and_then(|t| self.outputs.get(&t.id))
            .ok_or_else(|| Error::Pipeline("terminal task has no output".to_string()))?;
        Ok(self.extractor.extract(&terminal.raw_text)?)
    }

    fn index_of(&self, task: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == task)
    }

    /// Lowest priority ready task, ties broken by declaration order
    fn next_ready(&self) -> Option<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == TaskState::Ready)
            .min_by_key(|(i, _)| (self.tasks[*i].priority, *i))
            .map(|(i, _)| i)
    }

    fn refresh_ready(&mut self) {
        for (idx, task) in self.tasks.iter().enumerate() {
            if self.states[idx] == TaskState::Pending
                && task.missing_dependencies(&self.outputs).is_empty()
            {
                self.states[idx] = TaskState::Ready;
            }
        }
    }
}
