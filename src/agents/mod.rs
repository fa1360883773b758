mod llm_executor;
mod reply;

pub use llm_executor::*;
pub use reply::*;

use crate::core::Agent;
use crate::errors::Result;

/// Everything an agent gets to work on a single task
pub struct AgentRequest<'a> {
    /// The agent bound to the task
    pub agent: &'a Agent,
    /// All agents of the crew, for delegation
    pub crew: &'a [Agent],
    /// What has to be done
    pub task_description: &'a str,
    /// Contract the answer must satisfy
    pub expected_output: &'a str,
    /// Rendered outputs of upstream tasks and crew memory
    pub context: String,
}

impl AgentRequest<'_> {
    /// Other crew members this agent may delegate to
    pub fn coworkers(&self) -> impl Iterator<Item = &Agent> {
        let role = self.agent.role();
        self.crew.iter().filter(move |a| a.role() != role)
    }
}

/// Backend turning an agent request into the agent's final answer
#[async_trait::async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(&self, request: &AgentRequest<'_>) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{AgentExecutor, AgentRequest};
    use crate::errors::{Error, Result};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub role: String,
        pub task_description: String,
        pub context: String,
    }

    /// Executor answering with fixed text per agent role
    #[derive(Default)]
    pub struct ScriptedExecutor {
        answers: HashMap<String, std::result::Result<String, String>>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<RecordedCall>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn answer(mut self, role: &str, text: &str) -> Self {
            self.answers.insert(role.to_string(), Ok(text.to_string()));
            self
        }

        pub fn fail(mut self, role: &str, reason: &str) -> Self {
            self.answers.insert(role.to_string(), Err(reason.to_string()));
            self
        }

        pub fn delay(mut self, role: &str, delay: Duration) -> Self {
            self.delays.insert(role.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn called_roles(&self) -> Vec<String> {
            self.calls().into_iter().map(|c| c.role).collect()
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl AgentExecutor for ScriptedExecutor {
        async fn execute(&self, request: &AgentRequest<'_>) -> Result<String> {
            let role = request.agent.role().to_string();
            self.calls.lock().unwrap().push(RecordedCall {
                role: role.clone(),
                task_description: request.task_description.to_string(),
                context: request.context.clone(),
            });

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(&role) {
                tokio::time::sleep(*delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.answers.get(&role) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(reason)) => Err(Error::Llm(reason.clone())),
                None => Err(Error::Llm(format!("no scripted answer for {}", role))),
            }
        }
    }
}
