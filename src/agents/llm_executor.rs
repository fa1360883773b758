use super::reply::{is_well_formed, parse_reply, AgentReply};
use super::{AgentExecutor, AgentRequest};
use crate::constants::{
    AGENT_FORMAT_REMINDER, COWORKER_SYSTEM_PROMPT, DELEGATE_MARKER, FINAL_ANSWER_MARKER,
    MAX_AGENT_ITERATIONS, MAX_FORMAT_RETRIES, MAX_TOOL_RESULT_CHARS, PINNED_MESSAGES,
    TOOL_REQUEST_MARKER,
};
use crate::core::Agent;
use crate::errors::{Error, Result};
use crate::llm::{ChatMessage, LlmClient};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Runs agents as LLM conversations with a tool-use loop.
///
/// Each reply either requests a tool, delegates a question to a coworker
/// (when the agent allows delegation) or gives the final answer. Tool and
/// delegation results are fed back as user messages.
#[derive(Debug)]
pub struct LlmAgentExecutor {
    llm_client: LlmClient,
    max_iterations: usize,
}

impl LlmAgentExecutor {
    pub fn new(llm_client: LlmClient) -> Self {
        Self {
            llm_client,
            max_iterations: MAX_AGENT_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Persona, tool catalogue and reply protocol of an agent
    fn system_prompt(request: &AgentRequest<'_>) -> String {
        let agent = request.agent;
        let mut prompt = format!(
            "You are {}. {}\nYour personal goal is: {}\n",
            agent.role(),
            agent.backstory(),
            agent.goal()
        );

        if !agent.tools().is_empty() {
            prompt.push_str("\nYou have access to the following tools:\n");
            for tool in agent.tools() {
                prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.description()));
            }
            prompt.push_str(&format!(
                "\nTo use a tool, respond with a single line:\n{} <tool_name> <query>\n",
                TOOL_REQUEST_MARKER
            ));
        }

        if agent.allow_delegation() {
            let coworkers: Vec<&str> = request.coworkers().map(|a| a.role()).collect();
            if !coworkers.is_empty() {
                prompt.push_str(&format!(
                    "\nYou can ask a coworker for help: {}.\nTo do so, respond with a single line:\n{} <coworker role> | <question>\n",
                    coworkers.join(", "),
                    DELEGATE_MARKER
                ));
            }
        }

        prompt.push_str(&format!(
            "\nOnly one request per response. When you know the answer, respond with '{}' followed by your complete answer.",
            FINAL_ANSWER_MARKER
        ));
        prompt
    }

    fn task_prompt(request: &AgentRequest<'_>) -> String {
        let mut prompt = String::new();
        prompt.push_str("Current task: ");
        prompt.push_str(request.task_description);
        prompt.push_str("\n\nThis is the expected output of your work: ");
        prompt.push_str(request.expected_output);
        if !request.context.trim().is_empty() {
            prompt.push_str("\n\nThis is the context you are working with:\n");
            prompt.push_str(&request.context);
        }
        prompt.push_str("\n\nBegin! This is very important to you, do your best.");
        prompt
    }

    async fn run_tool(
        &self,
        agent: &Agent,
        tool_name: &str,
        query: &str,
        cache: &mut HashMap<(String, String), String>,
    ) -> String {
        let key = (tool_name.to_string(), query.to_string());
        if agent.cache_enabled() {
            if let Some(cached) = cache.get(&key) {
                debug!("Tool cache hit for {} '{}'", tool_name, query);
                return cached.clone();
            }
        }

        let Some(tool) = agent.tool(tool_name) else {
            let available: Vec<&str> = agent.tools().iter().map(|t| t.name()).collect();
            return format!(
                "Tool '{}' is not available to you. Available tools: {}",
                tool_name,
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            );
        };

        info!("{} calls {} '{}'", agent.role(), tool_name, query);
        let message = match tool.search(query).await {
            Ok(results) if results.is_empty() => {
                format!("Tool {} found no results for '{}'.", tool_name, query)
            }
            Ok(results) => {
                let rendered = results
                    .iter()
                    .enumerate()
                    .map(|(i, r)| format!("{}. {}", i + 1, r))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                format!(
                    "Result of {} '{}':\n{}",
                    tool_name,
                    query,
                    truncate_chars(&rendered, MAX_TOOL_RESULT_CHARS)
                )
            }
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                return format!("Tool {} failed: {}", tool_name, e);
            }
        };

        if agent.cache_enabled() {
            cache.insert(key, message.clone());
        }
        message
    }

    async fn delegate(
        &self,
        request: &AgentRequest<'_>,
        coworker_role: &str,
        question: &str,
    ) -> Result<String> {
        if !request.agent.allow_delegation() {
            return Ok(format!(
                "You are not allowed to delegate. Use your tools or give your {}",
                FINAL_ANSWER_MARKER
            ));
        }

        let Some(coworker) = request
            .coworkers()
            .find(|a| a.role().eq_ignore_ascii_case(coworker_role))
        else {
            let roles: Vec<&str> = request.coworkers().map(|a| a.role()).collect();
            return Ok(format!(
                "There is no coworker named '{}'. Coworkers: {}",
                coworker_role,
                roles.join(", ")
            ));
        };

        info!("{} delegates to {}: {}", request.agent.role(), coworker.role(), question);
        let messages = vec![
            ChatMessage::system(&format!(
                "You are {}. {}\nYour personal goal is: {}\n\n{}",
                coworker.role(),
                coworker.backstory(),
                coworker.goal(),
                COWORKER_SYSTEM_PROMPT
            )),
            ChatMessage::user(&format!(
                "Question from {}: {}\n\nContext:\n{}",
                request.agent.role(),
                question,
                request.context
            )),
        ];
        let answer = self.llm_client.call_llm_api(messages).await?;
        Ok(format!("Answer from {}:\n{}", coworker.role(), answer))
    }
}

#[async_trait]
impl AgentExecutor for LlmAgentExecutor {
    async fn execute(&self, request: &AgentRequest<'_>) -> Result<String> {
        let agent = request.agent;
        let mut conversation = vec![
            ChatMessage::system(&Self::system_prompt(request)),
            ChatMessage::user(&Self::task_prompt(request)),
        ];
        let mut cache = HashMap::new();

        for iteration in 0..=self.max_iterations {
            if iteration == self.max_iterations {
                conversation.push(ChatMessage::user(&format!(
                    "You have used all your tool calls. Give your {} now.",
                    FINAL_ANSWER_MARKER
                )));
            }

            let response = self
                .llm_client
                .call_llm_with_format_check(
                    &mut conversation,
                    PINNED_MESSAGES,
                    is_well_formed,
                    AGENT_FORMAT_REMINDER,
                    MAX_FORMAT_RETRIES,
                )
                .await?;
            conversation.push(ChatMessage::assistant(&response));

            let feedback = match parse_reply(&response) {
                Some(AgentReply::Final(answer)) => {
                    debug!("{} final answer: {}", agent.role(), answer);
                    return Ok(answer);
                }
                Some(AgentReply::ToolRequest { tool, query }) => {
                    self.run_tool(agent, &tool, &query, &mut cache).await
                }
                Some(AgentReply::Delegate { coworker, question }) => {
                    self.delegate(request, &coworker, &question).await?
                }
                None => AGENT_FORMAT_REMINDER.to_string(),
            };
            conversation.push(ChatMessage::user(&feedback));
        }

        Err(Error::Llm(format!(
            "{} did not give a final answer after {} tool calls",
            agent.role(),
            self.max_iterations
        )))
    }
}
