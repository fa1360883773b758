use crate::constants::MAX_CONVERSATION_CHARS;
use crate::errors::{Error, Result};
use crate::llm::providers::openai::OpenAiProvider;
use crate::llm::providers::LlmProvider;
use crate::llm::ChatMessage;
use crate::utils::manage_token_count;
use tracing::{debug, info};

/// Generic LLM client that delegates work to a concrete provider.
#[derive(Debug)]
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
}

impl LlmClient {
    /// Creates a client backed by OpenAI's chat completions API
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name to use with the provider
    pub fn openai(api_key: &str, model: &str) -> Self {
        Self::with_provider(Box::new(OpenAiProvider::new(api_key, model)))
    }

    pub fn with_provider(provider: Box<dyn LlmProvider>) -> Self {
        LlmClient { provider }
    }

    /// Sends the conversation to the provider and returns the raw response.
    pub async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.provider.call_llm_api(messages).await
    }

    /// Calls the LLM with format validation and automatic retries if format check fails.
    ///
    /// # Arguments
    /// * `messages` - Conversation so far; retry reminders are appended to it
    /// * `keep_leading` - Leading messages never dropped when the conversation is trimmed
    /// * `validate_response` - Function to validate response format
    /// * `format_reminder` - Format instructions to include in retry attempts
    /// * `max_retries` - Maximum number of attempts
    ///
    /// # Returns
    /// * `Result<String>` - Validated LLM response or error
    pub async fn call_llm_with_format_check<F>(
        &self,
        messages: &mut Vec<ChatMessage>,
        keep_leading: usize,
        validate_response: F,
        format_reminder: &str,
        max_retries: usize,
    ) -> Result<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut attempts = 0;

        manage_token_count(messages, MAX_CONVERSATION_CHARS, keep_leading);

        loop {
            attempts += 1;
            let response = self.call_llm_api(messages.clone()).await?;
            debug!("LLM response: {}", response);

            if validate_response(&response) {
                return Ok(response);
            } else if attempts >= max_retries {
                info!(
                    "LLM did not follow the format after {} attempts response: {}",
                    max_retries, response
                );
                return Err(Error::Llm(format!(
                    "LLM did not follow the format after {} attempts",
                    max_retries
                )));
            } else {
                let retry_message = format!(
                    "Your last answer did not follow the required format.\n\
                     {} \n\
                     Please provide a new answer following exactly these formatting rules.",
                    format_reminder
                );
                messages.push(ChatMessage::assistant(&response));
                messages.push(ChatMessage::user(&retry_message));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider replaying canned responses and recording every conversation
    #[derive(Debug, Default)]
    pub struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
        pub seen: std::sync::Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl ScriptedProvider {
        pub fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
                seen: Default::default(),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String> {
            self.seen.lock().unwrap().push(messages);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Llm("script exhausted".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;

    #[tokio::test]
    async fn format_check_retries_with_reminder() {
        let provider = ScriptedProvider::new(&["hello", "Final Answer: ok"]);
        let seen = provider.seen.clone();
        let client = LlmClient::with_provider(Box::new(provider));
        let mut messages = vec![ChatMessage::user("go")];

        let response = client
            .call_llm_with_format_check(
                &mut messages,
                0,
                |r| r.starts_with("Final Answer:"),
                "Start with 'Final Answer:'",
                2,
            )
            .await
            .unwrap();

        assert_eq!(response, "Final Answer: ok");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[1]
            .last()
            .unwrap()
            .content
            .contains("Start with 'Final Answer:'"));
    }

    #[tokio::test]
    async fn format_check_gives_up_after_max_retries() {
        let provider = ScriptedProvider::new(&["nope", "still nope"]);
        let client = LlmClient::with_provider(Box::new(provider));
        let mut messages = vec![ChatMessage::user("go")];

        let err = client
            .call_llm_with_format_check(&mut messages, 0, |_| false, "", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Llm(_)));
    }
}
