use super::LlmProvider;
use crate::errors::{Error, Result};
use crate::llm::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Provider implementation for OpenAI's chat completions API
#[derive(Debug)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    /// Model identifier to use (e.g. "gpt-4o")
    model: String,
    /// Sampling temperature sent with every request
    temperature: f32,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider instance
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `model` - The model identifier to use
    pub fn new(api_key: &str, model: &str) -> Self {
        OpenAiProvider {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.7,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn call_llm_api(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request_body = json!({
          "model": self.model,
          "messages": messages,
          "temperature": self.temperature
        });

        let res = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await?;
            return Err(Error::Llm(format!("OpenAI API error ({}): {}", status, text)));
        }

        let json_resp: serde_json::Value = res.json().await?;
        json_resp["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::Llm("No content in OpenAI LLM response".to_string()))
    }
}
