use super::Embedder;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI embedder implementation that uses OpenAI's API to generate text embeddings
#[derive(Debug)]
pub struct OpenAIEmbedder {
    client: Client,
    /// OpenAI API key used for authentication
    api_key: String,
    /// Name of the OpenAI model to use for embeddings
    pub model: String,
}

impl OpenAIEmbedder {
    /// Creates a new OpenAIEmbedder instance
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Name of the OpenAI model to use
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn request(&self, input: Value) -> Result<Value> {
        let body = json!({
            "input": input,
            "model": self.model
        });

        let res = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let txt = res.text().await?;
            return Err(Error::Llm(format!("Error from OpenAI: {}", txt)));
        }

        Ok(res.json().await?)
    }
}

/// Reads one `embedding` array from an embeddings API data item
fn parse_embedding(item: &Value) -> Result<Vec<f32>> {
    let arr = item["embedding"]
        .as_array()
        .ok_or_else(|| Error::Llm("No embedding in OpenAI response".to_string()))?;
    Ok(arr
        .iter()
        .filter_map(|x| x.as_f64())
        .map(|x| x as f32)
        .collect())
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let json_resp = self.request(json!(text)).await?;
        parse_embedding(&json_resp["data"][0])
    }

    /// Embeds all texts in a single API request
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let json_resp = self.request(json!(texts)).await?;
        let data = json_resp["data"]
            .as_array()
            .ok_or_else(|| Error::Llm("No data in OpenAI embeddings response".to_string()))?;

        let mut indexed = data
            .iter()
            .map(|item| Ok((item["index"].as_u64().unwrap_or(0), parse_embedding(item)?)))
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(index, _)| *index);

        if indexed.len() != texts.len() {
            return Err(Error::Llm(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                indexed.len()
            )));
        }
        Ok(indexed.into_iter().map(|(_, e)| e).collect())
    }
}
