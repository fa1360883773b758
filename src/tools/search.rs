use super::Tool;
use crate::constants::{SERPER_SEARCH_URL, WEB_SEARCH_TOOL};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

/// Web search through the Serper Google search API
#[derive(Debug)]
pub struct SearchTool {
    client: Client,
    api_key: String,
    endpoint: Url,
    /// Number of organic results requested per query
    num_results: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default, rename = "answerBox")]
    answer_box: Option<AnswerBox>,
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl SearchTool {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_endpoint(api_key, SERPER_SEARCH_URL)
    }

    pub fn with_endpoint(api_key: &str, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid search endpoint '{}': {}", endpoint, e)))?;
        Ok(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            endpoint,
            num_results: 5,
        })
    }

    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }
}

/// Renders a Serper response body as one entry per result
fn parse_results(body: &str, limit: usize) -> Result<Vec<String>> {
    let response: SerperResponse = serde_json::from_str(body)?;
    let mut results = Vec::new();

    if let Some(answer) = response
        .answer_box
        .and_then(|a| a.answer.or(a.snippet))
        .filter(|a| !a.trim().is_empty())
    {
        results.push(format!("Answer: {}", answer));
    }

    results.extend(
        response
            .organic
            .into_iter()
            .take(limit)
            .map(|r| format!("Title: {}\nLink: {}\nSnippet: {}", r.title, r.link, r.snippet)),
    );
    Ok(results)
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        WEB_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        "Searches the internet and returns the top results. Usage: web_search <query>"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        debug!("Web search: {}", query);
        let res = self
            .client
            .post(self.endpoint.clone())
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": self.num_results }))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(Error::Tool {
                tool: WEB_SEARCH_TOOL.to_string(),
                reason: format!("search API returned {}: {}", status, body),
            });
        }

        let results = parse_results(&body, self.num_results)?;
        info!("Web search '{}' -> {} results", query, results.len());
        Ok(results)
    }
}
