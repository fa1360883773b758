/// Module for OpenAI embedder implementation
pub mod openai_embedder;

use crate::errors::Result;
use async_trait::async_trait;

pub use openai_embedder::*;

/// Trait defining interface for text embedding functionality
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds the given text into a vector of floating point numbers
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds several texts, preserving their order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_text(text).await?);
        }
        Ok(embeddings)
    }
}
