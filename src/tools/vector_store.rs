use crate::errors::Result;
use crate::llm::Embedder;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A document chunk with its embedding vector representation
#[derive(Clone, Debug)]
pub struct DocumentEmbedding {
    /// Unique identifier for the chunk
    pub id: String,
    /// Vector embedding of the chunk content
    pub embedding: Vec<f32>,
    /// Original text content of the chunk
    pub content: String,
}

/// In-memory implementation of a vector store
pub struct InMemoryVectorStore {
    /// Stored chunks with their embeddings
    documents: Vec<DocumentEmbedding>,
    /// Embedder used to convert text to vectors
    embedder: Arc<dyn Embedder>,
}

impl fmt::Debug for InMemoryVectorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryVectorStore")
            .field("documents", &self.documents.len())
            .finish()
    }
}

impl InMemoryVectorStore {
    /// Creates a new empty vector store with the given embedder
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            documents: Vec::new(),
            embedder,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Calculates cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }

    /// Embeds and stores a batch of chunks
    pub async fn add_documents(&mut self, chunks: Vec<String>) -> Result<()> {
        let embeddings = self.embedder.embed_batch(&chunks).await?;
        for (content, embedding) in chunks.into_iter().zip(embeddings) {
            let id = format!("chunk-{}", self.documents.len() + 1);
            self.documents.push(DocumentEmbedding {
                id,
                embedding,
                content,
            });
        }
        debug!("Vector store now holds {} chunks", self.documents.len());
        Ok(())
    }

    /// Searches for the `top_k` chunks most similar to `query`
    pub async fn search_documents(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<DocumentEmbedding>> {
        debug!("Searching {} chunks for: {}", self.documents.len(), query);
        let query_embedding = self.embedder.embed_text(query).await?;
        let mut scored: Vec<(f32, &DocumentEmbedding)> = self
            .documents
            .iter()
            .map(|doc| (Self::cosine_similarity(&query_embedding, &doc.embedding), doc))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::LetterEmbedder;
    use super::*;

    #[tokio::test]
    async fn search_ranks_by_similarity() {
        let mut store = InMemoryVectorStore::new(Arc::new(LetterEmbedder));
        store
            .add_documents(vec![
                "zzzz yyyy".to_string(),
                "banner impression".to_string(),
                "xxxx".to_string(),
            ])
            .await
            .unwrap();

        let results = store.search_documents("banner", 2).await.unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "banner impression");
        assert_eq!(results[0].id, "chunk-2");
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(InMemoryVectorStore::cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
