use super::{InMemoryVectorStore, Tool};
use crate::constants::SPEC_SEARCH_TOOL;
use crate::errors::{Error, Result};
use crate::llm::Embedder;
use crate::utils::chunk_text;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// How the reference document is split and searched
#[derive(Debug, Clone)]
pub struct RetrievalOptions {
    /// Passages returned per query
    pub top_k: usize,
    /// Chunk length in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for RetrievalOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            chunk_size: 1200,
            chunk_overlap: 200,
        }
    }
}

/// Passage search over a fixed reference document.
///
/// The document is indexed once at startup. When it cannot be loaded the tool
/// stays registered but every search fails with the load error.
#[derive(Debug)]
pub struct RetrievalTool {
    source: PathBuf,
    description: String,
    top_k: usize,
    index: std::result::Result<InMemoryVectorStore, String>,
}

impl RetrievalTool {
    /// Loads, chunks and embeds the document at `path`
    pub async fn load(path: &Path, embedder: Arc<dyn Embedder>, options: RetrievalOptions) -> Self {
        let index = match Self::build_index(path, embedder, &options).await {
            Ok(store) => {
                info!(
                    "Indexed reference document {} ({} chunks)",
                    path.display(),
                    store.len()
                );
                Ok(store)
            }
            Err(e) => {
                error!(
                    "Reference document {} is unusable, document search disabled: {}",
                    path.display(),
                    e
                );
                Err(e.to_string())
            }
        };

        Self {
            source: path.to_path_buf(),
            description: format!(
                "Semantic search over the reference document '{}'. Usage: {} <question or keywords>",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
                SPEC_SEARCH_TOOL
            ),
            top_k: options.top_k,
            index,
        }
    }

    async fn build_index(
        path: &Path,
        embedder: Arc<dyn Embedder>,
        options: &RetrievalOptions,
    ) -> Result<InMemoryVectorStore> {
        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || load_document(&owned))
            .await
            .map_err(|e| Error::Tool {
                tool: SPEC_SEARCH_TOOL.to_string(),
                reason: format!("reading {} crashed: {}", path.display(), e),
            })??;
        let chunks = chunk_text(&text, options.chunk_size, options.chunk_overlap);
        if chunks.is_empty() {
            return Err(Error::Tool {
                tool: SPEC_SEARCH_TOOL.to_string(),
                reason: format!("{} contains no text", path.display()),
            });
        }
        let mut store = InMemoryVectorStore::new(embedder);
        store.add_documents(chunks).await?;
        Ok(store)
    }

    pub fn is_available(&self) -> bool {
        self.index.is_ok()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Reads the text of a reference document; PDFs are converted to text
pub fn load_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::Config(format!(
            "reference document not found at path: {}",
            path.display()
        )));
    }

    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        pdf_extract::extract_text(path).map_err(|e| Error::Tool {
            tool: SPEC_SEARCH_TOOL.to_string(),
            reason: format!("failed to read PDF {}: {}", path.display(), e),
        })
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[async_trait]
impl Tool for RetrievalTool {
    fn name(&self) -> &str {
        SPEC_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        let store = self.index.as_ref().map_err(|reason| Error::Tool {
            tool: SPEC_SEARCH_TOOL.to_string(),
            reason: reason.clone(),
        })?;
        let results = store.search_documents(query, self.top_k).await?;
        Ok(results.into_iter().map(|doc| doc.content).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::LetterEmbedder;
    use std::io::Write;

    fn options() -> RetrievalOptions {
        RetrievalOptions {
            top_k: 1,
            chunk_size: 40,
            chunk_overlap: 0,
        }
    }

    #[tokio::test]
    async fn missing_document_leaves_tool_unusable() {
        let tool = RetrievalTool::load(
            Path::new("/nonexistent/ortb_spec.pdf"),
            Arc::new(LetterEmbedder),
            options(),
        )
        .await;

        assert!(!tool.is_available());
        let err = tool.search("imp").await.unwrap_err();
        assert!(matches!(err, Error::Tool { ref reason, .. } if reason.contains("not found")));
    }

    #[tokio::test]
    async fn corrupt_pdf_leaves_tool_unusable() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\nthis is not really a pdf\n%%EOF").unwrap();

        let tool = RetrievalTool::load(file.path(), Arc::new(LetterEmbedder), options()).await;

        assert!(!tool.is_available());
        assert!(matches!(tool.search("imp").await, Err(Error::Tool { .. })));
    }

    #[tokio::test]
    async fn text_document_is_indexed_and_searchable() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(
            file,
            "{}{}",
            "qqqq wwww qqqq wwww qqqq wwww qqqq wwww ",
            "The banner object describes an ad slot."
        )
        .unwrap();

        let tool = RetrievalTool::load(file.path(), Arc::new(LetterEmbedder), options()).await;

        assert!(tool.is_available());
        let passages = tool.search("banner ad slot object").await.unwrap();
        assert_eq!(passages.len(), 1);
        assert!(passages[0].contains("banner"));
    }
}
