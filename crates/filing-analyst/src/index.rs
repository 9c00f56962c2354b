//! Per-filing retrieval index for question answering

use crate::error::{FilingError, Result};
use filing_llm::{EmbeddingProvider, cosine_similarity};
use tracing::{debug, instrument};

/// Text chunk with its embedding
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Chunk returned by a search, with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredChunk<'a> {
    pub text: &'a str,
    pub score: f32,
}

/// Ordered chunks of one filing, searchable by embedding similarity
#[derive(Debug, Clone)]
pub struct RetrievalIndex {
    ticker: String,
    chunks: Vec<IndexedChunk>,
}

impl RetrievalIndex {
    /// Embed every chunk and build the index
    #[instrument(skip(chunks, embedder), fields(chunks = chunks.len()))]
    pub async fn build(
        ticker: &str,
        chunks: Vec<String>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(FilingError::Other(format!(
                "Filing text for {ticker} is empty; nothing to index."
            )));
        }

        let embeddings = embedder.embed(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(FilingError::Other(format!(
                "Embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let chunks: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| IndexedChunk { text, embedding })
            .collect();
        debug!("Indexed {} chunks for {}", chunks.len(), ticker);

        Ok(Self {
            ticker: ticker.to_string(),
            chunks,
        })
    }

    /// Ticker the index was built for
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index has no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The `top_k` chunks most similar to the query, best first
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk<'_>> {
        let mut scored: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                text: &chunk.text,
                score: cosine_similarity(query, &chunk.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }
}
