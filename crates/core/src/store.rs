use crate::error::StoreError;
use crate::models::{DocumentChunk, ScoredChunk};
use async_trait::async_trait;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persists every chunk with its embedding; `embeddings[i]` belongs to `chunks[i]`.
    async fn add_chunks(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), StoreError>;

    /// Returns at most `k` stored chunks, closest first, with the store's score.
    async fn similarity_search_with_score(
        &self,
        query_vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredChunk>, StoreError>;
}
