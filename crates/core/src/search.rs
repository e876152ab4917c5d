use crate::error::SearchError;
use crate::models::ScoredChunk;
use crate::prompt::{build_context, build_prompt};
use crate::provider::ModelProvider;
use crate::store::VectorStore;
use tracing::debug;

pub const SEARCH_TOP_K: usize = 10;

/// Embeds a question, fetches the nearest chunks and renders the answer prompt.
pub struct SearchPipeline<'a> {
    provider: &'a dyn ModelProvider,
    store: &'a dyn VectorStore,
}

impl<'a> SearchPipeline<'a> {
    pub fn new(provider: &'a dyn ModelProvider, store: &'a dyn VectorStore) -> Self {
        Self { provider, store }
    }

    /// Results come back in store order (closest first); they are not re-sorted.
    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredChunk>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let query_vector = self.provider.embed(query).await?;
        let results = self
            .store
            .similarity_search_with_score(&query_vector, k)
            .await?;

        debug!(k, hits = results.len(), "similarity search finished");
        Ok(results)
    }

    pub async fn search_prompt(&self, question: &str) -> Result<String, SearchError> {
        let results = self
            .similarity_search_with_score(question, SEARCH_TOP_K)
            .await?;
        Ok(build_prompt(&build_context(&results), question))
    }
}
