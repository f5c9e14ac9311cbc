//! Search backend abstraction.

use async_trait::async_trait;

use govbrnews_core::Result;

use crate::filter::Filter;
use crate::types::{CollectionInfo, NewsDocument, SearchParams, SearchResponse};

/// Abstraction over the full-text search engine holding the news collection.
///
/// Implementations are bound to a single collection. The trait allows the
/// temporal assembler and the tools to run against a scripted backend in
/// tests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Runs a search and returns hits, total and facet histograms.
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse>;

    /// Fetches one document by ID.
    ///
    /// Fails with a not-found error when the document does not exist.
    async fn get_document(&self, id: &str) -> Result<NewsDocument>;

    /// Fetches collection metadata.
    async fn collection_info(&self) -> Result<CollectionInfo>;

    /// True if the engine answers its health endpoint with `ok`.
    async fn health(&self) -> bool;

    /// Number of documents matching `query` under `filter`.
    async fn count(&self, query: &str, filter: &Filter) -> Result<u64> {
        let params = SearchParams::new(query)
            .with_filter(filter)
            .with_per_page(0);
        Ok(self.search(&params).await?.found)
    }

    /// Facet histograms for `fields`, without hits.
    async fn faceted_count(
        &self,
        query: &str,
        fields: &[&str],
        filter: &Filter,
        max_values: u32,
    ) -> Result<SearchResponse> {
        let params = SearchParams::new(query)
            .with_filter(filter)
            .with_facets(fields)
            .with_per_page(0)
            .with_max_facet_values(max_values);
        self.search(&params).await
    }
}
