//! # Dataset Search Port

use crate::client::DatasetSummary;
use crate::error::AdapterError;
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::warn;

/// Keyword search over a dataset catalog
#[async_trait]
pub trait DatasetSearchPort: Send + Sync + Debug {
    /// Search for datasets matching all `keywords`.
    ///
    /// Blank keywords are ignored. An empty keyword list returns an empty
    /// result without contacting the catalog. Results keep the catalog's
    /// relevance order.
    async fn try_search(&self, keywords: &[String]) -> Result<Vec<DatasetSummary>, AdapterError>;

    /// Like [`try_search`](Self::try_search) but never fails: errors are
    /// logged and an empty list is returned.
    async fn search(&self, keywords: &[String]) -> Vec<DatasetSummary> {
        match self.try_search(keywords).await {
            Ok(datasets) => datasets,
            Err(e) => {
                warn!(kind = %e.kind(), "Dataset search failed: {}", e);
                Vec::new()
            }
        }
    }
}
