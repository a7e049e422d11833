//! # Dataset Search Adapter
//!
//! `DatasetSearchPort` backed by the NASA CMR collection search.

use crate::client::cmr::{CmrResponse, SERVICE};
use crate::client::{DatasetSummary, HttpClientConfig, KeywordQuery};
use crate::config::DatasetSearchConfig;
use crate::error::AdapterError;
use crate::ports::DatasetSearchPort;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// CMR collection search adapter
#[derive(Clone)]
pub struct DatasetSearchAdapter {
    client: Client,
    config: DatasetSearchConfig,
}

impl std::fmt::Debug for DatasetSearchAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSearchAdapter")
            .field("client", &"reqwest::Client")
            .field("config", &self.config)
            .finish()
    }
}

impl DatasetSearchAdapter {
    /// Create a new adapter. Requests time out after `config.timeout_secs`.
    pub fn new(config: DatasetSearchConfig) -> Result<Self> {
        info!("Initializing DatasetSearchAdapter for {}", config.endpoint);

        let client = HttpClientConfig::with_timeout_secs(config.timeout_secs).build()?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &DatasetSearchConfig {
        &self.config
    }
}

#[async_trait]
impl DatasetSearchPort for DatasetSearchAdapter {
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    async fn try_search(
        &self,
        keywords: &[String],
    ) -> std::result::Result<Vec<DatasetSummary>, AdapterError> {
        let query = KeywordQuery::new(keywords);
        if query.is_empty() {
            debug!("No keywords given, skipping CMR search");
            return Ok(Vec::new());
        }

        let search_string = query.search_string();
        let page_size = self.config.page_size.to_string();
        info!("Searching NASA CMR for datasets with keywords: '{}'", search_string);

        let start_time = Instant::now();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("keyword", search_string.as_str()),
                ("page_size", page_size.as_str()),
                ("sort_key", self.config.sort_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AdapterError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdapterError::from_reqwest(SERVICE, e))?;
        let parsed: CmrResponse =
            serde_json::from_slice(&body).map_err(|e| AdapterError::malformed(SERVICE, &e))?;

        let datasets = parsed.into_summaries();
        info!(
            "CMR search completed: {} datasets found in {:?}",
            datasets.len(),
            start_time.elapsed()
        );

        Ok(datasets)
    }
}
