pub mod cmr;
pub mod gemini;

use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration for the outbound services
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("nasa-data-guide/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Default settings with the given request timeout
    #[must_use]
    pub fn with_timeout_secs(secs: u64) -> Self {
        let timeout = Duration::from_secs(secs);
        Self {
            timeout,
            connect_timeout: timeout.min(Self::default().connect_timeout),
            ..Self::default()
        }
    }

    pub fn build(&self) -> Result<Client> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}

/// Cleaned-up keyword list for a dataset search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordQuery(Vec<String>);

impl KeywordQuery {
    /// Trim every token and drop the blank ones, keeping order
    #[must_use]
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self(
            keywords
                .iter()
                .map(|k| k.as_ref().trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.0
    }

    /// Space-separated search string sent as the `keyword` parameter
    #[must_use]
    pub fn search_string(&self) -> String {
        self.0.join(" ")
    }
}

impl std::fmt::Display for KeywordQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.search_string())
    }
}

/// Normalized dataset record returned by the dataset search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Dataset title
    pub title: String,
    /// Trimmed dataset description
    pub summary: String,
    /// Representative link, see [`cmr::select_link`]
    pub link: Option<String>,
}
