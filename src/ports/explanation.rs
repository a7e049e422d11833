//! # Explanation Port

use crate::error::{AdapterError, AdapterErrorKind};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::warn;

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Error: GEMINI_API_KEY not found. Please check your .env file.";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Error: Could not connect to the explanation service.";
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "Error: The explanation service gave an unexpected response.";

/// Human-readable message shown in place of an explanation for each failure kind
#[must_use]
pub const fn sentinel_message(kind: AdapterErrorKind) -> &'static str {
    match kind {
        AdapterErrorKind::ConfigurationMissing => MISSING_CREDENTIAL_MESSAGE,
        AdapterErrorKind::TransportFailure => TRANSPORT_FAILURE_MESSAGE,
        AdapterErrorKind::MalformedResponse => MALFORMED_RESPONSE_MESSAGE,
    }
}

/// Plain-language explanation of a dataset
#[async_trait]
pub trait ExplanationPort: Send + Sync + Debug {
    /// Generate a short explanation (at most three sentences) of the dataset
    /// described by `title` and `summary`. The returned text is trimmed.
    async fn try_explain(&self, title: &str, summary: &str) -> Result<String, AdapterError>;

    /// Like [`try_explain`](Self::try_explain) but folds failures into the
    /// text channel using [`sentinel_message`].
    async fn explain(&self, title: &str, summary: &str) -> String {
        match self.try_explain(title, summary).await {
            Ok(explanation) => explanation,
            Err(e) => {
                warn!(kind = %e.kind(), "Explanation failed: {}", e);
                sentinel_message(e.kind()).to_string()
            }
        }
    }
}
