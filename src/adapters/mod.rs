//! # Adapters Module
//!
//! Concrete implementations of the port interfaces in [`crate::ports`].
//! Each adapter wraps a single outbound HTTP service:
//!
//! - [`DatasetSearchAdapter`] - NASA CMR collection search
//! - [`ExplanationAdapter`] - Gemini `generateContent`
//!
//! Adapters receive their configuration section at construction and keep no
//! mutable state, so one instance can serve concurrent requests.
//!
//! ```rust,no_run
//! use nasa_data_guide::adapters::DatasetSearchAdapter;
//! use nasa_data_guide::ports::DatasetSearchPort;
//! use nasa_data_guide::Config;
//!
//! # async fn run() -> nasa_data_guide::Result<()> {
//! let config = Config::default();
//! let adapter = DatasetSearchAdapter::new(config.dataset_search)?;
//! let datasets = adapter.search(&["Mars".to_string(), "atmosphere".to_string()]).await;
//! # Ok(())
//! # }
//! ```

pub mod dataset_search_adapter;
pub mod explanation_adapter;

pub use dataset_search_adapter::DatasetSearchAdapter;
pub use explanation_adapter::ExplanationAdapter;
