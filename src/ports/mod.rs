//! # Ports Module
//!
//! Port interfaces between the request shell and the outbound services.
//! The server depends only on these traits; the concrete HTTP adapters live
//! in [`crate::adapters`] and tests substitute stubs.
//!
//! Every port has a structured `try_*` operation returning
//! [`AdapterError`](crate::error::AdapterError) on failure, and a lenient
//! counterpart that never fails and reports problems through logging.

pub mod dataset_search;
pub mod explanation;

pub use dataset_search::DatasetSearchPort;
pub use explanation::{sentinel_message, ExplanationPort};
