pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod ports;
pub mod server;

pub use adapters::{DatasetSearchAdapter, ExplanationAdapter};
pub use client::{DatasetSummary, KeywordQuery};
pub use config::{Config, ConfigOverrides, LogFormat};
pub use error::{AdapterError, AdapterErrorKind, Error, Result};
pub use ports::{DatasetSearchPort, ExplanationPort};
pub use server::Server;
