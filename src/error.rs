use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (permanent failures)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Environment error: {0}")]
    Environment(#[from] envy::Error),

    // I/O errors (potentially transient)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors (usually permanent)
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // HTTP client construction and transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Outbound adapter failures
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    // Client errors (permanent - don't retry)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    // General service error
    #[error("Service error: {0}")]
    Service(String),
}

/// Error categorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Permanent errors - repeating the call will not help
    Permanent,
    /// Transient errors - the remote side may recover
    Transient,
}

impl Error {
    /// Categorize error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_)
            | Self::Environment(_)
            | Self::InvalidInput { .. }
            | Self::Serde(_) => ErrorCategory::Permanent,

            Self::Adapter(err) => match err.kind() {
                AdapterErrorKind::TransportFailure => ErrorCategory::Transient,
                AdapterErrorKind::ConfigurationMissing | AdapterErrorKind::MalformedResponse => {
                    ErrorCategory::Permanent
                }
            },

            Self::Http(_) | Self::Io(_) | Self::Service(_) => ErrorCategory::Transient,
        }
    }

    /// Check if the failed operation may succeed on a later attempt
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Kind of an adapter failure, stable across variants and exposed to HTTP clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterErrorKind {
    /// A credential or setting required before any network call is absent
    ConfigurationMissing,
    /// DNS, connect, timeout or non-success status
    TransportFailure,
    /// The remote answered 2xx but the body did not have the expected shape
    MalformedResponse,
}

impl AdapterErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::TransportFailure => "transport_failure",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the outbound service adapters
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{service} credential is not configured")]
    MissingCredential { service: &'static str },

    #[error("request to {service} timed out")]
    Timeout { service: &'static str },

    #[error("request to {service} failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} responded with HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("unexpected response from {service}: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

impl AdapterError {
    #[must_use]
    pub const fn kind(&self) -> AdapterErrorKind {
        match self {
            Self::MissingCredential { .. } => AdapterErrorKind::ConfigurationMissing,
            Self::Timeout { .. } | Self::Transport { .. } | Self::Status { .. } => {
                AdapterErrorKind::TransportFailure
            }
            Self::Malformed { .. } => AdapterErrorKind::MalformedResponse,
        }
    }

    /// Name of the remote service the failure relates to
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::MissingCredential { service }
            | Self::Timeout { service }
            | Self::Transport { service, .. }
            | Self::Status { service, .. }
            | Self::Malformed { service, .. } => service,
        }
    }

    /// Classify a `reqwest` failure. The URL is stripped so query-string
    /// credentials never end up in messages or logs.
    #[must_use]
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { service }
        } else if let Some(status) = err.status() {
            Self::Status {
                service,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Self::Malformed {
                service,
                message: err.without_url().to_string(),
            }
        } else {
            Self::Transport {
                service,
                message: err.without_url().to_string(),
            }
        }
    }

    pub(crate) fn malformed(service: &'static str, err: &serde_json::Error) -> Self {
        Self::Malformed {
            service,
            message: err.to_string(),
        }
    }
}
