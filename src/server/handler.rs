use crate::client::DatasetSummary;
use crate::config::ServerConfig;
use crate::error::{AdapterError, AdapterErrorKind};
use crate::ports::{sentinel_message, DatasetSearchPort, ExplanationPort};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

/// Shared handler state: the two outbound ports
#[derive(Debug, Clone)]
pub struct AppState {
    pub dataset_search: Arc<dyn DatasetSearchPort>,
    pub explanation: Arc<dyn ExplanationPort>,
}

impl AppState {
    #[must_use]
    pub fn new(
        dataset_search: Arc<dyn DatasetSearchPort>,
        explanation: Arc<dyn ExplanationPort>,
    ) -> Self {
        Self {
            dataset_search,
            explanation,
        }
    }
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

/// Body of `POST /explain`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub datasets: Vec<DatasetSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AdapterErrorKind>,
}

/// Handler failure, rendered as an [`ErrorResponse`]
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request fields
    BadRequest(String),
    /// The outbound service call failed
    Upstream {
        error: AdapterError,
        message: &'static str,
    },
}

impl ApiError {
    fn missing_field(field: &str) -> Self {
        Self::BadRequest(format!("missing required field: {field}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    status: ResponseStatus::Error,
                    message,
                    kind: None,
                },
            ),
            Self::Upstream { error, message } => {
                let kind = error.kind();
                let status = match kind {
                    AdapterErrorKind::ConfigurationMissing => StatusCode::SERVICE_UNAVAILABLE,
                    AdapterErrorKind::TransportFailure | AdapterErrorKind::MalformedResponse => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (
                    status,
                    ErrorResponse {
                        status: ResponseStatus::Error,
                        message: message.to_string(),
                        kind: Some(kind),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

const fn dataset_search_message(kind: AdapterErrorKind) -> &'static str {
    match kind {
        AdapterErrorKind::ConfigurationMissing => {
            "Error: The dataset search service is not configured."
        }
        AdapterErrorKind::TransportFailure => {
            "Error: Could not connect to the dataset search service."
        }
        AdapterErrorKind::MalformedResponse => {
            "Error: The dataset search service gave an unexpected response."
        }
    }
}

/// Build the HTTP router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/recommend", post(recommend_handler))
        .route("/explain", post(explain_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.allowed_origins)),
        )
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[instrument(skip_all)]
async fn recommend_handler(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    info!("Received a request for recommendations");

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let keywords = request
        .keywords
        .ok_or_else(|| ApiError::missing_field("keywords"))?;

    let datasets = state
        .dataset_search
        .try_search(&keywords)
        .await
        .map_err(|error| {
            warn!(kind = %error.kind(), "Dataset search failed: {}", error);
            ApiError::Upstream {
                message: dataset_search_message(error.kind()),
                error,
            }
        })?;

    Ok(Json(RecommendResponse {
        status: ResponseStatus::Success,
        message: format!("Found {} datasets.", datasets.len()),
        datasets,
    }))
}

#[instrument(skip_all)]
async fn explain_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    info!("Received a request for an explanation");

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field("title"))?;
    let summary = request
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field("summary"))?;

    let explanation = state
        .explanation
        .try_explain(&title, &summary)
        .await
        .map_err(|error| {
            warn!(kind = %error.kind(), "Explanation failed: {}", error);
            ApiError::Upstream {
                message: sentinel_message(error.kind()),
                error,
            }
        })?;

    Ok(Json(ExplainResponse {
        status: ResponseStatus::Success,
        message: "Explanation generated.".to_string(),
        explanation,
    }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_codes() {
        let response = ApiError::BadRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Upstream {
            error: AdapterError::MissingCredential { service: "gemini" },
            message: "missing",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = ApiError::Upstream {
            error: AdapterError::Status {
                service: "cmr",
                status: 500,
            },
            message: "down",
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_request_bodies_tolerate_missing_fields() {
        let request: RecommendRequest = serde_json::from_str("{}").unwrap();
        assert!(request.keywords.is_none());

        let request: ExplainRequest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("T"));
        assert!(request.summary.is_none());
    }
}
