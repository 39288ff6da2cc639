//! API route handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, FEATURE_NAMES};
use crate::error::PredictError;
use crate::model::NUM_FEATURES;
use crate::predictor::Predictor;
use crate::storage::HorseRepository;
use crate::types::{ErrorResponse, HealthResponse, ModelInfoResponse, RaceEntry, RankedHorse};

/// Application state shared across handlers.
pub struct AppState {
    pub predictor: Predictor,
    pub horses: Arc<HorseRepository>,
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "input_error",
            message: msg.into(),
        }
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            kind: "timeout",
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            kind: "internal_error",
            message: msg.into(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        let status = match &err {
            PredictError::EmptyRace | PredictError::MalformedEntryId(_) => {
                StatusCode::BAD_REQUEST
            }
            PredictError::HorseNotFound { .. } => StatusCode::NOT_FOUND,
            PredictError::Storage(_) | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Model info endpoint.
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model_path: state.config.model.path.clone(),
        num_features: NUM_FEATURES,
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Prediction endpoint.
///
/// The whole resolve, build, normalize, score and rank pipeline runs on a
/// blocking worker and is bounded by the configured request timeout; a race
/// that blows the budget fails with 504 and no partial ranking.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(entries): Json<Vec<RaceEntry>>,
) -> Result<Json<Vec<RankedHorse>>, ApiError> {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let predictor = state.predictor.clone();

    let task = tokio::task::spawn_blocking(move || predictor.predict_race(&entries));
    let ranked = tokio::time::timeout(timeout, task)
        .await
        .map_err(|_| ApiError::timeout("Prediction timed out"))?
        .map_err(|e| ApiError::internal(format!("Prediction task failed: {}", e)))??;

    Ok(Json(ranked))
}

/// Query parameters for horse name autocompletion.
#[derive(Debug, Deserialize)]
pub struct CompleteParams {
    q: Option<String>,
    limit: Option<String>,
}

/// Horse name autocompletion endpoint.
///
/// Returns `[id, full_name, age]` triples where `id` is the
/// `"<firstWord>,<ageDigits>"` form the prediction endpoint accepts.
pub async fn complete_horses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompleteParams>,
) -> Result<Json<Vec<(String, String, String)>>, ApiError> {
    let q = params
        .q
        .ok_or_else(|| ApiError::bad_request("You didn't specify a query."))?;

    // Default limit of 10 horses, clamped to 1..=100
    let limit = params
        .limit
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(10)
        .clamp(1, 100);

    let rows = state
        .horses
        .complete_names(&q, limit)
        .map_err(|e| ApiError::internal(format!("Horse store error: {}", e)))?;

    let digits = Regex::new(r"^\d+").unwrap();
    let mut suggestions = Vec::with_capacity(rows.len());
    for (name, age) in rows {
        // If the horse has an invalid age value in the store, skip it
        let Some(age_digits) = digits.find(&age) else {
            tracing::warn!("Skipping {} because of invalid age {:?}", name, age);
            continue;
        };
        let name_prefix = name.split(' ').next().unwrap_or(&name).to_string();

        suggestions.push((
            format!("{},{}", name_prefix, age_digits.as_str()),
            name.clone(),
            age_digits.as_str().to_string(),
        ));
    }

    Ok(Json(suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_error_status_mapping() {
        assert_eq!(
            ApiError::from(PredictError::EmptyRace).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PredictError::MalformedEntryId("x".to_string())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(PredictError::HorseNotFound {
                name_prefix: "Rainbow".to_string(),
                age_prefix: "5".to_string(),
            })
            .status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PredictError::Inference(anyhow::anyhow!("boom"))).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_kinds_follow_pipeline_kinds() {
        let err = ApiError::from(PredictError::EmptyRace);
        assert_eq!(err.kind, "input_error");

        let err = ApiError::from(PredictError::HorseNotFound {
            name_prefix: "Rainbow".to_string(),
            age_prefix: "5".to_string(),
        });
        assert_eq!(err.kind, "not_found");
    }

    #[test]
    fn test_constructed_error_statuses() {
        assert_eq!(
            ApiError::bad_request("").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::timeout("").status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::internal("").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
