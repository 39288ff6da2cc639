//! Request and response types for the Horis API.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// One horse in a submitted race
///
/// The `id` encodes the lookup key as `"<namePrefix>,<age>"`, the format
/// produced by the autocomplete endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceEntry {
    pub id: String,
    pub weight: f64,
    pub driver: String,
    pub start: i64,
    pub won_last: bool,
    pub won_last_three: bool,
}

impl RaceEntry {
    /// Split the entry id into its (name prefix, age prefix) parts.
    ///
    /// The id must contain exactly one comma with non-empty text on both
    /// sides; anything else is rejected as malformed input.
    pub fn parsed_id(&self) -> Result<(&str, &str), PredictError> {
        match self.id.split(',').collect::<Vec<_>>()[..] {
            [name_prefix, age_prefix] if !name_prefix.is_empty() && !age_prefix.is_empty() => {
                Ok((name_prefix, age_prefix))
            }
            _ => Err(PredictError::MalformedEntryId(self.id.clone())),
        }
    }
}

/// One horse in the ranked response, ordered best predicted finish first
#[derive(Debug, Clone, Serialize)]
pub struct RankedHorse {
    /// Canonical name from the horse store
    pub name: String,
    /// Age as submitted in the entry id
    pub age: String,
    pub driver: String,
    pub start: i64,
    /// Raw model score; lower means a better predicted finish
    pub prediction: f64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Model info response
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_path: String,
    pub num_features: usize,
    pub feature_names: Vec<String>,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
