//! Error types for the prediction pipeline.
//!
//! A failing horse fails the whole race: no partial rankings are ever
//! returned, so every variant here aborts the request that raised it.

use std::fmt;

/// Pipeline error raised while ranking a race
#[derive(Debug)]
pub enum PredictError {
    /// The submitted race contained no entries
    EmptyRace,
    /// An entry id was not of the form "namePrefix,age"
    MalformedEntryId(String),
    /// No stored horse matched the (name, age) prefix pair
    HorseNotFound {
        name_prefix: String,
        age_prefix: String,
    },
    /// The horse store could not be queried
    Storage(anyhow::Error),
    /// Model inference failed for one of the horses
    Inference(anyhow::Error),
}

impl PredictError {
    /// Machine-readable error kind, used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::EmptyRace | PredictError::MalformedEntryId(_) => "input_error",
            PredictError::HorseNotFound { .. } => "not_found",
            PredictError::Storage(_) => "storage_error",
            PredictError::Inference(_) => "prediction_error",
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictError::EmptyRace => write!(f, "Race contains no entries"),
            PredictError::MalformedEntryId(id) => {
                write!(f, "Entry id {:?} is not of the form \"name,age\"", id)
            }
            PredictError::HorseNotFound {
                name_prefix,
                age_prefix,
            } => write!(
                f,
                "No horse matching name {:?} and age {:?}",
                name_prefix, age_prefix
            ),
            PredictError::Storage(err) => write!(f, "Horse store error: {}", err),
            PredictError::Inference(err) => write!(f, "Model inference error: {}", err),
        }
    }
}

impl std::error::Error for PredictError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(PredictError::EmptyRace.kind(), "input_error");
        assert_eq!(
            PredictError::MalformedEntryId("bad".to_string()).kind(),
            "input_error"
        );
        assert_eq!(
            PredictError::HorseNotFound {
                name_prefix: "Rainbow".to_string(),
                age_prefix: "5".to_string(),
            }
            .kind(),
            "not_found"
        );
        assert_eq!(
            PredictError::Inference(anyhow::anyhow!("boom")).kind(),
            "prediction_error"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PredictError::HorseNotFound {
            name_prefix: "Rainbow".to_string(),
            age_prefix: "5".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Rainbow"));
        assert!(msg.contains("5"));

        let err = PredictError::MalformedEntryId("no-comma".to_string());
        assert!(err.to_string().contains("no-comma"));
    }
}
