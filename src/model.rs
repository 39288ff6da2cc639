//! ONNX model loading and inference.

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::FEATURE_NAMES;

/// Number of input features
pub const NUM_FEATURES: usize = 8;

/// ONNX model wrapper for finishing-order regression.
///
/// The model maps one feature vector to a single scalar; races are ranked
/// by sorting these scores ascending.
pub struct RankingModel {
    session: Mutex<Session>,
}

impl RankingModel {
    /// Load ONNX model from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Score one horse's feature vector.
    ///
    /// Lower scores mean better predicted finishing positions.
    pub fn score(&self, features: &[f64; NUM_FEATURES]) -> Result<f64> {
        let input = Array2::from_shape_fn((1, NUM_FEATURES), |(_, j)| features[j] as f32);
        let input_tensor = Tensor::from_array(input)?;

        // Lock the session for inference
        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock session: {}", e))?;

        let outputs = session.run(ort::inputs![input_tensor])?;

        // Regression head: a single value for the single input row
        let (_, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract prediction tensor")?;

        let score = output_data
            .first()
            .copied()
            .context("Model returned an empty output")?;

        Ok(score as f64)
    }

    /// Get feature names.
    #[allow(dead_code)]
    pub fn feature_names(&self) -> &[&str] {
        &FEATURE_NAMES
    }
}

/// Thread-safe model wrapper for use in web handlers.
pub type SharedModel = Arc<RankingModel>;

/// Create a shared model instance.
pub fn create_shared_model<P: AsRef<Path>>(path: P) -> Result<SharedModel> {
    let model = RankingModel::load(path)?;
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names() {
        assert_eq!(FEATURE_NAMES.len(), NUM_FEATURES);
        assert_eq!(FEATURE_NAMES[0], "finish");
        assert_eq!(FEATURE_NAMES[2], "relative_weight");
        assert_eq!(FEATURE_NAMES[7], "won_last_three");
    }

    #[test]
    fn test_load_missing_model_fails() {
        assert!(RankingModel::load("does/not/exist.onnx").is_err());
    }
}
