//! Race outcome prediction pipeline.
//!
//! Resolves each submitted entry against the horse store, derives its
//! feature vector, fills the race-relative weight feature once every entry
//! is resolved, scores each horse with the shared model and returns the
//! race sorted best predicted finish first.

use std::sync::Arc;

use crate::error::PredictError;
use crate::features::{
    build_vector, race_weight_mean, relative_weight, FeatureVector, RELATIVE_WEIGHT_SLOT,
};
use crate::model::SharedModel;
use crate::storage::HorseRepository;
use crate::types::{RaceEntry, RankedHorse};

/// Prediction pipeline over the shared model and horse store
#[derive(Clone)]
pub struct Predictor {
    model: SharedModel,
    horses: Arc<HorseRepository>,
}

/// One resolved horse while its race is being scored
#[derive(Debug)]
struct Contender {
    name: String,
    age: String,
    driver: String,
    start: i64,
    weight: f64,
    vector: FeatureVector,
    prediction: f64,
}

impl Predictor {
    pub fn new(model: SharedModel, horses: Arc<HorseRepository>) -> Self {
        Self { model, horses }
    }

    /// Rank a submitted race.
    ///
    /// Any malformed id, unresolvable horse or inference failure aborts the
    /// whole race; partial rankings are never returned.
    pub fn predict_race(&self, entries: &[RaceEntry]) -> Result<Vec<RankedHorse>, PredictError> {
        let mut race = assemble_race(&self.horses, entries)?;

        // One model invocation per horse
        for contender in race.iter_mut() {
            contender.prediction = self
                .model
                .score(&contender.vector)
                .map_err(PredictError::Inference)?;
        }

        Ok(rank(race))
    }
}

/// Resolve every entry and build its feature vector, including the
/// race-relative weight pass. Scoring has not happened yet.
fn assemble_race(
    horses: &HorseRepository,
    entries: &[RaceEntry],
) -> Result<Vec<Contender>, PredictError> {
    if entries.is_empty() {
        return Err(PredictError::EmptyRace);
    }

    let mut race = Vec::with_capacity(entries.len());
    for entry in entries {
        let (name_prefix, age_prefix) = entry.parsed_id()?;
        let record = horses
            .find_by_prefix(name_prefix, age_prefix)
            .map_err(PredictError::Storage)?
            .ok_or_else(|| PredictError::HorseNotFound {
                name_prefix: name_prefix.to_string(),
                age_prefix: age_prefix.to_string(),
            })?;

        race.push(Contender {
            vector: build_vector(entry, &record),
            name: record.name,
            age: age_prefix.to_string(),
            driver: entry.driver.clone(),
            start: entry.start,
            weight: entry.weight,
            prediction: 0.0,
        });
    }

    // Every vector must exist before the race average is known
    let weights: Vec<f64> = race.iter().map(|c| c.weight).collect();
    let mean = race_weight_mean(&weights).ok_or(PredictError::EmptyRace)?;
    for contender in race.iter_mut() {
        contender.vector[RELATIVE_WEIGHT_SLOT] = relative_weight(contender.weight, mean);
    }

    Ok(race)
}

/// Sort ascending by score and project to the response shape.
///
/// The sort is stable, so equal scores keep submission order.
fn rank(mut race: Vec<Contender>) -> Vec<RankedHorse> {
    race.sort_by(|a, b| a.prediction.total_cmp(&b.prediction));
    race.into_iter()
        .map(|c| RankedHorse {
            name: c.name,
            age: c.age,
            driver: c.driver,
            start: c.start,
            prediction: c.prediction,
        })
        .collect()
}
