//! Feature vector construction for the ranking model.
//!
//! Each horse is summarized as a fixed 8-slot vector in the order listed in
//! [`crate::config::FEATURE_NAMES`]. All slots are filled from the submitted
//! entry and its stored record, except the relative-weight slot which needs
//! the whole race and is filled in a second pass.

use crate::model::NUM_FEATURES;
use crate::storage::HorseRecord;
use crate::types::RaceEntry;

/// Index of the race-relative weight slot, filled after all vectors exist
pub const RELATIVE_WEIGHT_SLOT: usize = 2;

/// Model input vector for one horse
pub type FeatureVector = [f64; NUM_FEATURES];

/// Build the feature vector for one entry and its stored record.
///
/// The relative-weight slot is left at 0.0; callers fill it once the race
/// average is known.
pub fn build_vector(entry: &RaceEntry, record: &HorseRecord) -> FeatureVector {
    let place_percent = record.first_percent + record.second_percent + record.third_percent;

    [
        // Finish is always 0 because unknown at prediction time
        0.0,
        // Start positions 1-3 are favorable
        if (1..=3).contains(&entry.start) { 1.0 } else { 0.0 },
        // Relative weight, filled later
        0.0,
        // Successful: top-three percentages over half of all races
        if place_percent > 50 { 1.0 } else { 0.0 },
        // Experienced: more than 5 career wins
        if record.first > 5 { 1.0 } else { 0.0 },
        // Can't check if the same driver is riding in a random race
        0.0,
        // Won its last race
        if entry.won_last { 1.0 } else { 0.0 },
        // Won its last 3 races
        if entry.won_last_three { 1.0 } else { 0.0 },
    ]
}

/// Arithmetic mean of the submitted weights, `None` for an empty race.
pub fn race_weight_mean(weights: &[f64]) -> Option<f64> {
    if weights.is_empty() {
        return None;
    }
    Some(weights.iter().sum::<f64>() / weights.len() as f64)
}

/// Race-relative weight feature: +1 at or above the race average, -1 below.
pub fn relative_weight(weight: f64, mean: f64) -> f64 {
    if weight >= mean {
        1.0
    } else {
        -1.0
    }
}
