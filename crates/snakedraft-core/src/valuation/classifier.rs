// Pick-number -> position probability models.

use std::collections::HashSet;

use crate::draft::pick::Position;
use crate::error::DraftError;

/// Output of a position classifier for one pick: parallel lists of labels
/// and their probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub labels: Vec<Position>,
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// A prediction over all six positions in lineup order.
    pub fn from_positions(probabilities: [f64; 6]) -> Self {
        Prediction {
            labels: Position::ALL.to_vec(),
            probabilities: probabilities.to_vec(),
        }
    }

    /// Check the shape of the prediction: equal lengths, unique labels, and
    /// finite non-negative probabilities.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.labels.len() != self.probabilities.len() {
            return Err(DraftError::validation(
                "prediction",
                format!(
                    "{} labels but {} probabilities",
                    self.labels.len(),
                    self.probabilities.len()
                ),
            ));
        }
        let mut seen = HashSet::new();
        for (label, &p) in self.labels.iter().zip(&self.probabilities) {
            if !seen.insert(*label) {
                return Err(DraftError::validation(
                    "prediction",
                    format!("label {label} appears more than once"),
                ));
            }
            if !p.is_finite() || p < 0.0 {
                return Err(DraftError::validation(
                    "prediction",
                    format!("probability for {label} must be finite and >= 0, got {p}"),
                ));
            }
        }
        Ok(())
    }
}

/// Anything that can predict which position a team drafts at a pick.
pub trait PositionClassifier {
    fn predict(&self, pick_number: usize) -> Prediction;
}

impl<F> PositionClassifier for F
where
    F: Fn(usize) -> Prediction,
{
    fn predict(&self, pick_number: usize) -> Prediction {
        self(pick_number)
    }
}

// ---------------------------------------------------------------------------
// Lookup-table model
// ---------------------------------------------------------------------------

/// Position probabilities starting at a given pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickBand {
    /// First overall pick (1-indexed) this band applies to.
    pub pick: usize,
    /// Probabilities in lineup order (QB, RB, WR, TE, DST, K).
    pub probabilities: [f64; 6],
}

/// Step-function classifier built from historical draft tendencies.
///
/// A pick uses the band with the greatest starting pick not after it; picks
/// before the first band use the first band.
#[derive(Debug, Clone)]
pub struct PickTableClassifier {
    bands: Vec<PickBand>,
}

impl PickTableClassifier {
    /// Build the table. Each band is normalized to sum to 1; bands must have
    /// distinct starting picks and a positive, finite total.
    pub fn new(mut bands: Vec<PickBand>) -> Result<Self, DraftError> {
        if bands.is_empty() {
            return Err(DraftError::validation("pick_model", "at least one band is required"));
        }
        bands.sort_by_key(|b| b.pick);
        if let Some(w) = bands.windows(2).find(|w| w[0].pick == w[1].pick) {
            return Err(DraftError::validation(
                "pick_model",
                format!("pick {} is listed more than once", w[0].pick),
            ));
        }

        for band in &mut bands {
            if band.probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(DraftError::validation(
                    "pick_model",
                    format!("pick {}: probabilities must be finite and >= 0", band.pick),
                ));
            }
            let total: f64 = band.probabilities.iter().sum();
            if total <= 0.0 {
                return Err(DraftError::validation(
                    "pick_model",
                    format!("pick {}: probabilities sum to zero", band.pick),
                ));
            }
            for p in &mut band.probabilities {
                *p /= total;
            }
        }

        Ok(PickTableClassifier { bands })
    }

    pub fn bands(&self) -> &[PickBand] {
        &self.bands
    }
}

impl PositionClassifier for PickTableClassifier {
    fn predict(&self, pick_number: usize) -> Prediction {
        let idx = self.bands.partition_point(|b| b.pick <= pick_number);
        // `new` guarantees at least one band.
        let band = &self.bands[idx.saturating_sub(1)];
        Prediction::from_positions(band.probabilities)
    }
}
