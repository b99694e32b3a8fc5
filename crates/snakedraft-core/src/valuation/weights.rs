// Position weights for a draft turn.
//
// Turns a classifier's raw prediction into a distribution over the positions
// the team still needs: filled positions are zeroed and the rest rescaled.

use std::collections::BTreeMap;

use tracing::warn;

use super::classifier::PositionClassifier;
use crate::draft::pick::Position;
use crate::draft::team::Team;
use crate::error::DraftError;

/// Probability of taking each position, keyed in lineup order.
pub type PositionWeights = BTreeMap<Position, f64>;

/// Compute position weights for `team` at overall pick `pick_number`.
///
/// - If every starting position is already filled, the raw prediction is
///   returned unchanged.
/// - Otherwise filled positions get weight 0 and the remaining weights are
///   rescaled to sum to 1.
/// - If nothing unfilled carries any weight, the unfilled labels share the
///   weight uniformly. With no unfilled label at all, or a total too large to
///   represent, the call fails with `Normalization`.
pub fn position_weights<C: PositionClassifier + ?Sized>(
    pick_number: usize,
    classifier: &C,
    team: &Team,
) -> Result<PositionWeights, DraftError> {
    let prediction = classifier.predict(pick_number);
    prediction.validate()?;

    let raw: PositionWeights = prediction
        .labels
        .iter()
        .copied()
        .zip(prediction.probabilities.iter().copied())
        .collect();

    let filled: Vec<Position> = Position::ALL
        .iter()
        .copied()
        .filter(|&p| team.is_position_filled(p))
        .collect();
    if filled.len() == Position::ALL.len() {
        return Ok(raw);
    }

    let mut weights = raw;
    for pos in &filled {
        if let Some(w) = weights.get_mut(pos) {
            *w = 0.0;
        }
    }

    let total: f64 = weights.values().sum();
    if !total.is_finite() {
        return Err(DraftError::Normalization { pick_number });
    }
    if total > 0.0 {
        for w in weights.values_mut() {
            *w /= total;
        }
        return Ok(weights);
    }

    let open: Vec<Position> = weights
        .keys()
        .copied()
        .filter(|p| !filled.contains(p))
        .collect();
    if open.is_empty() {
        return Err(DraftError::Normalization { pick_number });
    }

    warn!(
        "Pick {}: classifier gives no weight to {}'s open positions; using uniform weights",
        pick_number, team.name
    );
    let share = 1.0 / open.len() as f64;
    for (pos, w) in weights.iter_mut() {
        *w = if open.contains(pos) { share } else { 0.0 };
    }
    Ok(weights)
}
