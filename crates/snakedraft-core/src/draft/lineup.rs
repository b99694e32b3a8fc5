// Starting lineup selection.
//
// Picks the best starters from an arbitrary roster: the top projected players
// at each position fill that position's slots, then the best leftover
// RB/WR/TE fill flex. Ties keep roster order.

use std::collections::BTreeMap;

use super::pick::Position;
use super::player::Player;
use crate::config::PositionConfig;
use crate::error::DraftError;

/// Anything the optimizer can rank: a position and a projection per season.
pub trait LineupCandidate {
    fn position(&self) -> Position;
    fn projected_points(&self, year: u16) -> Result<f64, DraftError>;
}

impl LineupCandidate for Player {
    fn position(&self) -> Position {
        self.position
    }

    fn projected_points(&self, year: u16) -> Result<f64, DraftError> {
        Player::projected_points(self, year)
    }
}

/// The chosen starters, stored as indices into the roster they were derived
/// from. Within every list players are ranked best first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineup {
    by_position: BTreeMap<Position, Vec<usize>>,
    flex: Vec<usize>,
    starters: Vec<usize>,
}

impl Lineup {
    /// Starters at `pos`; empty when the roster has nobody there.
    pub fn position(&self, pos: Position) -> &[usize] {
        self.by_position.get(&pos).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn flex(&self) -> &[usize] {
        &self.flex
    }

    /// Every starter: per-position lists in lineup order, then flex.
    pub fn starters(&self) -> &[usize] {
        &self.starters
    }

    pub fn is_empty(&self) -> bool {
        self.starters.is_empty()
    }
}

/// Fill the starting lineup from `roster` using projections for `year`.
///
/// 1. For each position in lineup order, stable-sort that position's players
///    by projected points descending and keep the configured slot count.
/// 2. Flex takes the best remaining RB/WR/TE not already starting.
/// 3. Combined starters = positions in order, followed by flex.
///
/// Every roster player must carry a projection for `year`; otherwise the
/// call fails with `MissingYear` before anything is selected.
pub fn fill_starters<P: LineupCandidate>(
    roster: &[P],
    config: &PositionConfig,
    year: u16,
) -> Result<Lineup, DraftError> {
    let points = roster
        .iter()
        .map(|p| p.projected_points(year))
        .collect::<Result<Vec<f64>, _>>()?;

    // Indices passing `keep`, best first; `sort_by` is stable so ties keep roster order.
    let ranked = |keep: &dyn Fn(usize) -> bool, take: usize| -> Vec<usize> {
        let mut idx: Vec<usize> = (0..roster.len()).filter(|&i| keep(i)).collect();
        idx.sort_by(|&a, &b| points[b].total_cmp(&points[a]));
        idx.truncate(take);
        idx
    };

    let mut lineup = Lineup::default();
    let mut committed = vec![false; roster.len()];

    for pos in Position::ALL {
        let chosen = ranked(
            &|i: usize| roster[i].position() == pos,
            config.starters.for_position(pos),
        );
        if chosen.is_empty() {
            continue;
        }
        for &i in &chosen {
            committed[i] = true;
        }
        lineup.starters.extend_from_slice(&chosen);
        lineup.by_position.insert(pos, chosen);
    }

    lineup.flex = ranked(
        &|i: usize| roster[i].position().is_flex_eligible() && !committed[i],
        config.starters.flex,
    );
    lineup.starters.extend_from_slice(&lineup.flex);

    Ok(lineup)
}
