// Simulated draft driver.
//
// Each turn asks the team on the clock for its position weights, samples a
// position from them, and takes the best remaining player there.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::draft::league::League;
use crate::draft::pick::{DraftPick, Position};
use crate::draft::player::Player;
use crate::error::DraftError;
use crate::valuation::classifier::PositionClassifier;
use crate::valuation::weights::PositionWeights;

/// Drafts from a shared player pool on behalf of every team in a league.
pub struct DraftSimulator<'a, C: PositionClassifier + ?Sized> {
    classifier: &'a C,
    available: Vec<Player>,
}

impl<'a, C: PositionClassifier + ?Sized> DraftSimulator<'a, C> {
    pub fn new(classifier: &'a C, players: Vec<Player>) -> Self {
        DraftSimulator {
            classifier,
            available: players,
        }
    }

    /// Players not yet drafted.
    pub fn available(&self) -> &[Player] {
        &self.available
    }

    /// Make one pick for the team on the clock.
    ///
    /// Returns `Ok(None)` when the draft is already complete or the pool is
    /// empty. Players with no projection for the active year are dropped from
    /// the pool first. A drafted player leaves the pool only once the league accepts
    /// the pick.
    pub fn run_turn<'l, R: Rng + ?Sized>(
        &mut self,
        league: &'l mut League,
        rng: &mut R,
    ) -> Result<Option<&'l DraftPick>, DraftError> {
        let Some(team_index) = league.team_on_the_clock() else {
            return Ok(None);
        };
        let year = league.config().active_year;
        self.drop_unprojected(year);
        if self.available.is_empty() {
            return Ok(None);
        }

        let pick_number = league.current_draft_turn() + 1;
        let team = league.team(team_index).ok_or_else(|| {
            DraftError::validation("draft_order", format!("no team at index {team_index}"))
        })?;
        let weights = team.draft_turn_position_weights(pick_number, self.classifier)?;

        // Sampled position first, then anything with weight, then anyone.
        let mut choice = match sample_position(&weights, rng) {
            Some(pos) => self.best_available(year, |p| p == pos)?,
            None => None,
        };
        if choice.is_none() {
            choice = self.best_available(year, |p| weights.get(&p).is_some_and(|w| *w > 0.0))?;
        }
        if choice.is_none() {
            choice = self.best_available(year, |_| true)?;
        }
        let Some(choice) = choice else {
            return Ok(None);
        };

        let player = self.available[choice].clone();
        debug!(
            "Pick {}: {} weights {:?}, taking {} ({})",
            pick_number, team.name, weights, player.name, player.position
        );
        let pick = league.add_pick(player)?;
        self.available.remove(choice);
        Ok(Some(pick))
    }

    /// Keep drafting until the league is complete or the pool runs dry.
    /// Returns the number of picks made.
    pub fn run<R: Rng + ?Sized>(&mut self, league: &mut League, rng: &mut R) -> Result<usize, DraftError> {
        let mut picks = 0;
        while self.run_turn(league, rng)?.is_some() {
            picks += 1;
        }
        info!(
            "Simulated {} picks, {} players left in the pool",
            picks,
            self.available.len()
        );
        Ok(picks)
    }

    /// Remove players with no projection for `year`; they cannot be drafted.
    fn drop_unprojected(&mut self, year: u16) {
        self.available.retain(|player| {
            let projected = player.points.contains_key(&year);
            if !projected {
                warn!(
                    "dropping {} ({}) from the pool: no {} projection",
                    player.name, player.position, year
                );
            }
            projected
        });
    }

    /// Index of the highest-projected available player whose position passes
    /// `accept`. Ties go to the earlier player in the pool.
    fn best_available(
        &self,
        year: u16,
        accept: impl Fn(Position) -> bool,
    ) -> Result<Option<usize>, DraftError> {
        let mut best: Option<(usize, f64)> = None;
        for (i, player) in self.available.iter().enumerate() {
            if !accept(player.position) {
                continue;
            }
            let points = player.projected_points(year)?;
            if best.map_or(true, |(_, b)| points > b) {
                best = Some((i, points));
            }
        }
        Ok(best.map(|(i, _)| i))
    }
}

/// Draw one position in proportion to its weight. `None` when no weight is
/// positive.
fn sample_position<R: Rng + ?Sized>(weights: &PositionWeights, rng: &mut R) -> Option<Position> {
    let (positions, values): (Vec<Position>, Vec<f64>) =
        weights.iter().filter(|(_, w)| **w > 0.0).map(|(p, w)| (*p, *w)).unzip();
    let dist = WeightedIndex::new(&values).ok()?;
    Some(positions[dist.sample(rng)])
}
