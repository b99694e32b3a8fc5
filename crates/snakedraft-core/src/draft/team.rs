// A fantasy team: roster, derived starting lineup and point aggregates.

use std::sync::Arc;

use rand::Rng;

use super::lineup::{fill_starters, Lineup, LineupCandidate};
use super::pick::Position;
use super::player::Player;
use crate::config::PositionConfig;
use crate::error::DraftError;
use crate::valuation::classifier::PositionClassifier;
use crate::valuation::sampler::PointSampler;
use crate::valuation::weights::{position_weights, PositionWeights};

/// A team in the league.
///
/// The lineup is always derived from the roster. The roster only grows
/// through `add_to_roster`, which recomputes the lineup in the same step.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub owner: String,
    /// Whether this is the team the simulation is playing for.
    pub simulator: bool,
    /// Position in the draft order (0 picks first).
    pub draft_order: usize,
    roster: Vec<Player>,
    lineup: Lineup,
    config: Arc<PositionConfig>,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        draft_order: usize,
        config: Arc<PositionConfig>,
    ) -> Self {
        Team {
            name: name.into(),
            owner: owner.into(),
            simulator: false,
            draft_order,
            roster: Vec::new(),
            lineup: Lineup::default(),
            config,
        }
    }

    /// Mark this team as the simulator's own.
    pub fn as_simulator(mut self) -> Self {
        self.simulator = true;
        self
    }

    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    pub(crate) fn shares_config(&self, config: &Arc<PositionConfig>) -> bool {
        Arc::ptr_eq(&self.config, config) || *self.config == **config
    }

    /// Append a player and recompute the lineup.
    ///
    /// Fails with `RosterFull` at capacity and `MissingYear` when the player
    /// has no projection for the active year. On failure the team is unchanged.
    pub fn add_to_roster(&mut self, player: Player) -> Result<(), DraftError> {
        if self.roster.len() >= self.config.roster_capacity {
            return Err(DraftError::RosterFull {
                team: self.name.clone(),
                capacity: self.config.roster_capacity,
            });
        }

        self.roster.push(player);
        match fill_starters(&self.roster, &self.config, self.config.active_year) {
            Ok(lineup) => {
                self.lineup = lineup;
                Ok(())
            }
            Err(e) => {
                self.roster.pop();
                Err(e)
            }
        }
    }

    /// Empty the roster. Only the league uses this, when resetting a draft.
    pub(crate) fn clear_roster(&mut self) {
        self.roster.clear();
        self.lineup = Lineup::default();
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn lineup(&self) -> &Lineup {
        &self.lineup
    }

    /// All starters, per-position groups first and flex last.
    pub fn starters(&self) -> impl Iterator<Item = &Player> + '_ {
        self.lineup.starters().iter().map(|&i| &self.roster[i])
    }

    pub fn position_starters(&self, pos: Position) -> impl Iterator<Item = &Player> + '_ {
        self.lineup.position(pos).iter().map(|&i| &self.roster[i])
    }

    pub fn flex_starters(&self) -> impl Iterator<Item = &Player> + '_ {
        self.lineup.flex().iter().map(|&i| &self.roster[i])
    }

    /// Whether every starter slot at `pos` is taken. A position with zero
    /// configured slots counts as filled.
    pub fn is_position_filled(&self, pos: Position) -> bool {
        self.lineup.position(pos).len() == self.config.starters.for_position(pos)
    }

    /// Starting positions that still have an open slot, in lineup order.
    pub fn needs(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|&p| !self.is_position_filled(p))
            .collect()
    }

    /// Total projected points for the whole roster, bench included.
    pub fn projected_roster_points(&self, year: u16) -> Result<f64, DraftError> {
        self.roster.iter().map(|p| p.projected_points(year)).sum()
    }

    /// Total projected points for the current starters only.
    pub fn projected_starter_points(&self, year: u16) -> Result<f64, DraftError> {
        self.starters().map(|p| p.projected_points(year)).sum()
    }

    /// One independent random draw per roster player, summed.
    pub fn randomized_roster_points<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sampler: &PointSampler,
        year: u16,
    ) -> Result<f64, DraftError> {
        self.roster
            .iter()
            .map(|p| p.randomized_points(rng, sampler, year))
            .sum()
    }

    /// Sample every roster player once, pick the lineup that would have
    /// started under those outcomes, and total the starters' sampled points.
    ///
    /// The roster itself is never touched; the lineup is recomputed over a
    /// derived view holding the sampled values.
    pub fn randomized_starter_points<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sampler: &PointSampler,
        year: u16,
    ) -> Result<f64, DraftError> {
        let sampled = self
            .roster
            .iter()
            .map(|player| {
                player
                    .randomized_points(rng, sampler, year)
                    .map(|points| SampledPlayer { player, points })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let lineup = fill_starters(&sampled, &self.config, year)?;
        Ok(lineup.starters().iter().map(|&i| sampled[i].points).sum())
    }

    /// Probability of drafting each position at `pick_number`, given what
    /// this team has already filled. See [`position_weights`].
    pub fn draft_turn_position_weights<C: PositionClassifier + ?Sized>(
        &self,
        pick_number: usize,
        classifier: &C,
    ) -> Result<PositionWeights, DraftError> {
        position_weights(pick_number, classifier, self)
    }
}

/// A roster player paired with one sampled season total.
struct SampledPlayer<'a> {
    player: &'a Player,
    points: f64,
}

impl LineupCandidate for SampledPlayer<'_> {
    fn position(&self) -> Position {
        self.player.position
    }

    fn projected_points(&self, _year: u16) -> Result<f64, DraftError> {
        Ok(self.points)
    }
}
