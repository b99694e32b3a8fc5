// Monte-Carlo season outcomes for a drafted league.

use rand::Rng;
use tracing::info;

use super::sampler::PointSampler;
use crate::draft::league::League;
use crate::error::DraftError;

/// Summary of one team's randomized starter totals over many trials.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonOutcome {
    pub team_name: String,
    pub mean: f64,
    /// Population standard deviation of the trial totals.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Trials in which this team had the highest total. Ties count for the
    /// earliest team in draft order.
    pub wins: usize,
    pub trials: usize,
}

impl SeasonOutcome {
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.trials as f64
    }
}

/// Run `trials` randomized seasons for every team and summarize.
///
/// Each trial samples every team's starters once with
/// [`Team::randomized_starter_points`](crate::draft::team::Team::randomized_starter_points).
/// Results are sorted by mean, best first; ties keep draft order.
pub fn simulate_season_outcomes<R: Rng + ?Sized>(
    league: &League,
    sampler: &PointSampler,
    year: u16,
    trials: usize,
    rng: &mut R,
) -> Result<Vec<SeasonOutcome>, DraftError> {
    if trials == 0 {
        return Err(DraftError::validation("simulation.trials", "must be greater than 0"));
    }

    let teams = league.teams();
    let mut totals = trial_buffers(teams.len(), trials);
    let mut wins = vec![0usize; teams.len()];

    for _ in 0..trials {
        let mut best: Option<(usize, f64)> = None;
        for (i, team) in teams.iter().enumerate() {
            let points = team.randomized_starter_points(rng, sampler, year)?;
            totals[i].push(points);
            if best.map_or(true, |(_, b)| points > b) {
                best = Some((i, points));
            }
        }
        if let Some((i, _)) = best {
            wins[i] += 1;
        }
    }

    let mut outcomes: Vec<SeasonOutcome> = teams
        .iter()
        .zip(totals)
        .zip(wins)
        .map(|((team, values), wins)| {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            SeasonOutcome {
                team_name: team.name.clone(),
                mean,
                std_dev: variance.sqrt(),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                wins,
                trials,
            }
        })
        .collect();
    outcomes.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    info!(
        "Simulated {} seasons for {} teams",
        trials,
        outcomes.len()
    );
    Ok(outcomes)
}

/// One empty buffer per team, each with room for every trial.
fn trial_buffers(team_count: usize, trials: usize) -> Vec<Vec<f64>> {
    (0..team_count).map(|_| Vec::with_capacity(trials)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PositionConfig, ScoringConfig, StarterSlots};
    use crate::draft::pick::Position;
    use crate::draft::player::Player;
    use crate::draft::team::Team;
    use crate::valuation::sampler::{DistributionKind, TierDistribution};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const YEAR: u16 = 2024;

    fn sampler(std_dev: f64) -> PointSampler {
        let max_points = Position::ALL.iter().map(|&p| (p, 600.0)).collect();
        let distributions: BTreeMap<Position, Vec<TierDistribution>> = Position::ALL
            .iter()
            .map(|&p| {
                (
                    p,
                    vec![TierDistribution {
                        tier: 1,
                        kind: DistributionKind::Normal,
                        mean: 1.0,
                        std_dev,
                    }],
                )
            })
            .collect();
        PointSampler::from_config(&ScoringConfig {
            max_points,
            distributions,
        })
        .unwrap()
    }

    #[test]
    fn every_team_buffer_holds_all_trials() {
        let buffers = trial_buffers(4, 250);
        assert_eq!(buffers.len(), 4);
        assert!(buffers.iter().all(|b| b.is_empty() && b.capacity() >= 250));
    }

    /// Two teams, one quarterback each, drafted straight.
    fn drafted_league(first: f64, second: f64) -> League {
        let cfg = Arc::new(PositionConfig {
            roster_capacity: 1,
            starter_capacity: Some(1),
            rounds: 1,
            snake_draft: false,
            active_year: YEAR,
            starters: StarterSlots {
                qb: 1,
                rb: 0,
                wr: 0,
                te: 0,
                dst: 0,
                k: 0,
                flex: 0,
            },
        });
        let teams = vec![
            Team::new("Alpha", "A", 0, Arc::clone(&cfg)),
            Team::new("Bravo", "B", 1, Arc::clone(&cfg)),
        ];
        let mut league = League::new(teams, cfg).unwrap();
        league
            .add_pick(Player::new("QB-A", Position::Quarterback).with_points(YEAR, first, 1))
            .unwrap();
        league
            .add_pick(Player::new("QB-B", Position::Quarterback).with_points(YEAR, second, 1))
            .unwrap();
        league
    }

    #[test]
    fn zero_spread_reproduces_projections() {
        let league = drafted_league(200.0, 300.0);
        let mut rng = StdRng::seed_from_u64(1);
        let outcomes = simulate_season_outcomes(&league, &sampler(0.0), YEAR, 20, &mut rng).unwrap();

        assert_eq!(outcomes[0].team_name, "Bravo");
        assert_eq!(outcomes[0].mean, 300.0);
        assert_eq!(outcomes[0].std_dev, 0.0);
        assert_eq!(outcomes[0].wins, 20);
        assert_eq!(outcomes[1].min, 200.0);
        assert_eq!(outcomes[1].max, 200.0);
        assert_eq!(outcomes[1].wins, 0);
    }

    #[test]
    fn wins_sum_to_trials() {
        let league = drafted_league(250.0, 255.0);
        let mut rng = StdRng::seed_from_u64(17);
        let outcomes = simulate_season_outcomes(&league, &sampler(0.2), YEAR, 300, &mut rng).unwrap();
        assert_eq!(outcomes.iter().map(|o| o.wins).sum::<usize>(), 300);
        for o in &outcomes {
            assert!(o.min <= o.mean && o.mean <= o.max);
            assert!(o.std_dev > 0.0);
            assert!((0.0..=1.0).contains(&o.win_rate()));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let league = drafted_league(250.0, 240.0);
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            simulate_season_outcomes(&league, &sampler(0.15), YEAR, 50, &mut rng).unwrap()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn zero_trials_is_rejected() {
        let league = drafted_league(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            simulate_season_outcomes(&league, &sampler(0.1), YEAR, 0, &mut rng),
            Err(DraftError::Validation { .. })
        ));
    }
}
