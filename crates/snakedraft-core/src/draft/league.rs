// League draft state: turn order, pick execution, history.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, info};

use super::pick::DraftPick;
use super::player::Player;
use super::team::Team;
use crate::config::{validate_positions, ConfigError, PositionConfig};
use crate::error::DraftError;

/// Where the draft stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    NotStarted,
    Drafting,
    Complete,
}

/// The complete state of a snake (or straight) draft.
///
/// `draft_order` holds the team index for every pick not yet made; picks
/// are consumed from the front. At all times
/// `draft_order.len() + current_draft_turn == rounds * teams.len()`.
#[derive(Debug, Clone)]
pub struct League {
    /// Teams sorted ascending by `draft_order`.
    teams: Vec<Team>,
    draft_order: VecDeque<usize>,
    draft_results: Vec<DraftPick>,
    current_draft_turn: usize,
    config: Arc<PositionConfig>,
}

/// Flatten `rounds` rounds of `team_count` picks into one queue of team
/// indices. With `snake` set, every odd-indexed round runs in reverse.
pub fn build_draft_order(team_count: usize, rounds: usize, snake: bool) -> VecDeque<usize> {
    let mut order = VecDeque::with_capacity(team_count * rounds);
    for round in 0..rounds {
        if snake && round % 2 == 1 {
            order.extend((0..team_count).rev());
        } else {
            order.extend(0..team_count);
        }
    }
    order
}

impl League {
    /// Create a league from its teams.
    ///
    /// Teams are sorted by their draft-order index. Every team must share the
    /// league's position config, and draft-order indices must be unique.
    pub fn new(mut teams: Vec<Team>, config: Arc<PositionConfig>) -> Result<Self, DraftError> {
        validate_positions(&config).map_err(|e| match e {
            ConfigError::ValidationError { field, message } => DraftError::Validation { field, message },
            other => DraftError::validation("draft", other.to_string()),
        })?;
        if teams.is_empty() {
            return Err(DraftError::validation("teams", "a league needs at least one team"));
        }

        let mut seen = HashSet::new();
        for team in &teams {
            if !seen.insert(team.draft_order) {
                return Err(DraftError::validation(
                    "teams",
                    format!("draft order {} is assigned to more than one team", team.draft_order),
                ));
            }
            if !team.shares_config(&config) {
                return Err(DraftError::validation(
                    "teams",
                    format!("team `{}` uses a different position config", team.name),
                ));
            }
            if !team.roster().is_empty() {
                return Err(DraftError::validation(
                    "teams",
                    format!("team `{}` must start the draft with an empty roster", team.name),
                ));
            }
        }

        teams.sort_by_key(|t| t.draft_order);
        let draft_order = build_draft_order(teams.len(), config.rounds, config.snake_draft);

        Ok(League {
            teams,
            draft_order,
            draft_results: Vec::new(),
            current_draft_turn: 0,
            config,
        })
    }

    /// Give `player` to the team on the clock and advance the draft.
    ///
    /// If the team rejects the player the league is left untouched. On
    /// success the post-pick team snapshot is appended to the history.
    pub fn add_pick(&mut self, player: Player) -> Result<&DraftPick, DraftError> {
        let team_index = *self.draft_order.front().ok_or(DraftError::DraftComplete {
            total_picks: self.total_picks(),
        })?;

        let player_name = player.name.clone();
        let position = player.position;
        self.teams[team_index].add_to_roster(player)?;

        self.draft_order.pop_front();
        let pick_number = self.current_draft_turn + 1;
        let round = self.current_draft_turn / self.teams.len() + 1;
        self.current_draft_turn += 1;

        let team = &self.teams[team_index];
        debug!(
            "Pick {} (round {}): {} selects {} ({})",
            pick_number, round, team.name, player_name, position
        );
        self.draft_results.push(DraftPick {
            pick_number,
            round,
            team_index,
            team_name: team.name.clone(),
            player_name,
            position,
            team: team.clone(),
        });

        if self.draft_order.is_empty() {
            info!("Draft complete after {} picks", self.current_draft_turn);
        }

        // Just pushed, so the history is non-empty.
        Ok(&self.draft_results[self.draft_results.len() - 1])
    }

    /// Teams ordered by projected roster points for the active year, best
    /// first. Ties keep draft order.
    pub fn rank_by_projected_team_points(&self) -> Result<Vec<&Team>, DraftError> {
        let year = self.config.active_year;
        let mut scored = self
            .teams
            .iter()
            .map(|t| t.projected_roster_points(year).map(|pts| (t, pts)))
            .collect::<Result<Vec<_>, _>>()?;
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scored.into_iter().map(|(t, _)| t).collect())
    }

    /// Clear every roster and the history, and rebuild the pick queue.
    pub fn reset(&mut self) {
        for team in &mut self.teams {
            team.clear_roster();
        }
        self.draft_results.clear();
        self.current_draft_turn = 0;
        self.draft_order =
            build_draft_order(self.teams.len(), self.config.rounds, self.config.snake_draft);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    /// The team flagged as the simulator's own, if any.
    pub fn simulator_team(&self) -> Option<&Team> {
        self.teams.iter().find(|t| t.simulator)
    }

    /// Team indices for the picks still to be made, in order.
    pub fn draft_order(&self) -> &VecDeque<usize> {
        &self.draft_order
    }

    pub fn draft_results(&self) -> &[DraftPick] {
        &self.draft_results
    }

    pub fn current_draft_turn(&self) -> usize {
        self.current_draft_turn
    }

    pub fn total_picks(&self) -> usize {
        self.config.rounds * self.teams.len()
    }

    pub fn picks_remaining(&self) -> usize {
        self.draft_order.len()
    }

    pub fn status(&self) -> DraftStatus {
        if self.draft_order.is_empty() {
            DraftStatus::Complete
        } else if self.current_draft_turn == 0 {
            DraftStatus::NotStarted
        } else {
            DraftStatus::Drafting
        }
    }

    /// 1-indexed round of the next pick; `None` once the draft is complete.
    pub fn current_round(&self) -> Option<usize> {
        if self.draft_order.is_empty() {
            None
        } else {
            Some(self.current_draft_turn / self.teams.len() + 1)
        }
    }

    /// Index of the team making the next pick.
    pub fn team_on_the_clock(&self) -> Option<usize> {
        self.draft_order.front().copied()
    }

    pub fn config(&self) -> &PositionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StarterSlots;
    use crate::draft::pick::Position;
    use std::sync::Mutex;
    use std::thread;

    const YEAR: u16 = 2024;

    fn config(rounds: usize, snake: bool) -> Arc<PositionConfig> {
        Arc::new(PositionConfig {
            roster_capacity: rounds.max(3),
            starter_capacity: None,
            rounds,
            snake_draft: snake,
            active_year: YEAR,
            starters: StarterSlots {
                qb: 1,
                rb: 1,
                wr: 1,
                te: 0,
                dst: 0,
                k: 0,
                flex: 0,
            },
        })
    }

    fn league(team_count: usize, rounds: usize, snake: bool) -> League {
        let cfg = config(rounds, snake);
        // Insert in reverse so construction has to sort.
        let teams = (0..team_count)
            .rev()
            .map(|i| Team::new(format!("Team {i}"), format!("Owner {i}"), i, Arc::clone(&cfg)))
            .collect();
        League::new(teams, cfg).unwrap()
    }

    fn player(n: usize, points: f64) -> Player {
        let pos = Position::ALL[n % 3];
        Player::new(format!("Player {n}"), pos).with_points(YEAR, points, 1)
    }

    fn assert_conserved(league: &League) {
        assert_eq!(
            league.draft_order().len() + league.current_draft_turn(),
            league.total_picks()
        );
    }

    #[test]
    fn snake_order_three_by_three() {
        let order: Vec<usize> = build_draft_order(3, 3, true).into_iter().collect();
        assert_eq!(order, vec![0, 1, 2, 2, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn straight_order_repeats_rounds() {
        let order: Vec<usize> = build_draft_order(3, 3, false).into_iter().collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn teams_sorted_by_draft_order() {
        let league = league(4, 2, true);
        let orders: Vec<usize> = league.teams().iter().map(|t| t.draft_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(league.team(2).map(|t| t.name.as_str()), Some("Team 2"));
    }

    #[test]
    fn rejects_empty_and_duplicate_orders() {
        let cfg = config(3, true);
        assert!(League::new(Vec::new(), Arc::clone(&cfg)).is_err());

        let teams = vec![
            Team::new("A", "a", 0, Arc::clone(&cfg)),
            Team::new("B", "b", 0, Arc::clone(&cfg)),
        ];
        let err = League::new(teams, cfg).unwrap_err();
        assert!(matches!(err, DraftError::Validation { ref field, .. } if field == "teams"));
    }

    #[test]
    fn rejects_team_with_different_config() {
        let cfg = config(3, true);
        let teams = vec![
            Team::new("A", "a", 0, Arc::clone(&cfg)),
            Team::new("B", "b", 1, config(5, true)),
        ];
        assert!(League::new(teams, cfg).is_err());
    }

    #[test]
    fn rejects_invalid_position_config() {
        let cfg = config(0, true);
        let teams = vec![Team::new("A", "a", 0, Arc::clone(&cfg))];
        assert!(matches!(
            League::new(teams, cfg),
            Err(DraftError::Validation { ref field, .. }) if field == "draft.rounds"
        ));
    }

    #[test]
    fn picks_follow_snake_order_and_conserve_queue() {
        let mut league = league(3, 3, true);
        assert_eq!(league.status(), DraftStatus::NotStarted);
        assert_conserved(&league);

        let mut picked_by = Vec::new();
        for n in 0..9 {
            let pick = league.add_pick(player(n, 100.0 + n as f64)).unwrap();
            assert_eq!(pick.pick_number, n + 1);
            assert_eq!(pick.round, n / 3 + 1);
            picked_by.push(pick.team_index);
            assert_conserved(&league);
        }
        assert_eq!(picked_by, vec![0, 1, 2, 2, 1, 0, 0, 1, 2]);
        assert_eq!(league.status(), DraftStatus::Complete);
        assert_eq!(league.current_round(), None);
        assert_eq!(league.team_on_the_clock(), None);
        assert!(league.teams().iter().all(|t| t.roster().len() == 3));
    }

    #[test]
    fn history_snapshots_team_after_pick() {
        let mut league = league(2, 2, true);
        league.add_pick(player(0, 200.0)).unwrap();
        league.add_pick(player(1, 150.0)).unwrap();
        league.add_pick(player(2, 120.0)).unwrap();

        let results = league.draft_results();
        assert_eq!(results.len(), 3);
        // Team 1 picked twice in a row at the turn; its first snapshot holds one player.
        assert_eq!(results[1].team_index, 1);
        assert_eq!(results[1].team.roster().len(), 1);
        assert_eq!(results[2].team_index, 1);
        assert_eq!(results[2].team.roster().len(), 2);
        assert_eq!(results[2].player_name, "Player 2");
        assert_eq!(results[2].team_name, "Team 1");
    }

    #[test]
    fn turn_queries_track_progress() {
        let mut league = league(3, 2, true);
        assert_eq!(league.team_on_the_clock(), Some(0));
        assert_eq!(league.current_round(), Some(1));
        assert_eq!(league.picks_remaining(), 6);

        for n in 0..4 {
            league.add_pick(player(n, 100.0)).unwrap();
        }
        assert_eq!(league.status(), DraftStatus::Drafting);
        assert_eq!(league.current_round(), Some(2));
        assert_eq!(league.team_on_the_clock(), Some(1));
        assert_eq!(league.picks_remaining(), 2);
    }

    #[test]
    fn pick_after_completion_is_rejected() {
        let mut league = league(2, 1, true);
        league.add_pick(player(0, 100.0)).unwrap();
        league.add_pick(player(1, 100.0)).unwrap();
        let err = league.add_pick(player(2, 100.0)).unwrap_err();
        assert_eq!(err, DraftError::DraftComplete { total_picks: 2 });
        assert_eq!(league.draft_results().len(), 2);
        assert_conserved(&league);
    }

    #[test]
    fn failed_pick_leaves_league_unchanged() {
        let mut league = league(2, 2, true);
        league.add_pick(player(0, 100.0)).unwrap();

        let rookie = Player::new("Rookie", Position::RunningBack).with_points(2030, 90.0, 1);
        let err = league.add_pick(rookie).unwrap_err();
        assert!(matches!(err, DraftError::MissingYear { .. }));

        assert_eq!(league.current_draft_turn(), 1);
        assert_eq!(league.draft_results().len(), 1);
        assert_eq!(league.team_on_the_clock(), Some(1));
        assert!(league.team(1).map(|t| t.roster().is_empty()).unwrap_or(false));
        assert_conserved(&league);
    }

    #[test]
    fn ranking_is_descending_with_stable_ties() {
        let mut league = league(3, 1, false);
        league.add_pick(player(0, 150.0)).unwrap();
        league.add_pick(player(1, 250.0)).unwrap();
        league.add_pick(player(2, 150.0)).unwrap();

        let ranked: Vec<&str> = league
            .rank_by_projected_team_points()
            .unwrap()
            .into_iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(ranked, vec!["Team 1", "Team 0", "Team 2"]);
    }

    #[test]
    fn reset_restores_pre_draft_state() {
        let mut league = league(2, 2, true);
        for n in 0..3 {
            league.add_pick(player(n, 100.0)).unwrap();
        }
        league.reset();
        assert_eq!(league.status(), DraftStatus::NotStarted);
        assert!(league.draft_results().is_empty());
        assert!(league.teams().iter().all(|t| t.roster().is_empty()));
        assert_eq!(
            league.draft_order().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 1, 0]
        );
    }

    #[test]
    fn shared_league_serializes_picks() {
        let shared = Arc::new(Mutex::new(league(4, 3, true)));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    for r in 0..3 {
                        let mut league = shared.lock().unwrap();
                        league.add_pick(player(t * 3 + r, 100.0)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let league = shared.lock().unwrap();
        assert_eq!(league.status(), DraftStatus::Complete);
        assert_eq!(league.draft_results().len(), 12);
        assert_conserved(&league);
    }
}
