// Football positions and individual pick records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::team::Team;

/// Football positions a player can be drafted at.
///
/// Variant order is the fixed lineup order (QB, RB, WR, TE, DST, K); the
/// derived `Ord` relies on it, so `BTreeMap<Position, _>` iterates in lineup
/// order. Config keys use the lowercase short names (`qb`, `rb`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "qb")]
    Quarterback,
    #[serde(rename = "rb")]
    RunningBack,
    #[serde(rename = "wr")]
    WideReceiver,
    #[serde(rename = "te")]
    TightEnd,
    #[serde(rename = "dst")]
    Defense,
    #[serde(rename = "k")]
    Kicker,
}

impl Position {
    /// Every starting position, in lineup order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Defense,
        Position::Kicker,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Accepts the usual abbreviations, case-insensitively:
    /// - "QB", "RB" (also "HB"), "WR", "TE", "K" (also "PK")
    /// - "DST", "D/ST", "DEF" -> Defense
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" | "HB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            "K" | "PK" => Some(Position::Kicker),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Defense => "DST",
            Position::Kicker => "K",
        }
    }

    /// Lowercase key used for this position in league.toml.
    pub fn config_key(&self) -> &'static str {
        match self {
            Position::Quarterback => "qb",
            Position::RunningBack => "rb",
            Position::WideReceiver => "wr",
            Position::TightEnd => "te",
            Position::Defense => "dst",
            Position::Kicker => "k",
        }
    }

    /// Whether a player at this position may fill the flex slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A single draft pick record.
#[derive(Debug, Clone)]
pub struct DraftPick {
    /// Sequential pick number (1-indexed).
    pub pick_number: usize,
    /// Draft round the pick was made in (1-indexed).
    pub round: usize,
    /// Index into the league's teams of the team that made the pick.
    pub team_index: usize,
    /// Display name of the team.
    pub team_name: String,
    /// Name of the drafted player.
    pub player_name: String,
    pub position: Position,
    /// The team as it stood right after the pick.
    pub team: Team,
}
