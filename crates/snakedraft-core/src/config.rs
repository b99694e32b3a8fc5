// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::pick::Position;
use crate::valuation::sampler::{PointSampler, TierDistribution};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    pub draft: PositionConfig,
    pub scoring: ScoringConfig,
    pub simulation: SimulationConfig,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
}

/// Roster shape and draft format. Read-only once the league is built; teams
/// and the league share one instance behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionConfig {
    pub roster_capacity: usize,
    /// Optional explicit total of starter slots. When present it must equal
    /// the sum of `starters`.
    #[serde(default)]
    pub starter_capacity: Option<usize>,
    pub rounds: usize,
    #[serde(default = "default_snake_draft")]
    pub snake_draft: bool,
    /// Season whose projections drive lineups and rankings.
    pub active_year: u16,
    pub starters: StarterSlots,
}

fn default_snake_draft() -> bool {
    true
}

/// Starter-slot counts per position plus the RB/WR/TE flex slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StarterSlots {
    pub qb: usize,
    pub rb: usize,
    pub wr: usize,
    pub te: usize,
    pub dst: usize,
    pub k: usize,
    pub flex: usize,
}

impl StarterSlots {
    pub fn for_position(&self, pos: Position) -> usize {
        match pos {
            Position::Quarterback => self.qb,
            Position::RunningBack => self.rb,
            Position::WideReceiver => self.wr,
            Position::TightEnd => self.te,
            Position::Defense => self.dst,
            Position::Kicker => self.k,
        }
    }

    /// All starter slots, flex included.
    pub fn total(&self) -> usize {
        Position::ALL
            .iter()
            .map(|&p| self.for_position(p))
            .sum::<usize>()
            + self.flex
    }
}

impl PositionConfig {
    pub fn total_starter_slots(&self) -> usize {
        self.starters.total()
    }
}

/// Inputs for randomized point generation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Per-position ceiling for a sampled season.
    pub max_points: BTreeMap<Position, f64>,
    /// Per-position list of tier distributions.
    pub distributions: BTreeMap<Position, Vec<TierDistribution>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the simulation's random source.
    pub seed: u64,
    /// Monte-Carlo trials per team.
    pub trials: usize,
    /// Draft-order index of the simulator's own team, if any.
    #[serde(default)]
    pub simulator_team: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub players: String,
    pub pick_model: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

const LEAGUE_FILE: &str = "league.toml";

/// Load and validate configuration from `config/league.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join(LEAGUE_FILE);
    let text = read_file(&league_path)?;
    let config = parse_config(&text, &league_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse TOML text into a `Config` without validating it.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Seed `config/league.toml` from `defaults/league.toml` on first run.
///
/// Returns the path written, or `None` when the league file already exists.
/// An existing league file is never overwritten.
pub fn ensure_league_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(LEAGUE_FILE);
    if target.is_file() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(LEAGUE_FILE);
    let mut template = std::fs::File::open(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "no config/{LEAGUE_FILE} and cannot open {}: {e}; \
             run from the workspace root",
            source.display()
        ),
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        // Created between the check above and now.
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    std::io::copy(&mut template, &mut dest).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Seeds the league file from `defaults/` first if it is missing.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_league_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.num_teams == 0 {
        return Err(invalid("league.num_teams", "must be greater than 0"));
    }

    validate_positions(&config.draft)?;

    if let Some(idx) = config.simulation.simulator_team {
        if idx >= config.league.num_teams {
            return Err(invalid(
                "simulation.simulator_team",
                format!(
                    "must be a draft-order index below num_teams ({}), got {idx}",
                    config.league.num_teams
                ),
            ));
        }
    }
    if config.simulation.trials == 0 {
        return Err(invalid("simulation.trials", "must be greater than 0"));
    }

    // Building the sampler checks caps and distribution parameters.
    PointSampler::from_config(&config.scoring).map_err(|e| match e {
        crate::DraftError::Validation { field, message } => ConfigError::ValidationError {
            field,
            message,
        },
        other => invalid("scoring", other.to_string()),
    })?;

    Ok(())
}

/// Checks that apply to any `PositionConfig`, however it was built.
pub fn validate_positions(draft: &PositionConfig) -> Result<(), ConfigError> {
    if draft.roster_capacity == 0 {
        return Err(invalid("draft.roster_capacity", "must be greater than 0"));
    }
    if draft.rounds == 0 {
        return Err(invalid("draft.rounds", "must be greater than 0"));
    }
    if draft.rounds > draft.roster_capacity {
        return Err(invalid(
            "draft.rounds",
            format!(
                "{} rounds cannot fit a roster capacity of {}",
                draft.rounds, draft.roster_capacity
            ),
        ));
    }

    let slots = draft.total_starter_slots();
    if slots == 0 {
        return Err(invalid("draft.starters", "at least one starter slot is required"));
    }
    if slots > draft.roster_capacity {
        return Err(invalid(
            "draft.starters",
            format!(
                "{slots} starter slots exceed the roster capacity of {}",
                draft.roster_capacity
            ),
        ));
    }
    if let Some(declared) = draft.starter_capacity {
        if declared != slots {
            return Err(invalid(
                "draft.starter_capacity",
                format!("declared {declared} but the starter slots sum to {slots}"),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
