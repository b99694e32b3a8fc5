// Player pool and pick-model data loading.
//
// Reads two CSV files: per-season player projections
// (`name,position,year,projected_points,tier`, one row per player-season)
// and the historical pick model (`pick,qb,rb,wr,te,dst,k`).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::config::{Config, DataPaths};
use crate::draft::pick::Position;
use crate::draft::player::{Player, PointsRecord};
use crate::valuation::classifier::{PickBand, PickTableClassifier};

/// Everything the simulator needs besides the config.
#[derive(Debug, Clone)]
pub struct DraftData {
    pub players: Vec<Player>,
    pub pick_model: PickTableClassifier,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV rows
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    name: String,
    position: String,
    year: u16,
    projected_points: f64,
    tier: u8,
}

#[derive(Debug, Deserialize)]
struct RawPickRow {
    pick: usize,
    qb: f64,
    rb: f64,
    wr: f64,
    te: f64,
    dst: f64,
    k: f64,
}

// ---------------------------------------------------------------------------
// Reader-based loaders
// ---------------------------------------------------------------------------

/// Rows for the same (name, position) merge into one player; players keep
/// the order in which they first appear.
fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players: Vec<Player> = Vec::new();
    let mut index: HashMap<(String, Position), usize> = HashMap::new();

    for result in reader.deserialize::<RawPlayerRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
                continue;
            }
        };
        let name = raw.name.trim();
        if name.is_empty() {
            warn!("skipping player row with an empty name");
            continue;
        }
        let Some(position) = Position::from_str_pos(&raw.position) else {
            warn!("skipping player '{}': unknown position '{}'", name, raw.position);
            continue;
        };
        if !raw.projected_points.is_finite() || raw.projected_points < 0.0 {
            warn!(
                "skipping player '{}' ({}): invalid projected points {}",
                name, raw.year, raw.projected_points
            );
            continue;
        }
        if raw.tier == 0 {
            warn!("skipping player '{}' ({}): tier must be 1 or higher", name, raw.year);
            continue;
        }

        let key = (name.to_string(), position);
        let slot = *index.entry(key).or_insert_with(|| {
            players.push(Player::new(name, position));
            players.len() - 1
        });
        let record = PointsRecord {
            projected_points: raw.projected_points,
            tier: raw.tier,
        };
        if players[slot].points.insert(raw.year, record).is_some() {
            warn!(
                "duplicate {} projection for '{}', using latest value",
                raw.year, name
            );
        }
    }
    Ok(players)
}

fn load_pick_bands_from_reader<R: Read>(rdr: R) -> Result<Vec<PickBand>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut bands = Vec::new();
    for result in reader.deserialize::<RawPickRow>() {
        match result {
            Ok(raw) => {
                let probabilities = [raw.qb, raw.rb, raw.wr, raw.te, raw.dst, raw.k];
                if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
                    warn!("skipping pick model row {}: invalid probability", raw.pick);
                    continue;
                }
                bands.push(PickBand {
                    pick: raw.pick,
                    probabilities,
                });
            }
            Err(e) => {
                warn!("skipping malformed pick model row: {}", e);
            }
        }
    }
    Ok(bands)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the player pool from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load the pick model from a CSV file and build the lookup classifier.
pub fn load_pick_model(path: &Path) -> Result<PickTableClassifier, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let bands = load_pick_bands_from_reader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    PickTableClassifier::new(bands)
        .map_err(|e| DataError::Validation(format!("{}: {e}", path.display())))
}

/// Load players and pick model using paths from the config.
pub fn load_all(config: &Config) -> Result<DraftData, DataError> {
    load_all_from_paths(&config.data_paths)
}

pub fn load_all_from_paths(paths: &DataPaths) -> Result<DraftData, DataError> {
    let players = load_players(Path::new(&paths.players))?;
    if players.is_empty() {
        return Err(DataError::Validation(
            "player CSV produced zero valid rows".into(),
        ));
    }
    let pick_model = load_pick_model(Path::new(&paths.pick_model))?;

    Ok(DraftData {
        players,
        pick_model,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
