// Player records and per-season point projections.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pick::Position;
use crate::error::DraftError;
use crate::valuation::sampler::PointSampler;

/// Projection for one player in one season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointsRecord {
    pub projected_points: f64,
    /// Performance tier (1 = elite). Selects the sampling distribution.
    pub tier: u8,
}

/// A draftable player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub position: Position,
    /// Season year -> points record.
    pub points: BTreeMap<u16, PointsRecord>,
}

impl Player {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Player {
            name: name.into(),
            position,
            points: BTreeMap::new(),
        }
    }

    /// Builder-style helper that records a projection for `year`.
    pub fn with_points(mut self, year: u16, projected_points: f64, tier: u8) -> Self {
        self.points.insert(
            year,
            PointsRecord {
                projected_points,
                tier,
            },
        );
        self
    }

    /// The points record for `year`, or `MissingYear`.
    pub fn points_for(&self, year: u16) -> Result<&PointsRecord, DraftError> {
        self.points.get(&year).ok_or_else(|| DraftError::MissingYear {
            player: self.name.clone(),
            year,
        })
    }

    pub fn projected_points(&self, year: u16) -> Result<f64, DraftError> {
        self.points_for(year).map(|p| p.projected_points)
    }

    /// Draw one randomized point outcome for `year` from the player's
    /// position/tier distribution. Nothing is cached; every call draws anew.
    pub fn randomized_points<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sampler: &PointSampler,
        year: u16,
    ) -> Result<f64, DraftError> {
        let record = self.points_for(year)?;
        sampler.sample(rng, self.position, record.tier, record.projected_points)
    }
}
