// Randomized season-point generation.
//
// Each (position, tier) pair owns a distribution over the ratio of realized
// to projected points. A draw scales the player's projection by that ratio
// and clips the result to the position's ceiling.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::Deserialize;

use crate::config::ScoringConfig;
use crate::draft::pick::Position;
use crate::error::DraftError;

// ---------------------------------------------------------------------------
// Configured shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    #[default]
    Normal,
    LogNormal,
}

/// Distribution parameters for one performance tier of one position.
///
/// `mean` and `std_dev` describe the realized/projected ratio itself, for
/// both kinds; log-normal parameters are derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TierDistribution {
    pub tier: u8,
    #[serde(default)]
    pub kind: DistributionKind,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone)]
enum RatioSampler {
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
}

impl RatioSampler {
    fn build(dist: &TierDistribution) -> Result<Self, String> {
        if !dist.mean.is_finite() || !dist.std_dev.is_finite() {
            return Err("mean and std_dev must be finite".into());
        }
        if dist.std_dev < 0.0 {
            return Err(format!("std_dev must be >= 0, got {}", dist.std_dev));
        }
        match dist.kind {
            DistributionKind::Normal => Normal::new(dist.mean, dist.std_dev)
                .map(RatioSampler::Normal)
                .map_err(|e| e.to_string()),
            DistributionKind::LogNormal => {
                if dist.mean <= 0.0 {
                    return Err(format!("lognormal mean must be > 0, got {}", dist.mean));
                }
                // mean = exp(mu + sigma^2/2), var = (exp(sigma^2) - 1) * mean^2
                let variance = dist.std_dev * dist.std_dev;
                let sigma_sq = (1.0 + variance / (dist.mean * dist.mean)).ln();
                let mu = dist.mean.ln() - sigma_sq / 2.0;
                LogNormal::new(mu, sigma_sq.sqrt())
                    .map(RatioSampler::LogNormal)
                    .map_err(|e| e.to_string())
            }
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            RatioSampler::Normal(d) => d.sample(rng),
            RatioSampler::LogNormal(d) => d.sample(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// PointSampler
// ---------------------------------------------------------------------------

/// Draws randomized point totals for players. The random source is always
/// passed in, so a seeded RNG reproduces every draw.
#[derive(Debug, Clone)]
pub struct PointSampler {
    distributions: BTreeMap<(Position, u8), RatioSampler>,
    max_points: BTreeMap<Position, f64>,
}

impl PointSampler {
    /// Build a sampler from the scoring config, validating every ceiling and
    /// distribution. Every position needs a positive, finite ceiling; tiers
    /// must be unique per position.
    pub fn from_config(scoring: &ScoringConfig) -> Result<Self, DraftError> {
        let mut max_points = BTreeMap::new();
        for pos in Position::ALL {
            let field = format!("scoring.max_points.{}", pos.config_key());
            let cap = scoring
                .max_points
                .get(&pos)
                .copied()
                .ok_or_else(|| DraftError::validation(&field, "missing ceiling"))?;
            if !cap.is_finite() || cap <= 0.0 {
                return Err(DraftError::validation(field, format!("must be > 0, got {cap}")));
            }
            max_points.insert(pos, cap);
        }

        let mut distributions = BTreeMap::new();
        for (&pos, tiers) in &scoring.distributions {
            let field = format!("scoring.distributions.{}", pos.config_key());
            for dist in tiers {
                let sampler = RatioSampler::build(dist).map_err(|message| {
                    DraftError::validation(&field, format!("tier {}: {message}", dist.tier))
                })?;
                if distributions.insert((pos, dist.tier), sampler).is_some() {
                    return Err(DraftError::validation(
                        field,
                        format!("tier {} is defined more than once", dist.tier),
                    ));
                }
            }
        }

        Ok(PointSampler {
            distributions,
            max_points,
        })
    }

    pub fn max_points(&self, position: Position) -> Option<f64> {
        self.max_points.get(&position).copied()
    }

    /// Draw a randomized season total for a player at `position` and `tier`
    /// whose projection is `base_projected_points`. The result lies in
    /// `[0, max_points(position)]`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        position: Position,
        tier: u8,
        base_projected_points: f64,
    ) -> Result<f64, DraftError> {
        let field = format!("scoring.distributions.{}", position.config_key());
        let sampler = self
            .distributions
            .get(&(position, tier))
            .ok_or_else(|| DraftError::validation(&field, format!("no distribution for tier {tier}")))?;
        let cap = self
            .max_points(position)
            .ok_or_else(|| DraftError::validation(field, "missing ceiling"))?;

        let ratio = sampler.sample(rng);
        Ok((base_projected_points * ratio).clamp(0.0, cap))
    }
}
