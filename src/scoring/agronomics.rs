//! Agronomic fit: standability, drydown, test weight, lodging.
//!
//! Unlike the stress and disease components, every sub-score here is a plain
//! rating ratio: these are quality traits, not risk coverage, so the
//! tolerance-matching curve does not apply. Risk only decides the weights.

use smallvec::smallvec;

use super::{normalize_rating, weighted_average, ScoreNotes, WeightedScores};
use crate::fields::FieldRequirements;
use crate::products::{CornHybrid, SoybeanVariety};

const STANDABILITY_THRESHOLD: f64 = 0.3;
const LATE_HARVEST_THRESHOLD: f64 = 0.3;
const LODGING_THRESHOLD: f64 = 0.3;

/// Drydown matters less than standing through harvest.
const DRYDOWN_WEIGHT: f64 = 0.8;
/// Test weight is a flat quality bonus, not risk-driven.
const TEST_WEIGHT_WEIGHT: f64 = 0.3;

/// Corn agronomic aggregate: standability (stalk + root), drydown against
/// late-harvest risk, and test weight as a small quality factor.
pub fn score_corn_agronomics(
    hybrid: &CornHybrid,
    requirements: &FieldRequirements,
    notes: &mut ScoreNotes,
) -> f64 {
    let mut pairs: WeightedScores = smallvec![];

    if requirements.standability_need > STANDABILITY_THRESHOLD {
        // Unrated stalk or root defaults to the scale midpoint rather than
        // dropping the factor: standability is never optional on ground
        // that needs it.
        let stalk = normalize_rating(hybrid.stalk_strength.unwrap_or(5));
        let root = normalize_rating(hybrid.root_strength.unwrap_or(5));
        pairs.push(((stalk + root) / 2.0, requirements.standability_need));

        if hybrid.stalk_strength.is_some_and(|r| r >= 8)
            && hybrid.root_strength.is_some_and(|r| r >= 8)
        {
            notes.strength("Excellent standability for late harvest or exposed ground");
        }
    }

    if requirements.late_harvest_risk > LATE_HARVEST_THRESHOLD {
        if let Some(drydown) = hybrid.drydown {
            pairs.push((
                normalize_rating(drydown),
                requirements.late_harvest_risk * DRYDOWN_WEIGHT,
            ));
        }
    }

    if let Some(tw) = hybrid.test_weight {
        pairs.push((normalize_rating(tw), TEST_WEIGHT_WEIGHT));
    }

    weighted_average(&pairs)
}

/// Soybean agronomic aggregate: lodging resistance against lodging risk.
pub fn score_soybean_agronomics(
    variety: &SoybeanVariety,
    requirements: &FieldRequirements,
    notes: &mut ScoreNotes,
) -> f64 {
    let mut pairs: WeightedScores = smallvec![];

    if requirements.lodging_risk > LODGING_THRESHOLD {
        if let Some(lodging) = variety.lodging_resistance {
            pairs.push((normalize_rating(lodging), requirements.lodging_risk));

            if requirements.lodging_risk >= 0.5 && lodging <= 4 {
                notes.concern("Lodging-prone variety on high-fertility ground");
            }
        }
    }

    weighted_average(&pairs)
}
