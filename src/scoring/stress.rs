//! Stress tolerance: drought and emergence fit, risk-weighted.

use smallvec::smallvec;

use super::tolerance::match_tolerance_to_risk;
use super::{weighted_average, ScoreNotes, WeightedScores};
use crate::fields::FieldRequirements;

/// Drought risk must clear this before the drought rating matters.
const DROUGHT_THRESHOLD: f64 = 0.2;
/// Emergence challenge threshold; the sub-factor also carries a reduced
/// weight since vigor matters less than water.
const EMERGENCE_THRESHOLD: f64 = 0.3;
const EMERGENCE_WEIGHT: f64 = 0.7;

/// Score stress tolerance for a product's drought and emergence ratings
/// against the field profile.
pub fn score_stress_tolerance(
    drought_tolerance: Option<u8>,
    emergence_vigor: Option<u8>,
    requirements: &FieldRequirements,
    notes: &mut ScoreNotes,
) -> f64 {
    let mut pairs: WeightedScores = smallvec![];

    if requirements.drought_risk > DROUGHT_THRESHOLD {
        let score = match_tolerance_to_risk(drought_tolerance, requirements.drought_risk);
        pairs.push((score, requirements.drought_risk));

        if requirements.drought_risk >= 0.5 {
            match drought_tolerance {
                Some(rating) if rating >= 7 => {
                    notes.strength("Strong drought tolerance for droughty ground");
                }
                Some(rating) if rating <= 4 => {
                    notes.concern("Low drought tolerance on droughty ground");
                }
                _ => {}
            }
        }
    }

    if requirements.emergence_challenge > EMERGENCE_THRESHOLD {
        let score = match_tolerance_to_risk(emergence_vigor, requirements.emergence_challenge);
        pairs.push((score, requirements.emergence_challenge * EMERGENCE_WEIGHT));

        if requirements.emergence_challenge >= 0.5 && emergence_vigor.is_some_and(|r| r <= 4) {
            notes.concern("Weak emergence vigor for a tough seedbed");
        }
    }

    weighted_average(&pairs)
}
