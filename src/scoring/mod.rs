//! Component scoring for product-field fit.
//!
//! Each component lives in its own module and returns a 0-1 score; the
//! engine weights them into the 0-100 composite. All functions are pure and
//! infallible: a missing rating resolves to its documented neutral default.

pub mod agronomics;
pub mod disease;
pub mod maturity;
pub mod population;
pub mod stress;
pub mod tolerance;

pub use agronomics::{score_corn_agronomics, score_soybean_agronomics};
pub use disease::{score_corn_disease, score_scn_resistance, score_soybean_disease};
pub use maturity::score_maturity_fit;
pub use population::recommend_population;
pub use stress::score_stress_tolerance;
pub use tolerance::match_tolerance_to_risk;

use smallvec::SmallVec;

/// Aggregate score when no sub-factor clears its materiality threshold:
/// absence of risk means a satisfactory fit, not a penalty.
pub const NEUTRAL_AGGREGATE: f64 = 0.8;

/// (score, weight) accumulator for the risk-weighted aggregates. Component
/// aggregates never exceed a handful of sub-factors.
pub(crate) type WeightedScores = SmallVec<[(f64, f64); 6]>;

/// Risk-weighted average of (score, weight) pairs, defaulting to the
/// neutral aggregate when nothing was material.
pub(crate) fn weighted_average(pairs: &WeightedScores) -> f64 {
    let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
    if pairs.is_empty() || total_weight == 0.0 {
        return NEUTRAL_AGGREGATE;
    }
    pairs.iter().map(|(s, w)| s * w).sum::<f64>() / total_weight
}

/// Normalize a 1-9 rating to 0-1.
pub(crate) fn normalize_rating(rating: u8) -> f64 {
    f64::from(rating) / 9.0
}

/// Strength and concern strings accumulated while scoring one product. The
/// first entries are surfaced preferentially when display truncates.
#[derive(Debug, Default, Clone)]
pub struct ScoreNotes {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl ScoreNotes {
    pub fn strength(&mut self, text: impl Into<String>) {
        self.strengths.push(text.into());
    }

    pub fn concern(&mut self, text: impl Into<String>) {
        self.concerns.push(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use smallvec::smallvec;

    #[test]
    fn weighted_average_defaults_when_empty() {
        let empty: WeightedScores = smallvec![];
        assert_relative_eq!(weighted_average(&empty), NEUTRAL_AGGREGATE);
    }

    #[test]
    fn weighted_average_weights_by_risk() {
        let pairs: WeightedScores = smallvec![(1.0, 0.8), (0.5, 0.2)];
        assert_relative_eq!(weighted_average(&pairs), (0.8 + 0.1) / 1.0);
    }
}
