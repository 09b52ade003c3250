//! Tolerance-to-risk matching: the central placement heuristic.
//!
//! Three risk regimes with distinct formulas. Tolerance earns little when
//! risk is low, and deficiency is punished non-linearly, harder as the
//! required tolerance rises.

/// Match a 1-9 tolerance rating against a 0-1 risk level, returning a 0-1
/// fit score. An absent rating is neutral (0.5), never zero.
pub fn match_tolerance_to_risk(rating: Option<u8>, risk: f64) -> f64 {
    let Some(rating) = rating else {
        return 0.5;
    };

    let tolerance = f64::from(rating) / 9.0;

    if risk < 0.3 {
        // Low risk: tolerance barely matters.
        0.7 + 0.3 * tolerance
    } else if risk < 0.7 {
        // Moderate risk: reward coverage, penalize shortfall steeply.
        if tolerance >= risk {
            0.85 + 0.15 * (tolerance - risk)
        } else {
            (0.85 - 1.5 * (risk - tolerance)).max(0.3)
        }
    } else {
        // High risk: the steepest penalty regime.
        if tolerance >= 0.7 {
            0.9 + (0.1 / 0.3) * (tolerance - 0.7)
        } else {
            (0.9 - 2.0 * (0.7 - tolerance)).max(0.2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn absent_rating_is_exactly_neutral() {
        for risk in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(match_tolerance_to_risk(None, risk), 0.5);
        }
    }

    #[test]
    fn output_is_bounded_for_all_ratings_and_risks() {
        for rating in 1..=9u8 {
            let mut risk = 0.0;
            while risk <= 1.0 {
                let score = match_tolerance_to_risk(Some(rating), risk);
                assert!(
                    (0.0..=1.0).contains(&score),
                    "rating {rating} risk {risk}: {score}"
                );
                risk += 0.05;
            }
        }
    }

    #[test]
    fn low_risk_rewards_tolerance_mildly() {
        assert_relative_eq!(match_tolerance_to_risk(Some(9), 0.1), 1.0);
        assert_relative_eq!(match_tolerance_to_risk(Some(1), 0.1), 0.7 + 0.3 / 9.0);
    }

    #[test]
    fn moderate_risk_penalizes_shortfall() {
        // Tolerance 6/9 = 0.667 against risk 0.5: covered.
        let covered = match_tolerance_to_risk(Some(6), 0.5);
        assert_relative_eq!(covered, 0.85 + 0.15 * (6.0 / 9.0 - 0.5));

        // Tolerance 2/9 = 0.222 against risk 0.5: steep penalty.
        let short = match_tolerance_to_risk(Some(2), 0.5);
        assert_relative_eq!(short, 0.85 - 1.5 * (0.5 - 2.0 / 9.0));
        assert!(short < covered);
    }

    #[test]
    fn high_risk_floors_at_point_two() {
        assert_relative_eq!(match_tolerance_to_risk(Some(1), 0.9), 0.2);
        // Tolerance exactly 0.7 (not expressible on a ninth scale) brackets:
        // 7/9 is above the knee, 6/9 below.
        assert!(match_tolerance_to_risk(Some(7), 0.9) > 0.9);
        assert!(match_tolerance_to_risk(Some(6), 0.9) < 0.9);
    }

    #[test]
    fn penalty_steepens_with_risk_regime() {
        // Same one-unit shortfall hurts more in the high regime.
        let moderate = 0.85 - match_tolerance_to_risk(Some(3), 0.5);
        let high = 0.9 - match_tolerance_to_risk(Some(4), 0.9);
        assert!(high > moderate);
    }
}
