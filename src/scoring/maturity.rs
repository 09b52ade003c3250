//! Maturity fit: an asymmetric tent function over the target window.

/// Score how well a product maturity fits the (min, optimal, max) window.
///
/// Strictly outside the window scores 0. Inside, the score falls linearly
/// from 1.0 at the optimal to 0.7 at either boundary, with independent
/// slopes on the short and long sides. Boundary values are inclusive and
/// score exactly 0.7.
pub fn score_maturity_fit(product_maturity: f64, window: (f64, f64, f64)) -> f64 {
    let (min_m, optimal, max_m) = window;

    if product_maturity < min_m || product_maturity > max_m {
        return 0.0;
    }

    let distance = if product_maturity <= optimal {
        (optimal - product_maturity) / (optimal - min_m).max(1e-9)
    } else {
        (product_maturity - optimal) / (max_m - optimal).max(1e-9)
    };

    1.0 - 0.3 * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WINDOW: (f64, f64, f64) = (103.0, 106.0, 108.0);

    #[test]
    fn outside_window_scores_zero() {
        assert_eq!(score_maturity_fit(102.9, WINDOW), 0.0);
        assert_eq!(score_maturity_fit(108.1, WINDOW), 0.0);
        assert_eq!(score_maturity_fit(111.0, WINDOW), 0.0);
    }

    #[test]
    fn optimal_scores_one() {
        assert_relative_eq!(score_maturity_fit(106.0, WINDOW), 1.0);
    }

    #[test]
    fn boundaries_are_inclusive_and_floor_at_point_seven() {
        assert_relative_eq!(score_maturity_fit(103.0, WINDOW), 0.7);
        assert_relative_eq!(score_maturity_fit(108.0, WINDOW), 0.7);
    }

    #[test]
    fn sides_slope_independently() {
        // Halfway down the short side.
        assert_relative_eq!(score_maturity_fit(104.5, WINDOW), 1.0 - 0.3 * 0.5);
        // One unit onto the long side (span 2).
        assert_relative_eq!(score_maturity_fit(107.0, WINDOW), 1.0 - 0.3 * 0.5);
    }

    #[test]
    fn soybean_band_eighty() {
        // MG 2.7 against a (2.0, 2.5, 2.8) window: long-side distance 2/3.
        let score = score_maturity_fit(2.7, (2.0, 2.5, 2.8));
        assert_relative_eq!(score, 0.8, epsilon = 1e-9);
    }
}
