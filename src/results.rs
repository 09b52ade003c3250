//! Result types: per-product scores and the ranked recommendation set.

use serde::{Deserialize, Serialize};

use crate::products::Crop;

/// Component sub-scores on the 0-100 display scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentScores {
    pub maturity: f64,
    pub yield_potential: f64,
    pub stress: f64,
    pub disease: f64,
    pub agronomic: f64,
}

/// Outcome of scoring one product against one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0-100 composite. Zero for filtered products.
    pub composite: f64,
    /// Set when a hard filter removed the product before scoring.
    pub filtered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_reason: Option<String>,
    /// Absent for filtered products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentScores>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    /// Recommended seeds per acre. Absent for filtered products.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u32>,
}

impl ScoreResult {
    /// A hard-filtered result: composite zero, no components, no population.
    pub fn filtered(reason: impl Into<String>) -> Self {
        ScoreResult {
            composite: 0.0,
            filtered: true,
            filter_reason: Some(reason.into()),
            components: None,
            strengths: Vec::new(),
            concerns: Vec::new(),
            population: None,
        }
    }
}

/// One ranked product with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub brand: String,
    pub product_name: String,
    /// RM days for corn, MG for soybeans.
    pub maturity: f64,
    #[serde(flatten)]
    pub result: ScoreResult,
}

impl Recommendation {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.product_name)
    }
}

/// Ranked recommendations for one field and crop, best first. Filtered
/// products sort to the bottom with composite zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub field_id: String,
    pub field_name: String,
    pub crop: Crop,
    pub recommendations: Vec<Recommendation>,
    pub top_score: f64,
    /// Mean composite over unfiltered products only.
    pub avg_score: f64,
    pub products_evaluated: usize,
    pub products_filtered: usize,
}

impl RecommendationSet {
    /// The top `n` unfiltered recommendations.
    pub fn top(&self, n: usize) -> impl Iterator<Item = &Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| !r.result.filtered)
            .take(n)
    }

    /// Flatten to CSV rows: rank, product, maturity, composite, the five
    /// components, population. Filtered products are excluded.
    pub fn to_csv_rows(&self) -> Vec<String> {
        let mut rows = vec![
            "rank,brand,product,maturity,composite,maturity_score,yield_score,stress_score,disease_score,agronomic_score,population".to_string(),
        ];
        let with_components = self
            .top(usize::MAX)
            .filter_map(|rec| rec.result.components.map(|c| (rec, c)));
        for (rank, (rec, c)) in with_components.enumerate() {
            rows.push(format!(
                "{},{},{},{},{:.1},{:.1},{:.1},{:.1},{:.1},{:.1},{}",
                rank + 1,
                rec.brand,
                rec.product_name,
                rec.maturity,
                rec.result.composite,
                c.maturity,
                c.yield_potential,
                c.stress,
                c.disease,
                c.agronomic,
                rec.result.population.unwrap_or(0),
            ));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, composite: f64, filtered: bool) -> Recommendation {
        Recommendation {
            brand: "Test".to_string(),
            product_name: name.to_string(),
            maturity: 111.0,
            result: if filtered {
                ScoreResult::filtered("missing trait")
            } else {
                ScoreResult {
                    composite,
                    filtered: false,
                    filter_reason: None,
                    components: Some(ComponentScores {
                        maturity: 80.0,
                        yield_potential: 88.9,
                        stress: 80.0,
                        disease: 80.0,
                        agronomic: 80.0,
                    }),
                    strengths: Vec::new(),
                    concerns: Vec::new(),
                    population: Some(34000),
                }
            },
        }
    }

    fn set() -> RecommendationSet {
        RecommendationSet {
            field_id: "f1".to_string(),
            field_name: "North 80".to_string(),
            crop: Crop::Corn,
            recommendations: vec![
                rec("A", 85.0, false),
                rec("B", 72.0, false),
                rec("C", 0.0, true),
            ],
            top_score: 85.0,
            avg_score: 78.5,
            products_evaluated: 3,
            products_filtered: 1,
        }
    }

    #[test]
    fn top_skips_filtered() {
        let set = set();
        let names: Vec<&str> = set.top(10).map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn csv_has_header_and_ranked_rows() {
        let rows = set().to_csv_rows();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("rank,brand"));
        assert!(rows[1].starts_with("1,Test,A,"));
        assert!(rows[2].starts_with("2,Test,B,"));
    }

    #[test]
    fn csv_skips_results_without_components() {
        // A hand-built result can be unfiltered yet carry no component
        // breakdown; the export drops the row instead of panicking.
        let mut set = set();
        set.recommendations[1].result.components = None;

        let rows = set.to_csv_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("1,Test,A,"));
    }

    #[test]
    fn filtered_result_serializes_without_components() {
        let json = serde_json::to_string(&ScoreResult::filtered("needs RR2")).unwrap();
        assert!(json.contains("\"filtered\":true"));
        assert!(!json.contains("components"));
        assert!(!json.contains("population"));
    }
}
