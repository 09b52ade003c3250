//! One-line placement reasons for ranked recommendations.
//!
//! The engine accumulates raw strength/concern fragments while scoring;
//! this module turns them into a single display sentence. The trait seam
//! exists so a caller can substitute agronomist-written copy for specific
//! products without touching the scoring path.

use rustc_hash::FxHashMap;

use crate::results::Recommendation;

/// Produces the one-line reason shown next to a ranked product.
pub trait ReasonProvider {
    fn reason_for(&self, recommendation: &Recommendation) -> String;
}

/// Default provider: leads with the first strength, appends the first
/// concern as a caveat, and explains filtered products by their filter
/// reason.
#[derive(Debug, Default, Clone)]
pub struct TemplateReasons;

impl ReasonProvider for TemplateReasons {
    fn reason_for(&self, recommendation: &Recommendation) -> String {
        let result = &recommendation.result;

        if result.filtered {
            return match &result.filter_reason {
                Some(reason) => format!("Excluded: {reason}"),
                None => "Excluded".to_string(),
            };
        }

        match (result.strengths.first(), result.concerns.first()) {
            (Some(strength), Some(concern)) => format!("{strength}; watch: {concern}"),
            (Some(strength), None) => strength.clone(),
            (None, Some(concern)) => format!("Solid overall fit; watch: {concern}"),
            (None, None) => "Solid overall fit with no flagged risks".to_string(),
        }
    }
}

/// Provider with hand-written copy for specific products, keyed by
/// "<brand> <name>", falling back to the template for everything else.
#[derive(Debug, Default, Clone)]
pub struct CuratedReasons {
    overrides: FxHashMap<String, String>,
    fallback: TemplateReasons,
}

impl CuratedReasons {
    pub fn new(overrides: FxHashMap<String, String>) -> Self {
        CuratedReasons {
            overrides,
            fallback: TemplateReasons,
        }
    }

    pub fn insert(&mut self, product: impl Into<String>, reason: impl Into<String>) {
        self.overrides.insert(product.into(), reason.into());
    }
}

impl ReasonProvider for CuratedReasons {
    fn reason_for(&self, recommendation: &Recommendation) -> String {
        if let Some(reason) = self.overrides.get(&recommendation.display_name()) {
            return reason.clone();
        }
        self.fallback.reason_for(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ScoreResult;

    fn recommendation(strengths: Vec<&str>, concerns: Vec<&str>) -> Recommendation {
        Recommendation {
            brand: "Pioneer".to_string(),
            product_name: "P1185AM".to_string(),
            maturity: 111.0,
            result: ScoreResult {
                composite: 82.0,
                filtered: false,
                filter_reason: None,
                components: None,
                strengths: strengths.into_iter().map(String::from).collect(),
                concerns: concerns.into_iter().map(String::from).collect(),
                population: Some(34000),
            },
        }
    }

    #[test]
    fn template_leads_with_first_strength() {
        let rec = recommendation(
            vec!["Strong drought tolerance", "Excellent standability"],
            vec!["Gray Leaf Spot risk"],
        );
        assert_eq!(
            TemplateReasons.reason_for(&rec),
            "Strong drought tolerance; watch: Gray Leaf Spot risk"
        );
    }

    #[test]
    fn template_handles_empty_notes() {
        let rec = recommendation(vec![], vec![]);
        assert_eq!(
            TemplateReasons.reason_for(&rec),
            "Solid overall fit with no flagged risks"
        );
    }

    #[test]
    fn filtered_products_explain_the_filter() {
        let mut rec = recommendation(vec![], vec![]);
        rec.result = ScoreResult::filtered("requires RR2 for a Roundup program");
        assert_eq!(
            TemplateReasons.reason_for(&rec),
            "Excluded: requires RR2 for a Roundup program"
        );
    }

    #[test]
    fn curated_copy_wins_and_falls_back() {
        let mut curated = CuratedReasons::default();
        curated.insert("Pioneer P1185AM", "Local plot winner three years running");

        let rec = recommendation(vec!["Strong drought tolerance"], vec![]);
        assert_eq!(
            curated.reason_for(&rec),
            "Local plot winner three years running"
        );

        let mut other = rec.clone();
        other.product_name = "P0953AM".to_string();
        assert_eq!(curated.reason_for(&other), "Strong drought tolerance");
    }
}
