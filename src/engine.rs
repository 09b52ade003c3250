//! Recommendation engine: hard filters, component composition, and ranking.
//!
//! Scoring is deterministic and pure: the same catalog, field, and
//! management always produce bit-identical output, and the parallel ranking
//! path is guaranteed to match the serial one.

use rayon::prelude::*;
use tracing::debug;

use crate::fields::{Field, FieldRequirements};
use crate::management::Management;
use crate::products::{Catalog, CornHybrid, Crop, SoybeanVariety};
use crate::reference::{required_herbicide_trait, ReferenceData};
use crate::requirements::derive_field_requirements;
use crate::results::{ComponentScores, Recommendation, RecommendationSet, ScoreResult};
use crate::scoring::{
    normalize_rating, recommend_population, score_corn_agronomics, score_corn_disease,
    score_maturity_fit, score_soybean_agronomics, score_soybean_disease, score_stress_tolerance,
    ScoreNotes,
};

/// Maturity fit at or above this earns a strength note.
const MATURITY_STRENGTH: f64 = 0.95;

pub struct RecommendationEngine {
    catalog: Catalog,
    reference: ReferenceData,
}

impl RecommendationEngine {
    pub fn new(catalog: Catalog, reference: ReferenceData) -> Self {
        RecommendationEngine { catalog, reference }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// First herbicide program the product's trait package cannot support,
    /// as a filter reason. Programs without a trait requirement pass.
    fn herbicide_filter(management: &Management, traits: &[String]) -> Option<String> {
        for program in &management.herbicide_program {
            if let Some(required) = required_herbicide_trait(program) {
                if !traits.iter().any(|t| t == required) {
                    return Some(format!("requires {required} for a {program} program"));
                }
            }
        }
        None
    }

    fn maturity_notes(crop: Crop, maturity: f64, fit: f64, notes: &mut ScoreNotes) {
        let unit = match crop {
            Crop::Corn => "RM",
            Crop::Soybean => "MG",
        };
        if fit == 0.0 {
            notes.concern(format!("{unit} {maturity} is outside the target window"));
        } else if fit >= MATURITY_STRENGTH {
            notes.strength(format!("{unit} {maturity} sits at the field's optimum"));
        }
    }

    fn compose(
        crop: Crop,
        maturity_fit: f64,
        yield_fit: f64,
        stress_fit: f64,
        disease_fit: f64,
        agronomic_fit: f64,
        notes: ScoreNotes,
        population: u32,
    ) -> ScoreResult {
        let w = crop.weights();
        let composite = (w.maturity * maturity_fit
            + w.yield_potential * yield_fit
            + w.stress * stress_fit
            + w.disease * disease_fit
            + w.agronomic * agronomic_fit)
            * 100.0;

        ScoreResult {
            composite: composite.clamp(0.0, 100.0),
            filtered: false,
            filter_reason: None,
            components: Some(ComponentScores {
                maturity: maturity_fit * 100.0,
                yield_potential: yield_fit * 100.0,
                stress: stress_fit * 100.0,
                disease: disease_fit * 100.0,
                agronomic: agronomic_fit * 100.0,
            }),
            strengths: notes.strengths,
            concerns: notes.concerns,
            population: Some(population),
        }
    }

    /// Score one corn hybrid against a derived field profile.
    pub fn score_corn(
        &self,
        hybrid: &CornHybrid,
        field: &Field,
        management: &Management,
        requirements: &FieldRequirements,
    ) -> ScoreResult {
        if let Some(reason) = Self::herbicide_filter(management, &hybrid.herbicide_traits) {
            return ScoreResult::filtered(reason);
        }

        let mut notes = ScoreNotes::default();

        let maturity_fit =
            score_maturity_fit(hybrid.relative_maturity, requirements.target_maturity);
        Self::maturity_notes(
            Crop::Corn,
            hybrid.relative_maturity,
            maturity_fit,
            &mut notes,
        );

        let yield_fit = normalize_rating(hybrid.yield_potential);
        let stress_fit = score_stress_tolerance(
            hybrid.drought_tolerance,
            hybrid.emergence_vigor,
            requirements,
            &mut notes,
        );
        let disease_fit = score_corn_disease(hybrid, requirements, &mut notes);
        let agronomic_fit = score_corn_agronomics(hybrid, requirements, &mut notes);

        let population = recommend_population(
            Crop::Corn,
            hybrid.population_range,
            &field.features.soil,
        );

        Self::compose(
            Crop::Corn,
            maturity_fit,
            yield_fit,
            stress_fit,
            disease_fit,
            agronomic_fit,
            notes,
            population,
        )
    }

    /// Score one soybean variety against a derived field profile.
    pub fn score_soybean(
        &self,
        variety: &SoybeanVariety,
        field: &Field,
        management: &Management,
        requirements: &FieldRequirements,
    ) -> ScoreResult {
        if let Some(reason) = Self::herbicide_filter(management, &variety.herbicide_traits) {
            return ScoreResult::filtered(reason);
        }

        let mut notes = ScoreNotes::default();

        let maturity_fit = score_maturity_fit(variety.maturity_group, requirements.target_maturity);
        Self::maturity_notes(Crop::Soybean, variety.maturity_group, maturity_fit, &mut notes);

        let yield_fit = normalize_rating(variety.yield_potential);
        let stress_fit = score_stress_tolerance(
            variety.drought_tolerance,
            variety.emergence_vigor,
            requirements,
            &mut notes,
        );
        let disease_fit = score_soybean_disease(variety, requirements, &mut notes);
        let agronomic_fit = score_soybean_agronomics(variety, requirements, &mut notes);

        let population = recommend_population(
            Crop::Soybean,
            variety.population_range,
            &field.features.soil,
        );

        Self::compose(
            Crop::Soybean,
            maturity_fit,
            yield_fit,
            stress_fit,
            disease_fit,
            agronomic_fit,
            notes,
            population,
        )
    }

    fn assemble(
        field: &Field,
        crop: Crop,
        mut recommendations: Vec<Recommendation>,
    ) -> RecommendationSet {
        // Descending by composite; name breaks ties so order is total.
        recommendations.sort_by(|a, b| {
            b.result
                .composite
                .partial_cmp(&a.result.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.display_name().cmp(&b.display_name()))
        });

        let filtered = recommendations.iter().filter(|r| r.result.filtered).count();
        let scored: Vec<f64> = recommendations
            .iter()
            .filter(|r| !r.result.filtered)
            .map(|r| r.result.composite)
            .collect();
        let top_score = scored.first().copied().unwrap_or(0.0);
        let avg_score = if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        };

        debug!(
            field = %field.id,
            crop = %crop,
            evaluated = recommendations.len(),
            filtered,
            top_score,
            "ranked products"
        );

        RecommendationSet {
            field_id: field.id.clone(),
            field_name: field.name.clone(),
            crop,
            products_evaluated: recommendations.len(),
            products_filtered: filtered,
            recommendations,
            top_score,
            avg_score,
        }
    }

    /// Rank every catalog product of `crop` for one field.
    pub fn rank(&self, field: &Field, management: &Management, crop: Crop) -> RecommendationSet {
        let requirements = derive_field_requirements(field, management, crop, &self.reference);

        let recommendations = match crop {
            Crop::Corn => self
                .catalog
                .corn
                .iter()
                .map(|h| Recommendation {
                    brand: h.brand.clone(),
                    product_name: h.name.clone(),
                    maturity: h.relative_maturity,
                    result: self.score_corn(h, field, management, &requirements),
                })
                .collect(),
            Crop::Soybean => self
                .catalog
                .soybeans
                .iter()
                .map(|v| Recommendation {
                    brand: v.brand.clone(),
                    product_name: v.name.clone(),
                    maturity: v.maturity_group,
                    result: self.score_soybean(v, field, management, &requirements),
                })
                .collect(),
        };

        Self::assemble(field, crop, recommendations)
    }

    /// Parallel ranking over the catalog. Output is identical to `rank`:
    /// scoring is pure and the final sort restores a total order.
    pub fn rank_parallel(
        &self,
        field: &Field,
        management: &Management,
        crop: Crop,
    ) -> RecommendationSet {
        let requirements = derive_field_requirements(field, management, crop, &self.reference);

        let recommendations = match crop {
            Crop::Corn => self
                .catalog
                .corn
                .par_iter()
                .map(|h| Recommendation {
                    brand: h.brand.clone(),
                    product_name: h.name.clone(),
                    maturity: h.relative_maturity,
                    result: self.score_corn(h, field, management, &requirements),
                })
                .collect(),
            Crop::Soybean => self
                .catalog
                .soybeans
                .par_iter()
                .map(|v| Recommendation {
                    brand: v.brand.clone(),
                    product_name: v.name.clone(),
                    maturity: v.maturity_group,
                    result: self.score_soybean(v, field, management, &requirements),
                })
                .collect(),
        };

        Self::assemble(field, crop, recommendations)
    }
}
