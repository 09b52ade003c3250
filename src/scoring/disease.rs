//! Disease tolerance aggregates and SCN resistance-source scoring.
//!
//! Each applicable disease contributes a (fit, weight = risk) pair once its
//! risk clears the materiality threshold. SCN and IDC are over-weighted for
//! soybeans: a broken SCN package costs more than a foliar disease.

use smallvec::smallvec;

use super::tolerance::match_tolerance_to_risk;
use super::{weighted_average, ScoreNotes, WeightedScores};
use crate::fields::FieldRequirements;
use crate::products::{CornHybrid, SoybeanVariety};
use crate::reference::scn_source_base_score;

/// Ordinary diseases only count once risk exceeds this.
const DISEASE_THRESHOLD: f64 = 0.1;
/// SCN and IDC only engage at meaningful pressure, but then carry extra
/// weight.
const SPECIAL_THRESHOLD: f64 = 0.3;
const SPECIAL_WEIGHT: f64 = 1.5;

/// Risk level treated as "high pressure" for note generation.
const NOTE_RISK: f64 = 0.7;

fn push_rated(
    pairs: &mut WeightedScores,
    notes: &mut ScoreNotes,
    name: &str,
    rating: Option<u8>,
    risk: f64,
) {
    let Some(rating) = rating else {
        return;
    };
    if risk <= DISEASE_THRESHOLD {
        return;
    }

    let score = match_tolerance_to_risk(Some(rating), risk);
    pairs.push((score, risk));

    if risk >= NOTE_RISK {
        if rating >= 7 {
            notes.strength(format!("Good {name} tolerance for a high-risk field"));
        } else if rating <= 5 {
            notes.concern(format!("{name} risk exceeds this product's rating"));
        }
    }
}

/// Corn disease aggregate over the four corn foliar/bacterial diseases.
pub fn score_corn_disease(
    hybrid: &CornHybrid,
    requirements: &FieldRequirements,
    notes: &mut ScoreNotes,
) -> f64 {
    let mut pairs: WeightedScores = smallvec![];

    push_rated(
        &mut pairs,
        notes,
        "Gray Leaf Spot",
        hybrid.gray_leaf_spot,
        requirements.gls_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "Northern Corn Leaf Blight",
        hybrid.northern_leaf_blight,
        requirements.nclb_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "Tar Spot",
        hybrid.tar_spot,
        requirements.tar_spot_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "Goss's Wilt",
        hybrid.goss_wilt,
        requirements.goss_wilt_risk,
    );

    weighted_average(&pairs)
}

/// Soybean disease aggregate: rated diseases plus the SCN source package
/// and IDC, both over-weighted.
pub fn score_soybean_disease(
    variety: &SoybeanVariety,
    requirements: &FieldRequirements,
    notes: &mut ScoreNotes,
) -> f64 {
    let mut pairs: WeightedScores = smallvec![];

    push_rated(
        &mut pairs,
        notes,
        "SDS",
        variety.sds,
        requirements.sds_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "Phytophthora",
        variety.phytophthora_field,
        requirements.phytophthora_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "White Mold",
        variety.white_mold,
        requirements.white_mold_risk,
    );
    push_rated(
        &mut pairs,
        notes,
        "Frogeye Leaf Spot",
        variety.frogeye_leaf_spot,
        requirements.frogeye_risk,
    );

    if requirements.phytophthora_risk >= NOTE_RISK && variety.phytophthora_genes.len() >= 3 {
        notes.strength(format!(
            "Strong Phytophthora package: {}",
            variety.phytophthora_genes.join(", ")
        ));
    }

    if requirements.scn_risk > SPECIAL_THRESHOLD {
        let scn_score = score_scn_resistance(
            variety.scn_source.as_deref(),
            requirements.scn_risk,
            &requirements.scn_source_history,
        );
        pairs.push((scn_score, requirements.scn_risk * SPECIAL_WEIGHT));

        if requirements.scn_risk >= NOTE_RISK {
            match variety.scn_source.as_deref() {
                Some("Peking") => {
                    notes.strength("Peking SCN source counters PI 88788-resistant populations");
                }
                Some("None") | None => {
                    notes.concern("No SCN resistance source on an infested field");
                }
                _ => {}
            }
        }
    }

    if requirements.idc_risk > SPECIAL_THRESHOLD {
        if let Some(idc) = variety.idc_tolerance {
            let idc_score = match_tolerance_to_risk(Some(idc), requirements.idc_risk);
            pairs.push((idc_score, requirements.idc_risk * SPECIAL_WEIGHT));

            if requirements.idc_risk >= NOTE_RISK {
                if idc >= 7 {
                    notes.strength("Good IDC tolerance for high-pH ground");
                } else if idc <= 5 {
                    notes.concern("IDC risk on high-pH ground");
                }
            }
        }
    }

    weighted_average(&pairs)
}

/// Score an SCN resistance source against field pressure, adjusted for the
/// grower's source-rotation history (most recent last).
///
/// Repeating a source erodes it: each consecutive appearance in the last
/// three seasons costs 10%. Rotating away earns a 10% bonus (capped at 1.0)
/// when the source is absent from the last two. The windows overlap by
/// design: a source seen only three seasons ago takes both adjustments.
pub fn score_scn_resistance(source: Option<&str>, _risk: f64, history: &[String]) -> f64 {
    let mut score = scn_source_base_score(source);

    let Some(source) = source else {
        return score;
    };

    let last_three = &history[history.len().saturating_sub(3)..];
    if last_three.iter().any(|s| s == source) {
        let consecutive = last_three.iter().filter(|s| *s == source).count();
        score *= 1.0 - 0.1 * consecutive as f64;
    }

    let last_two = &history[history.len().saturating_sub(2)..];
    if !history.is_empty() && !last_two.iter().any(|s| s == source) {
        score = (score * 1.1).min(1.0);
    }

    score
}
