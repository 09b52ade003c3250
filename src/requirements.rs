//! Requirements Deriver: turns raw environmental observations plus
//! management practice into a normalized `FieldRequirements` profile.
//!
//! Every function here is pure. The profile is recomputed on each scoring
//! call and never cached.

use crate::fields::{
    Disease, Field, FieldRequirements, SoilFeatures, WeatherFeatures, YieldEnvironment,
};
use crate::management::{Irrigation, Management, PreviousCrop, Tillage};
use crate::products::Crop;
use crate::reference::ReferenceData;

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Drought risk from soil water holding and growing-season precipitation.
/// Additive terms are order-independent; the irrigation multiplier applies
/// after all of them, and clamping happens last.
pub fn derive_drought_risk(
    soil: &SoilFeatures,
    weather: &WeatherFeatures,
    irrigation: Irrigation,
) -> f64 {
    let mut risk = 0.3;

    if let Some(aws) = soil.aws_0_100 {
        if aws < 15.0 {
            risk += 0.2;
        } else if aws > 25.0 {
            risk -= 0.1;
        }
    }
    if soil.sand_pct.is_some_and(|sand| sand > 50.0) {
        risk += 0.15;
    }

    if weather
        .growing_season_precip_mm
        .is_some_and(|precip| precip < 450.0)
    {
        risk += 0.2;
    }
    if weather.precip_cv.is_some_and(|cv| cv > 0.3) {
        risk += 0.1;
    }

    match irrigation {
        Irrigation::Pivot => risk *= 0.3,
        Irrigation::Drip => risk *= 0.4,
        Irrigation::None | Irrigation::Flood => {}
    }

    clamp01(risk)
}

/// Corn disease risks: state baseline with rotation and tillage multipliers.
/// Each disease's modifier chain is applied and clamped independently.
fn derive_corn_disease_risks(
    management: &Management,
    state: &str,
    reference: &ReferenceData,
) -> (f64, f64, f64, f64) {
    let mut gls = reference.disease_baseline(Crop::Corn, Disease::GrayLeafSpot, state);
    if management.previous_crop == PreviousCrop::Corn {
        gls *= 1.5;
    }
    match management.tillage {
        Tillage::NoTill => gls *= 1.3,
        Tillage::Conventional => gls *= 0.7,
        Tillage::StripTill | Tillage::MinimumTill => {}
    }

    let nclb = reference.disease_baseline(Crop::Corn, Disease::NorthernCornLeafBlight, state);
    let tar_spot = reference.disease_baseline(Crop::Corn, Disease::TarSpot, state);
    let goss_wilt = reference.disease_baseline(Crop::Corn, Disease::GossWilt, state);

    (
        clamp01(gls),
        clamp01(nclb),
        clamp01(tar_spot),
        clamp01(goss_wilt),
    )
}

/// Soybean disease risks: state baseline with drainage, rotation, row
/// spacing, and pH multipliers.
fn derive_soybean_disease_risks(
    soil: &SoilFeatures,
    management: &Management,
    state: &str,
    reference: &ReferenceData,
) -> (f64, f64, f64, f64, f64, f64) {
    let poor_drainage = soil.drainage_class.is_some_and(|d| d.is_poor());

    let mut sds = reference.disease_baseline(Crop::Soybean, Disease::SuddenDeathSyndrome, state);
    if poor_drainage {
        sds *= 1.4;
    }

    let mut scn = reference.disease_baseline(Crop::Soybean, Disease::SoybeanCystNematode, state);
    if management.soy_frequency_5yr.is_some_and(|years| years >= 3) {
        scn *= 1.3;
    }

    let mut phytophthora = reference.disease_baseline(Crop::Soybean, Disease::Phytophthora, state);
    if poor_drainage {
        phytophthora *= 1.5;
    }

    let mut white_mold = reference.disease_baseline(Crop::Soybean, Disease::WhiteMold, state);
    if management.row_spacing_in <= 15 {
        white_mold *= 1.2;
    }

    let mut idc =
        reference.disease_baseline(Crop::Soybean, Disease::IronDeficiencyChlorosis, state);
    if soil.ph.is_some_and(|ph| ph > 7.5) {
        idc *= 1.5;
    }

    let frogeye = reference.disease_baseline(Crop::Soybean, Disease::FrogeyeLeafSpot, state);

    (
        clamp01(sds),
        clamp01(scn),
        clamp01(phytophthora),
        clamp01(white_mold),
        clamp01(idc),
        clamp01(frogeye),
    )
}

/// Target maturity window from the site's GDD normal.
///
/// Scans the crop's GDD table in descending maturity order and picks the
/// longest maturity whose requirement fits within the available GDD (site
/// mean minus the crop safety margin) - longest maturity maximizes yield
/// potential subject to finishing safely. Falls back to the shortest table
/// entry if nothing fits, and to the crop default window with no GDD data.
pub fn derive_target_maturity(
    weather: &WeatherFeatures,
    crop: Crop,
    reference: &ReferenceData,
) -> (f64, f64, f64) {
    let Some(gdd_mean) = weather.gdd_mean else {
        return crop.default_maturity_window();
    };

    let available_gdd = gdd_mean - crop.gdd_safety_margin();
    let table = reference.gdd_table(crop);

    let optimal = table
        .iter()
        .rev()
        .find(|(_, required)| *required <= available_gdd)
        .map(|(maturity, _)| *maturity)
        .unwrap_or_else(|| table.first().map(|(m, _)| *m).unwrap_or(0.0));

    let (short_side, long_side) = crop.maturity_spread();
    (optimal - short_side, optimal, optimal + long_side)
}

/// Derive the complete requirement profile for one (field, management, crop)
/// combination. Field-level disease overrides replace the derived risk for
/// their disease.
pub fn derive_field_requirements(
    field: &Field,
    management: &Management,
    crop: Crop,
    reference: &ReferenceData,
) -> FieldRequirements {
    let soil = &field.features.soil;
    let weather = &field.features.weather;
    let state = field.features.state.as_str();

    let drought_risk = derive_drought_risk(soil, weather, management.irrigation);
    let target_maturity = derive_target_maturity(weather, crop, reference);

    let mut emergence = 0.3;
    if management.tillage == Tillage::NoTill {
        emergence += 0.2;
    }
    if soil.clay_pct.is_some_and(|clay| clay > 35.0) {
        emergence += 0.15;
    }

    let mut standability = 0.3;
    if soil.slope_pct.is_some_and(|slope| slope > 5.0) {
        standability += 0.1;
    }

    let yield_environment = match soil.om_pct {
        Some(om) if om > 4.0 => YieldEnvironment::High,
        Some(om) if om < 2.0 => YieldEnvironment::Low,
        _ => YieldEnvironment::Medium,
    };

    let heat_stress_risk = if weather.heat_stress_days.is_some_and(|days| days > 7.0) {
        0.3
    } else {
        0.1
    };

    let mut requirements = FieldRequirements {
        target_maturity,
        drought_risk,
        heat_stress_risk,
        emergence_challenge: clamp01(emergence),
        gls_risk: 0.0,
        nclb_risk: 0.0,
        tar_spot_risk: 0.0,
        goss_wilt_risk: 0.0,
        sds_risk: 0.0,
        scn_risk: 0.0,
        phytophthora_risk: 0.0,
        white_mold_risk: 0.0,
        idc_risk: 0.0,
        frogeye_risk: 0.0,
        standability_need: clamp01(standability),
        lodging_risk: 0.3,
        late_harvest_risk: 0.3,
        yield_environment,
        scn_source_history: management.scn_source_history.clone(),
    };

    match crop {
        Crop::Corn => {
            let (gls, nclb, tar_spot, goss_wilt) =
                derive_corn_disease_risks(management, state, reference);
            requirements.gls_risk = gls;
            requirements.nclb_risk = nclb;
            requirements.tar_spot_risk = tar_spot;
            requirements.goss_wilt_risk = goss_wilt;
        }
        Crop::Soybean => {
            let (sds, scn, phytophthora, white_mold, idc, frogeye) =
                derive_soybean_disease_risks(soil, management, state, reference);
            requirements.sds_risk = sds;
            requirements.scn_risk = scn;
            requirements.phytophthora_risk = phytophthora;
            requirements.white_mold_risk = white_mold;
            requirements.idc_risk = idc;
            requirements.frogeye_risk = frogeye;
        }
    }

    for (disease, risk) in &field.disease_overrides {
        let slot = match disease {
            Disease::GrayLeafSpot => &mut requirements.gls_risk,
            Disease::NorthernCornLeafBlight => &mut requirements.nclb_risk,
            Disease::TarSpot => &mut requirements.tar_spot_risk,
            Disease::GossWilt => &mut requirements.goss_wilt_risk,
            Disease::SuddenDeathSyndrome => &mut requirements.sds_risk,
            Disease::SoybeanCystNematode => &mut requirements.scn_risk,
            Disease::Phytophthora => &mut requirements.phytophthora_risk,
            Disease::WhiteMold => &mut requirements.white_mold_risk,
            Disease::IronDeficiencyChlorosis => &mut requirements.idc_risk,
            Disease::FrogeyeLeafSpot => &mut requirements.frogeye_risk,
        };
        *slot = clamp01(*risk);
    }

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn droughty_soil() -> SoilFeatures {
        SoilFeatures {
            aws_0_100: Some(12.0),
            sand_pct: Some(60.0),
            ..Default::default()
        }
    }

    fn dry_weather() -> WeatherFeatures {
        WeatherFeatures {
            growing_season_precip_mm: Some(400.0),
            precip_cv: Some(0.35),
            ..Default::default()
        }
    }

    #[test]
    fn drought_risk_accumulates_and_clamps() {
        // 0.3 + 0.2 + 0.15 + 0.2 + 0.1 = 0.95
        let risk = derive_drought_risk(&droughty_soil(), &dry_weather(), Irrigation::None);
        assert_relative_eq!(risk, 0.95);

        // High AWS subtracts.
        let soil = SoilFeatures {
            aws_0_100: Some(28.0),
            ..Default::default()
        };
        let risk = derive_drought_risk(&soil, &WeatherFeatures::default(), Irrigation::None);
        assert_relative_eq!(risk, 0.2);
    }

    #[test]
    fn irrigation_multiplier_applies_after_additive_terms() {
        let risk = derive_drought_risk(&droughty_soil(), &dry_weather(), Irrigation::Pivot);
        assert_relative_eq!(risk, 0.95 * 0.3);
        let risk = derive_drought_risk(&droughty_soil(), &dry_weather(), Irrigation::Drip);
        assert_relative_eq!(risk, 0.95 * 0.4);
    }

    #[test]
    fn corn_target_maturity_from_gdd() {
        let reference = ReferenceData::builtin();
        let weather = WeatherFeatures {
            gdd_mean: Some(2850.0),
            ..Default::default()
        };
        // Available 2750 GDD -> longest RM whose requirement fits is 106.
        let window = derive_target_maturity(&weather, Crop::Corn, &reference);
        assert_eq!(window, (103.0, 106.0, 108.0));
    }

    #[test]
    fn soybean_target_maturity_from_gdd() {
        let reference = ReferenceData::builtin();
        let weather = WeatherFeatures {
            gdd_mean: Some(2800.0),
            ..Default::default()
        };
        // Available 2650 GDD -> MG 2.5 (requires 2633.5).
        let window = derive_target_maturity(&weather, Crop::Soybean, &reference);
        assert_relative_eq!(window.0, 2.0);
        assert_relative_eq!(window.1, 2.5);
        assert_relative_eq!(window.2, 2.8);
    }

    #[test]
    fn target_maturity_defaults_without_gdd() {
        let reference = ReferenceData::builtin();
        let weather = WeatherFeatures::default();
        assert_eq!(
            derive_target_maturity(&weather, Crop::Corn, &reference),
            (105.0, 110.0, 115.0)
        );
        assert_eq!(
            derive_target_maturity(&weather, Crop::Soybean, &reference),
            (2.5, 3.0, 3.5)
        );
    }

    #[test]
    fn target_maturity_falls_back_to_shortest_when_season_too_short() {
        let reference = ReferenceData::builtin();
        let weather = WeatherFeatures {
            gdd_mean: Some(1500.0),
            ..Default::default()
        };
        let window = derive_target_maturity(&weather, Crop::Corn, &reference);
        assert_relative_eq!(window.1, 80.0);
    }

    fn test_field(state: &str, soil: SoilFeatures, weather: WeatherFeatures) -> Field {
        Field {
            id: "t1".to_string(),
            name: "Test".to_string(),
            acres: None,
            features: crate::fields::FieldFeatures {
                soil,
                weather,
                state: state.to_string(),
                county: None,
            },
            disease_overrides: Default::default(),
        }
    }

    #[test]
    fn corn_on_corn_no_till_raises_gls_risk() {
        let reference = ReferenceData::builtin();
        let field = test_field("IN", SoilFeatures::default(), WeatherFeatures::default());
        let management = Management {
            previous_crop: PreviousCrop::Corn,
            tillage: Tillage::NoTill,
            ..Default::default()
        };

        let req = derive_field_requirements(&field, &management, Crop::Corn, &reference);
        // IN baseline 0.5, x1.5 corn-on-corn, x1.3 no-till = 0.975
        assert_relative_eq!(req.gls_risk, 0.5 * 1.5 * 1.3);

        // Conventional till cuts it instead.
        let management = Management {
            previous_crop: PreviousCrop::Corn,
            tillage: Tillage::Conventional,
            ..Default::default()
        };
        let req = derive_field_requirements(&field, &management, Crop::Corn, &reference);
        assert_relative_eq!(req.gls_risk, 0.5 * 1.5 * 0.7);
    }

    #[test]
    fn disease_risks_clamp_independently() {
        let reference = ReferenceData::builtin();
        let soil = SoilFeatures {
            drainage_class: Some(crate::fields::DrainageClass::PoorlyDrained),
            ph: Some(7.8),
            ..Default::default()
        };
        let field = test_field("IA", soil, WeatherFeatures::default());
        let management = Management {
            soy_frequency_5yr: Some(4),
            row_spacing_in: 15,
            ..Default::default()
        };

        let req = derive_field_requirements(&field, &management, Crop::Soybean, &reference);
        assert_relative_eq!(req.sds_risk, 0.5 * 1.4);
        assert_relative_eq!(req.scn_risk, 0.7 * 1.3); // 0.91, below clamp
        assert!(req.phytophthora_risk <= 1.0);
        // Soy run never populates corn risks.
        assert_relative_eq!(req.gls_risk, 0.0);
    }

    #[test]
    fn emergence_and_standability_terms() {
        let reference = ReferenceData::builtin();
        let soil = SoilFeatures {
            clay_pct: Some(40.0),
            slope_pct: Some(6.0),
            om_pct: Some(4.5),
            ..Default::default()
        };
        let field = test_field("IL", soil, WeatherFeatures::default());
        let management = Management {
            tillage: Tillage::NoTill,
            ..Default::default()
        };

        let req = derive_field_requirements(&field, &management, Crop::Corn, &reference);
        assert_relative_eq!(req.emergence_challenge, 0.3 + 0.2 + 0.15);
        assert_relative_eq!(req.standability_need, 0.4);
        assert_eq!(req.yield_environment, YieldEnvironment::High);
    }

    #[test]
    fn heat_stress_is_a_step_function() {
        let reference = ReferenceData::builtin();
        let hot = WeatherFeatures {
            heat_stress_days: Some(8.0),
            ..Default::default()
        };
        let mild = WeatherFeatures {
            heat_stress_days: Some(5.0),
            ..Default::default()
        };
        let field = test_field("IN", SoilFeatures::default(), hot);
        let req =
            derive_field_requirements(&field, &Management::default(), Crop::Corn, &reference);
        assert_relative_eq!(req.heat_stress_risk, 0.3);

        let field = test_field("IN", SoilFeatures::default(), mild);
        let req =
            derive_field_requirements(&field, &Management::default(), Crop::Corn, &reference);
        assert_relative_eq!(req.heat_stress_risk, 0.1);
    }

    #[test]
    fn field_overrides_replace_derived_risk() {
        let reference = ReferenceData::builtin();
        let mut field = test_field("IN", SoilFeatures::default(), WeatherFeatures::default());
        field
            .disease_overrides
            .insert(Disease::TarSpot, 8.0 / 9.0);

        let req =
            derive_field_requirements(&field, &Management::default(), Crop::Corn, &reference);
        assert_relative_eq!(req.tar_spot_risk, 8.0 / 9.0);
    }
}
