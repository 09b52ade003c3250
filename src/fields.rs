//! Field types: environmental observations, derived requirements, and the
//! canned sample-field source.
//!
//! A `Field` is read-only reference data; many products are scored against
//! one field per invocation. `FieldRequirements` is ephemeral and recomputed
//! from field + management on every call.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Diseases the engine knows about. Corn and soy sets are disjoint; a
/// scoring call only ever evaluates the set for its crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    // Corn
    GrayLeafSpot,
    #[serde(alias = "northern_leaf_blight")]
    NorthernCornLeafBlight,
    TarSpot,
    #[serde(alias = "gosss_wilt")]
    GossWilt,
    // Soybean
    #[serde(alias = "sds")]
    SuddenDeathSyndrome,
    #[serde(alias = "scn")]
    SoybeanCystNematode,
    Phytophthora,
    WhiteMold,
    #[serde(alias = "idc")]
    IronDeficiencyChlorosis,
    FrogeyeLeafSpot,
}

impl Disease {
    pub fn display_name(&self) -> &'static str {
        match self {
            Disease::GrayLeafSpot => "Gray Leaf Spot",
            Disease::NorthernCornLeafBlight => "Northern Corn Leaf Blight",
            Disease::TarSpot => "Tar Spot",
            Disease::GossWilt => "Goss's Wilt",
            Disease::SuddenDeathSyndrome => "SDS",
            Disease::SoybeanCystNematode => "SCN",
            Disease::Phytophthora => "Phytophthora",
            Disease::WhiteMold => "White Mold",
            Disease::IronDeficiencyChlorosis => "IDC",
            Disease::FrogeyeLeafSpot => "Frogeye Leaf Spot",
        }
    }
}

/// SSURGO-style drainage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainageClass {
    #[serde(rename = "Excessively drained")]
    ExcessivelyDrained,
    #[serde(rename = "Well drained")]
    WellDrained,
    #[serde(rename = "Moderately well drained")]
    ModeratelyWellDrained,
    #[serde(rename = "Somewhat poorly drained", alias = "Somewhat Poorly Drained")]
    SomewhatPoorlyDrained,
    #[serde(rename = "Poorly drained", alias = "Poorly Drained")]
    PoorlyDrained,
    #[serde(rename = "Very poorly drained", alias = "Very Poorly Drained")]
    VeryPoorlyDrained,
}

impl DrainageClass {
    /// Somewhat poorly drained or worse. Drives the population policy.
    pub fn is_restricted(&self) -> bool {
        matches!(
            self,
            DrainageClass::SomewhatPoorlyDrained
                | DrainageClass::PoorlyDrained
                | DrainageClass::VeryPoorlyDrained
        )
    }

    /// Poorly drained or worse. Drives SDS/phytophthora risk multipliers.
    pub fn is_poor(&self) -> bool {
        matches!(
            self,
            DrainageClass::PoorlyDrained | DrainageClass::VeryPoorlyDrained
        )
    }
}

/// Soil properties for a field, typically extracted from SSURGO.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoilFeatures {
    pub texture_class: Option<String>,
    pub sand_pct: Option<f64>,
    pub silt_pct: Option<f64>,
    pub clay_pct: Option<f64>,
    pub om_pct: Option<f64>,
    pub ph: Option<f64>,
    pub cec: Option<f64>,
    pub drainage_class: Option<DrainageClass>,
    /// Available water storage 0-100cm, depth units. Drives drought risk.
    pub aws_0_100: Option<f64>,
    /// Available water capacity as a fraction (in/in). Drives population.
    pub awc: Option<f64>,
    pub slope_pct: Option<f64>,
}

/// Climate normals for a field, typically extracted from PRISM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherFeatures {
    /// Mean growing-season GDD accumulation (base 50F).
    pub gdd_mean: Option<f64>,
    pub gdd_std: Option<f64>,
    pub growing_season_precip_mm: Option<f64>,
    pub precip_cv: Option<f64>,
    /// Days >95F in July-August.
    pub heat_stress_days: Option<f64>,
    pub frost_free_days: Option<u32>,
}

/// Combined environmental observations for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFeatures {
    pub soil: SoilFeatures,
    pub weather: WeatherFeatures,
    pub state: String,
    pub county: Option<String>,
}

/// A field to score products against. Boundary geometry and acreage are
/// display-only and never inputs to scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub acres: Option<f64>,
    pub features: FieldFeatures,

    /// Direct per-disease risk knowledge (0-1), e.g. from scouting or a soil
    /// sample. When present it replaces the derived baseline for that
    /// disease.
    #[serde(default)]
    pub disease_overrides: FxHashMap<Disease, f64>,
}

/// Yield environment classification from organic matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldEnvironment {
    Low,
    Medium,
    High,
}

/// Normalized field requirement profile, derived from field + management on
/// every call and discarded afterwards. All risks are on a 0-1 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRequirements {
    /// (min, optimal, max) RM or MG.
    pub target_maturity: (f64, f64, f64),

    // Stress risks
    pub drought_risk: f64,
    pub heat_stress_risk: f64,
    pub emergence_challenge: f64,

    // Corn disease risks
    pub gls_risk: f64,
    pub nclb_risk: f64,
    pub tar_spot_risk: f64,
    pub goss_wilt_risk: f64,

    // Soybean disease risks
    pub sds_risk: f64,
    pub scn_risk: f64,
    pub phytophthora_risk: f64,
    pub white_mold_risk: f64,
    pub idc_risk: f64,
    pub frogeye_risk: f64,

    // Agronomic needs
    pub standability_need: f64,
    pub lodging_risk: f64,
    pub late_harvest_risk: f64,

    pub yield_environment: YieldEnvironment,

    /// Carried through from management for SCN source-rotation scoring.
    pub scn_source_history: Vec<String>,
}

#[cfg(test)]
impl FieldRequirements {
    /// All-quiet profile for unit tests: no material risk anywhere.
    pub(crate) fn neutral() -> Self {
        Self {
            target_maturity: (105.0, 110.0, 115.0),
            drought_risk: 0.0,
            heat_stress_risk: 0.1,
            emergence_challenge: 0.0,
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
            standability_need: 0.0,
            lodging_risk: 0.0,
            late_harvest_risk: 0.0,
            yield_environment: YieldEnvironment::Medium,
            scn_source_history: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sample field source
// ---------------------------------------------------------------------------

/// On-disk sample field, with the flat environment block and 1-9 disease
/// ratings the canned set uses.
#[derive(Deserialize)]
struct SampleField {
    id: String,
    name: String,
    state: String,
    county: Option<String>,
    acres: Option<f64>,
    environment: SampleEnvironment,
    #[serde(default)]
    disease_risk: FxHashMap<Disease, u8>,
}

#[derive(Deserialize)]
struct SampleEnvironment {
    soil_texture: Option<String>,
    drainage_class: Option<DrainageClass>,
    awc: Option<f64>,
    aws_0_100: Option<f64>,
    sand_pct: Option<f64>,
    clay_pct: Option<f64>,
    ph: Option<f64>,
    organic_matter: Option<f64>,
    cec: Option<f64>,
    slope: Option<f64>,
    gdd_normal: Option<f64>,
    /// Growing-season precipitation, inches.
    precip_normal: Option<f64>,
    precip_cv: Option<f64>,
    heat_stress_days: Option<f64>,
}

#[derive(Deserialize)]
struct SampleFieldFile {
    fields: Vec<SampleField>,
}

const MM_PER_INCH: f64 = 25.4;

impl From<SampleField> for Field {
    fn from(s: SampleField) -> Self {
        let env = s.environment;
        let soil = SoilFeatures {
            texture_class: env.soil_texture,
            sand_pct: env.sand_pct,
            silt_pct: None,
            clay_pct: env.clay_pct,
            om_pct: env.organic_matter,
            ph: env.ph,
            cec: env.cec,
            drainage_class: env.drainage_class,
            aws_0_100: env.aws_0_100,
            awc: env.awc,
            slope_pct: env.slope,
        };
        let weather = WeatherFeatures {
            gdd_mean: env.gdd_normal,
            gdd_std: None,
            growing_season_precip_mm: env.precip_normal.map(|inches| inches * MM_PER_INCH),
            precip_cv: env.precip_cv,
            heat_stress_days: env.heat_stress_days,
            frost_free_days: None,
        };

        // 1-9 field ratings become 0-1 risk overrides.
        let disease_overrides = s
            .disease_risk
            .into_iter()
            .map(|(disease, rating)| (disease, f64::from(rating.min(9)) / 9.0))
            .collect();

        Field {
            id: s.id,
            name: s.name,
            acres: s.acres,
            features: FieldFeatures {
                soil,
                weather,
                state: s.state,
                county: s.county,
            },
            disease_overrides,
        }
    }
}

/// Load the canned sample-field set from a `{"fields": [...]}` JSON file.
pub fn load_sample_fields(path: &Path) -> Result<Vec<Field>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sample fields: {:?}", path))?;
    let file: SampleFieldFile =
        serde_json::from_str(&contents).with_context(|| "Failed to parse sample fields JSON")?;
    let fields: Vec<Field> = file.fields.into_iter().map(Field::from).collect();
    info!(fields = fields.len(), "loaded sample fields");
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sample_field_converts_ratings_to_risks() {
        let json = r#"{
            "id": "f1",
            "name": "North 80",
            "state": "IN",
            "county": "Tippecanoe",
            "acres": 80.5,
            "environment": {
                "soil_texture": "Silt loam",
                "drainage_class": "Somewhat Poorly Drained",
                "awc": 0.2,
                "ph": 6.8,
                "organic_matter": 3.5,
                "cec": 18.0,
                "slope": 2.0,
                "gdd_normal": 2850,
                "precip_normal": 38.0,
                "heat_stress_days": 8
            },
            "disease_risk": {
                "gray_leaf_spot": 6,
                "scn": 9
            }
        }"#;

        let sample: SampleField = serde_json::from_str(json).unwrap();
        let field = Field::from(sample);

        assert_eq!(
            field.features.soil.drainage_class,
            Some(DrainageClass::SomewhatPoorlyDrained)
        );
        assert_relative_eq!(
            field.features.weather.growing_season_precip_mm.unwrap(),
            38.0 * 25.4
        );
        assert_relative_eq!(field.disease_overrides[&Disease::GrayLeafSpot], 6.0 / 9.0);
        assert_relative_eq!(field.disease_overrides[&Disease::SoybeanCystNematode], 1.0);
    }

    #[test]
    fn drainage_classes_partition() {
        assert!(DrainageClass::SomewhatPoorlyDrained.is_restricted());
        assert!(!DrainageClass::SomewhatPoorlyDrained.is_poor());
        assert!(DrainageClass::PoorlyDrained.is_poor());
        assert!(!DrainageClass::ModeratelyWellDrained.is_restricted());
    }
}
