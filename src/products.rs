//! Product catalog types for corn hybrids and soybean varieties.
//!
//! Catalog records are immutable reference data loaded once per session.
//! All 1-9 trait ratings are optional: absence means "not rated" and scoring
//! resolves it to a neutral default, never to zero.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Crop identity, carrying the crop-specific capability set: component
/// weights, maturity conventions, and population policy all hang off this
/// tag instead of being branched throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Corn,
    Soybean,
}

/// Composite score weights for the five components. Each crop's set sums
/// to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct ComponentWeights {
    pub maturity: f64,
    pub yield_potential: f64,
    pub stress: f64,
    pub disease: f64,
    pub agronomic: f64,
}

impl Crop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Corn => "corn",
            Crop::Soybean => "soybean",
        }
    }

    /// Composite weights. Soy shifts weight from agronomics to disease
    /// (SCN and SDS dominate variety placement decisions).
    pub fn weights(&self) -> ComponentWeights {
        match self {
            Crop::Corn => ComponentWeights {
                maturity: 0.15,
                yield_potential: 0.20,
                stress: 0.20,
                disease: 0.25,
                agronomic: 0.20,
            },
            Crop::Soybean => ComponentWeights {
                maturity: 0.15,
                yield_potential: 0.20,
                stress: 0.20,
                disease: 0.30,
                agronomic: 0.15,
            },
        }
    }

    /// GDD held back from the site mean before maturity selection, so a
    /// late fall still finishes the crop.
    pub fn gdd_safety_margin(&self) -> f64 {
        match self {
            Crop::Corn => 100.0,
            Crop::Soybean => 150.0,
        }
    }

    /// Window spread around the optimal maturity: (short side, long side).
    /// Corn in RM days, soy in MG units. Asymmetric: going shorter than
    /// optimal is safer than going longer.
    pub fn maturity_spread(&self) -> (f64, f64) {
        match self {
            Crop::Corn => (3.0, 2.0),
            Crop::Soybean => (0.5, 0.3),
        }
    }

    /// Fallback (min, optimal, max) window when no GDD data is available.
    pub fn default_maturity_window(&self) -> (f64, f64, f64) {
        match self {
            Crop::Corn => (105.0, 110.0, 115.0),
            Crop::Soybean => (2.5, 3.0, 3.5),
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corn hybrid catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CornHybrid {
    pub brand: String,
    pub name: String,

    /// Relative maturity in days.
    pub relative_maturity: f64,
    /// Yield potential, 1-9. The one rating every catalog entry carries.
    pub yield_potential: u8,
    pub test_weight: Option<u8>,
    pub drydown: Option<u8>,

    // Standability
    pub stalk_strength: Option<u8>,
    pub root_strength: Option<u8>,

    // Stress tolerance
    pub drought_tolerance: Option<u8>,
    pub heat_tolerance: Option<u8>,
    pub emergence_vigor: Option<u8>,

    // Disease ratings
    pub gray_leaf_spot: Option<u8>,
    pub northern_leaf_blight: Option<u8>,
    pub tar_spot: Option<u8>,
    pub goss_wilt: Option<u8>,
    pub anthracnose_stalk: Option<u8>,

    #[serde(default)]
    pub bt_traits: Vec<String>,
    #[serde(default)]
    pub herbicide_traits: Vec<String>,

    /// (low, high) seeds per acre.
    pub population_range: (u32, u32),

    pub year_introduced: Option<u16>,
    pub notes: Option<String>,
}

/// Soybean variety catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoybeanVariety {
    pub brand: String,
    pub name: String,

    /// Maturity group on the continuous 0.0-6.0 scale.
    pub maturity_group: f64,
    pub yield_potential: u8,
    pub lodging_resistance: Option<u8>,

    // Stress tolerance
    pub drought_tolerance: Option<u8>,
    pub emergence_vigor: Option<u8>,
    pub idc_tolerance: Option<u8>,

    // Disease ratings
    pub sds: Option<u8>,
    pub phytophthora_field: Option<u8>,
    pub white_mold: Option<u8>,
    pub frogeye_leaf_spot: Option<u8>,
    pub brown_stem_rot: Option<u8>,

    /// SCN genetic resistance source ("PI 88788", "Peking", ...).
    pub scn_source: Option<String>,
    /// Rps genes stacked in this variety.
    #[serde(default)]
    pub phytophthora_genes: Vec<String>,

    #[serde(default)]
    pub herbicide_traits: Vec<String>,

    /// (low, high) seeds per acre.
    pub population_range: (u32, u32),

    pub year_introduced: Option<u16>,
    pub notes: Option<String>,
}

/// Full product catalog for one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub corn: Vec<CornHybrid>,
    pub soybeans: Vec<SoybeanVariety>,
}

impl Catalog {
    pub fn product_count(&self, crop: Crop) -> usize {
        match crop {
            Crop::Corn => self.corn.len(),
            Crop::Soybean => self.soybeans.len(),
        }
    }
}

#[derive(Deserialize)]
struct CornCatalogFile {
    hybrids: Vec<CornHybrid>,
}

#[derive(Deserialize)]
struct SoybeanCatalogFile {
    varieties: Vec<SoybeanVariety>,
}

/// Load corn hybrids from a `{"hybrids": [...]}` JSON file.
pub fn load_corn_catalog(path: &Path) -> Result<Vec<CornHybrid>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corn catalog: {:?}", path))?;
    let file: CornCatalogFile =
        serde_json::from_str(&contents).with_context(|| "Failed to parse corn catalog JSON")?;
    info!(hybrids = file.hybrids.len(), "loaded corn catalog");
    Ok(file.hybrids)
}

/// Load soybean varieties from a `{"varieties": [...]}` JSON file.
pub fn load_soybean_catalog(path: &Path) -> Result<Vec<SoybeanVariety>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read soybean catalog: {:?}", path))?;
    let file: SoybeanCatalogFile =
        serde_json::from_str(&contents).with_context(|| "Failed to parse soybean catalog JSON")?;
    info!(varieties = file.varieties.len(), "loaded soybean catalog");
    Ok(file.varieties)
}
