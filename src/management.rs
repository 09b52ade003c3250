//! Management practice inputs.
//!
//! Management is supplied fresh on every scoring call and may be overridden
//! per field by the caller. The engine treats it as a pure input and never
//! caches it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tillage {
    NoTill,
    StripTill,
    #[serde(alias = "reduced")]
    MinimumTill,
    Conventional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Irrigation {
    None,
    Pivot,
    Drip,
    Flood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviousCrop {
    Corn,
    #[serde(alias = "soybean")]
    Soybeans,
    Wheat,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FungicidePlan {
    None,
    AsNeeded,
    Routine,
}

/// Grower management practices for one field and one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Management {
    pub previous_crop: PreviousCrop,
    pub tillage: Tillage,

    /// Herbicide program tags ("Roundup", "Liberty", "Dicamba", "Enlist").
    /// Tags with a required seed trait drive the hard filter.
    #[serde(default)]
    pub herbicide_program: Vec<String>,
    #[serde(default = "FungicidePlan::default")]
    pub fungicide: FungicidePlan,

    /// Row spacing in inches. Narrow rows raise white mold risk.
    #[serde(default = "default_row_spacing")]
    pub row_spacing_in: u8,
    #[serde(default = "Irrigation::default")]
    pub irrigation: Irrigation,

    /// Years of corn / soy in the last five.
    pub corn_frequency_5yr: Option<u8>,
    pub soy_frequency_5yr: Option<u8>,

    /// SCN resistance sources planted in prior seasons, most recent last.
    #[serde(default)]
    pub scn_source_history: Vec<String>,
}

fn default_row_spacing() -> u8 {
    30
}

impl Default for FungicidePlan {
    fn default() -> Self {
        FungicidePlan::AsNeeded
    }
}

impl Default for Irrigation {
    fn default() -> Self {
        Irrigation::None
    }
}

impl Default for Management {
    fn default() -> Self {
        Self {
            previous_crop: PreviousCrop::Soybeans,
            tillage: Tillage::MinimumTill,
            herbicide_program: Vec::new(),
            fungicide: FungicidePlan::AsNeeded,
            row_spacing_in: 30,
            irrigation: Irrigation::None,
            corn_frequency_5yr: None,
            soy_frequency_5yr: None,
            scn_source_history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tillage_accepts_reduced_alias() {
        let t: Tillage = serde_json::from_str("\"reduced\"").unwrap();
        assert_eq!(t, Tillage::MinimumTill);
        let t: Tillage = serde_json::from_str("\"no-till\"").unwrap();
        assert_eq!(t, Tillage::NoTill);
    }

    #[test]
    fn management_defaults_fill_missing_fields() {
        let m: Management = serde_json::from_str(
            r#"{"previous_crop": "soybeans", "tillage": "conventional"}"#,
        )
        .unwrap();
        assert_eq!(m.row_spacing_in, 30);
        assert_eq!(m.irrigation, Irrigation::None);
        assert!(m.scn_source_history.is_empty());
    }
}
