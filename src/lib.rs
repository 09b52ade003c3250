//! GEMx seed placement engine.
//!
//! Scores corn hybrids and soybean varieties against per-field environmental
//! and management profiles. Two stages: the requirements deriver turns raw
//! field observations into a normalized 0-1 risk profile plus a target
//! maturity window, and the scoring engine matches product trait packages
//! against that profile into a ranked, explained 0-100 recommendation list.
//!
//! All scoring is pure and deterministic; parallel ranking over a catalog
//! produces output identical to the serial path.

pub mod engine;
pub mod explanation;
pub mod fields;
pub mod management;
pub mod products;
pub mod reference;
pub mod requirements;
pub mod results;
pub mod scoring;

pub use engine::RecommendationEngine;
pub use explanation::{CuratedReasons, ReasonProvider, TemplateReasons};
pub use fields::{load_sample_fields, Disease, DrainageClass, Field, FieldRequirements};
pub use management::{Irrigation, Management, PreviousCrop, Tillage};
pub use products::{load_corn_catalog, load_soybean_catalog, Catalog, CornHybrid, Crop, SoybeanVariety};
pub use reference::ReferenceData;
pub use requirements::derive_field_requirements;
pub use results::{Recommendation, RecommendationSet, ScoreResult};
