//! Rank the sample product catalog against the canned sample fields.
//!
//! Usage: rank_field [corn|soybean] [data-dir]

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gemx_engine::{
    load_corn_catalog, load_sample_fields, load_soybean_catalog, Catalog, Crop, Management,
    ReasonProvider, RecommendationEngine, ReferenceData, TemplateReasons,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let crop = match args.next().as_deref() {
        None | Some("corn") => Crop::Corn,
        Some("soybean") | Some("soybeans") => Crop::Soybean,
        Some(other) => bail!("unknown crop {other:?}, expected corn or soybean"),
    };
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".to_string()));

    let catalog = Catalog {
        corn: load_corn_catalog(&data_dir.join("corn_hybrids.json"))?,
        soybeans: load_soybean_catalog(&data_dir.join("soybean_varieties.json"))?,
    };
    let fields = load_sample_fields(&data_dir.join("sample_fields.json"))?;
    let reference = ReferenceData::load_or_default(Some(&data_dir.join("disease_baselines.json")))
        .context("loading disease baselines")?;

    let engine = RecommendationEngine::new(catalog, reference);
    let reasons = TemplateReasons;
    let management = Management::default();

    for field in &fields {
        let set = engine.rank_parallel(field, &management, crop);
        info!(
            field = %set.field_name,
            evaluated = set.products_evaluated,
            filtered = set.products_filtered,
            top = format!("{:.1}", set.top_score),
            "ranked"
        );

        println!("\n{} ({} {})", set.field_name, set.field_id, crop);
        for (rank, rec) in set.top(5).enumerate() {
            println!(
                "  {}. {:<24} {:>5.1}  pop {:>7}  {}",
                rank + 1,
                rec.display_name(),
                rec.result.composite,
                rec.result.population.unwrap_or(0),
                reasons.reason_for(rec)
            );
        }
    }

    Ok(())
}
