//! Seeding-rate recommendation within a product's labeled range.

use crate::fields::SoilFeatures;
use crate::products::Crop;

/// AWC below this marks droughty ground; both crops back off to the bottom
/// of the range.
const LOW_AWC: f64 = 0.15;
/// Assumed AWC when the soil record has none.
const DEFAULT_AWC: f64 = 0.2;

/// Recommend a seeding rate inside the product's (low, high) range.
///
/// Droughty soils get the low end for both crops. Restricted drainage splits
/// them: corn backs off to the midpoint because wet feet limit its stand,
/// while soybeans push to the high end to compensate for stand loss on wet
/// ground.
pub fn recommend_population(crop: Crop, range: (u32, u32), soil: &SoilFeatures) -> u32 {
    let (low, high) = range;
    let midpoint = (low + high) / 2;

    let awc = soil.awc.unwrap_or(DEFAULT_AWC);
    if awc < LOW_AWC {
        return low;
    }

    let restricted = soil
        .drainage_class
        .is_some_and(|class| class.is_restricted());

    match crop {
        Crop::Corn => {
            if restricted {
                midpoint
            } else {
                high
            }
        }
        Crop::Soybean => {
            if restricted {
                high
            } else {
                midpoint
            }
        }
    }
}
