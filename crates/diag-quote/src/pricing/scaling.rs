//! Extending base prices past the 100 m² reference surface.
//!
//! The multiplier method scales linearly with the surface. The alternate
//! method adds the price difference between the reference row and a cheaper
//! lower row once per "step" of extra surface, where a step is the width
//! between those two rows. When no usable pair of rows exists the alternate
//! method falls back to the multiplier and says so in a note.

use super::area::{scaling_factor, REFERENCE_AREA};
use super::domain::{AreaBand, Purpose, ScalingMethod, SizePack};
use super::quote::round2;
use super::tables::{BundleTable, PriceTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference row and the cheaper row the alternate method steps from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePair {
    pub diff_price: f64,
    pub step_area: f64,
}

impl ReferencePair {
    fn from_rows(base_price: f64, lower_price: f64, lower_bound: f64) -> Option<Self> {
        let diff_price = base_price - lower_price;
        let step_area = REFERENCE_AREA - lower_bound;
        (lower_price > 0.0 && diff_price > 0.0 && step_area > 0.0).then_some(Self {
            diff_price,
            step_area,
        })
    }
}

/// Pair for one diagnostic: F5 against the first cheaper row among F4..F1.
pub fn diagnostic_reference(
    prices: &PriceTable,
    diagnostic_id: &str,
    purpose: Purpose,
) -> Option<ReferencePair> {
    let base_price = prices.entry(diagnostic_id, SizePack::F5)?.for_purpose(purpose);
    if base_price <= 0.0 {
        return None;
    }

    [SizePack::F4, SizePack::F3, SizePack::F2, SizePack::F1]
        .into_iter()
        .find_map(|pack| {
            let lower_price = prices.entry(diagnostic_id, pack)?.for_purpose(purpose);
            ReferencePair::from_rows(base_price, lower_price, pack.area_bound()?)
        })
}

/// Pair for a bundle of `count` diagnostics: band_100 against band_80, then band_45.
pub fn bundle_reference(
    bundles: &BundleTable,
    count: usize,
    purpose: Purpose,
) -> Option<ReferencePair> {
    let base_price = bundles.bundle_price_for(AreaBand::Band100, purpose, count)?;

    [AreaBand::Band80, AreaBand::Band45]
        .into_iter()
        .find_map(|band| {
            let lower_price = bundles.bundle_price_for(band, purpose, count)?;
            ReferencePair::from_rows(base_price, lower_price, band.area_bound())
        })
}

/// How a scaled price was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalingAdjustment {
    Multiplier {
        factor: f64,
    },
    Alternate {
        diff_price: f64,
        step_area: f64,
        steps: f64,
        extra_area: f64,
    },
}

/// Outcome of scaling one base price.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledPrice {
    pub method: ScalingMethod,
    pub price: f64,
    pub adjustment: Option<ScalingAdjustment>,
    pub note: Option<String>,
}

impl ScaledPrice {
    fn unscaled(base_price: f64) -> Self {
        Self {
            method: ScalingMethod::Multiplier,
            price: round2(base_price),
            adjustment: None,
            note: None,
        }
    }
}

/// Scale `base_price` for `area`. `label` names the priced item in notes.
pub fn scale_price(
    area: f64,
    method: ScalingMethod,
    base_price: f64,
    reference: Option<ReferencePair>,
    label: &str,
) -> ScaledPrice {
    let extra_area = area - REFERENCE_AREA;
    if extra_area <= 0.0 {
        return ScaledPrice::unscaled(base_price);
    }

    if method == ScalingMethod::Alternate {
        if let Some(pair) = reference {
            let steps = extra_area / pair.step_area;
            let price = round2(base_price + pair.diff_price * steps);
            let note = format!(
                "{label} : Difference {:.2} EUR × {:.2} (({:.2} m²) / {:.2} m²)",
                pair.diff_price, steps, extra_area, pair.step_area
            );
            return ScaledPrice {
                method: ScalingMethod::Alternate,
                price,
                adjustment: Some(ScalingAdjustment::Alternate {
                    diff_price: pair.diff_price,
                    step_area: pair.step_area,
                    steps,
                    extra_area,
                }),
                note: Some(note),
            };
        }
        debug!(item = label, area, "alternate scaling unavailable, using multiplier");
    }

    let factor = scaling_factor(area);
    let note = (method == ScalingMethod::Alternate)
        .then(|| format!("{label} : Methode alternative indisponible - retour au multiplicateur"));

    ScaledPrice {
        method: ScalingMethod::Multiplier,
        price: round2(base_price * factor),
        adjustment: Some(ScalingAdjustment::Multiplier { factor }),
        note,
    }
}
