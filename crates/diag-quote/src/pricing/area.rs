use super::domain::{AreaBand, SizePack};

/// Surface (m²) of the reference row; anything larger is scaled.
pub const REFERENCE_AREA: f64 = 100.0;

pub fn pack_for_area(area: f64) -> SizePack {
    if area < 30.0 {
        SizePack::F1
    } else if area < 45.0 {
        SizePack::F2
    } else if area < 60.0 {
        SizePack::F3
    } else if area < 80.0 {
        SizePack::F4
    } else if area <= REFERENCE_AREA {
        SizePack::F5
    } else {
        SizePack::F6Plus
    }
}

/// Row of the price table used for pricing. Past the reference surface the
/// F5 row is the base that scaling starts from.
pub fn pricing_pack(area: f64) -> SizePack {
    match pack_for_area(area) {
        SizePack::F6Plus => SizePack::F5,
        pack => pack,
    }
}

/// Customer-facing label. F3 and F4 share a label; pricing is unaffected.
pub fn display_label_for_area(area: f64) -> &'static str {
    match pack_for_area(area) {
        SizePack::F4 => "F3/F4",
        pack => pack.label(),
    }
}

pub fn band_for_area(area: f64) -> AreaBand {
    if area <= 45.0 {
        AreaBand::Band45
    } else if area <= 80.0 {
        AreaBand::Band80
    } else {
        AreaBand::Band100
    }
}

/// Linear multiplier relative to the reference surface, never below 1.
pub fn scaling_factor(area: f64) -> f64 {
    if area <= REFERENCE_AREA {
        1.0
    } else {
        area / REFERENCE_AREA
    }
}
