use serde::{Deserialize, Serialize};

pub const AMIANTE: &str = "AMIANTE";
pub const DPE: &str = "DPE";
pub const CARREZ_BOUTIN: &str = "CARREZ_BOUTIN";
pub const PLOMB: &str = "PLOMB";
pub const TERMITES: &str = "TERMITES";
pub const GAZ: &str = "GAZ";
pub const ELECTRICITE: &str = "ELECTRICITE";
/// Risk-exposure report. Always billed as a flat add-on.
pub const ERP: &str = "ERP";

/// Catalog entry for a diagnostic service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: String,
    pub name: String,
}

impl Diagnostic {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn is_erp(&self) -> bool {
        self.id == ERP
    }
}

/// The eight diagnostics offered out of the box, in display order.
pub fn default_catalog() -> Vec<Diagnostic> {
    vec![
        Diagnostic::new(AMIANTE, "AMIANTE"),
        Diagnostic::new(DPE, "DPE"),
        Diagnostic::new(CARREZ_BOUTIN, "CARREZ/BOUTIN"),
        Diagnostic::new(PLOMB, "PLOMB"),
        Diagnostic::new(TERMITES, "TERMITES"),
        Diagnostic::new(GAZ, "GAZ"),
        Diagnostic::new(ELECTRICITE, "ELECTRICITE"),
        Diagnostic::new(ERP, "ERP"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Rent,
    Sale,
}

impl Purpose {
    pub const fn ordered() -> [Self; 2] {
        [Self::Rent, Self::Sale]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Rent => "Location",
            Self::Sale => "Vente",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Sale => "sale",
        }
    }

    /// Ceiling applied to the diagnostics subtotal of small surfaces.
    pub const fn small_surface_cap(self) -> f64 {
        match self {
            Self::Rent => 250.0,
            Self::Sale => 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Normal,
    Parking,
    Cave,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
}

/// How prices are extended past the 100 m² reference surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    #[default]
    Multiplier,
    Alternate,
}

impl ScalingMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "multiplier" | "factor" => Some(Self::Multiplier),
            "alternate" | "stepped" => Some(Self::Alternate),
            _ => None,
        }
    }
}

/// Floor-area tier selecting a price-table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizePack {
    F1,
    F2,
    F3,
    F4,
    F5,
    #[serde(rename = "F6+")]
    F6Plus,
}

impl SizePack {
    pub const fn ordered() -> [Self; 6] {
        [Self::F1, Self::F2, Self::F3, Self::F4, Self::F5, Self::F6Plus]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::F6Plus => "F6+",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|pack| pack.label().eq_ignore_ascii_case(value))
    }

    /// Upper area bound of the tier in m². The overflow tier has none.
    pub const fn area_bound(self) -> Option<f64> {
        match self {
            Self::F1 => Some(30.0),
            Self::F2 => Some(45.0),
            Self::F3 => Some(60.0),
            Self::F4 => Some(80.0),
            Self::F5 => Some(100.0),
            Self::F6Plus => None,
        }
    }
}

/// Coarse area grouping used for bundle lookups only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AreaBand {
    #[serde(rename = "band_45")]
    Band45,
    #[serde(rename = "band_80")]
    Band80,
    #[serde(rename = "band_100")]
    Band100,
}

impl AreaBand {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Band45 => "band_45",
            Self::Band80 => "band_80",
            Self::Band100 => "band_100",
        }
    }

    pub const fn area_bound(self) -> f64 {
        match self {
            Self::Band45 => 45.0,
            Self::Band80 => 80.0,
            Self::Band100 => 100.0,
        }
    }
}
