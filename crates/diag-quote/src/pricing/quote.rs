use super::domain::{JobType, PropertyType, Purpose, ScalingMethod, SizePack};
use super::scaling::ScalingAdjustment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Round to the cent, half up.
pub fn round2(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Inputs for one quote. Built fresh from the selection on every trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub area: f64,
    pub purpose: Purpose,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub selected_diagnostic_ids: BTreeSet<String>,
    #[serde(default)]
    pub agent_exempt: bool,
    #[serde(default)]
    pub studette_override: bool,
    #[serde(default)]
    pub scaling_method: ScalingMethod,
}

impl QuoteRequest {
    /// Request for a normal apartment job; negative areas are clamped to 0.
    pub fn new(area: f64, purpose: Purpose) -> Self {
        Self {
            area: area.max(0.0),
            purpose,
            job_type: JobType::Normal,
            property_type: PropertyType::Apartment,
            selected_diagnostic_ids: BTreeSet::new(),
            agent_exempt: false,
            studette_override: false,
            scaling_method: ScalingMethod::Multiplier,
        }
    }

    pub fn with_diagnostics<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_diagnostic_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_job_type(mut self, job_type: JobType) -> Self {
        self.job_type = job_type;
        self
    }

    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_scaling(mut self, method: ScalingMethod) -> Self {
        self.scaling_method = method;
        self
    }

    pub fn agent_exempt(mut self, exempt: bool) -> Self {
        self.agent_exempt = exempt;
        self
    }

    pub fn studette(mut self, studette: bool) -> Self {
        self.studette_override = studette;
        self
    }
}

/// One displayed row of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub pack: SizePack,
    pub purpose: Purpose,
    pub base_price: f64,
    pub factor: f64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<ScalingAdjustment>,
}

impl LineItem {
    pub(crate) fn flat(
        name: impl Into<String>,
        pack: SizePack,
        purpose: Purpose,
        price: f64,
    ) -> Self {
        Self {
            name: name.into(),
            pack,
            purpose,
            base_price: price,
            factor: 1.0,
            price,
            adjustment: None,
        }
    }

    /// Bundle member listed for display; the bundle carries the price.
    pub(crate) fn bundled(name: impl Into<String>, pack: SizePack, purpose: Purpose) -> Self {
        Self::flat(name, pack, purpose, 0.0)
    }
}

/// Scaling applied to the diagnostics subtotal as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SummaryAdjustment {
    Multiplier { factor: f64 },
    Alternate { notes: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSummary {
    pub names: Vec<String>,
    pub count: usize,
    pub price: f64,
    pub bundle_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<SummaryAdjustment>,
}

impl PackSummary {
    pub fn includes(&self, name: &str) -> bool {
        self.names.iter().any(|entry| entry.eq_ignore_ascii_case(name))
    }
}

/// Itemized quote. Produced synchronously and never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub area: f64,
    pub pack: SizePack,
    pub purpose: Purpose,
    pub scaling_factor: f64,
    pub line_items: Vec<LineItem>,
    pub total: f64,
    pub pack_summary: PackSummary,
    pub erp_selected: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl QuoteResult {
    pub fn priced_lines(&self) -> impl Iterator<Item = &LineItem> + '_ {
        self.line_items.iter().filter(|line| line.price > 0.0)
    }

    pub fn line(&self, name: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|line| line.name == name)
    }
}
