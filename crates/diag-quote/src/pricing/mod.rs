//! Diagnostic pricing: tariff tables, area tiers, scaling past the reference
//! surface and the engine assembling an itemized quote.

pub mod area;
pub mod domain;
pub mod engine;
pub mod quote;
pub mod router;
pub mod scaling;
pub mod selection;
pub mod source;
pub mod tables;

pub use domain::{
    default_catalog, AreaBand, Diagnostic, JobType, PropertyType, Purpose, ScalingMethod, SizePack,
};
pub use engine::{calculate_quote, QuoteEngine};
pub use quote::{
    round2, LineItem, PackSummary, QuoteRequest, QuoteResult, SummaryAdjustment,
};
pub use router::{quote_router, QuotePayload, QuoteResponse};
pub use scaling::{ScaledPrice, ScalingAdjustment};
pub use selection::{selectable_diagnostics, DiagnosticSelection, SelectableDiagnostic};
pub use source::{CsvPriceTable, PriceSource, PriceTableError, SeededPriceSource};
pub use tables::{BundleTable, PackPrice, PriceConfiguration, PriceTable};
