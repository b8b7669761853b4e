use super::area::{band_for_area, pack_for_area, pricing_pack, scaling_factor, REFERENCE_AREA};
use super::domain::{
    Diagnostic, JobType, PropertyType, Purpose, ScalingMethod, SizePack, AMIANTE, ERP, TERMITES,
};
use super::quote::{round2, LineItem, PackSummary, QuoteRequest, QuoteResult, SummaryAdjustment};
use super::scaling::{bundle_reference, diagnostic_reference, scale_price, ScalingAdjustment};
use super::tables::PriceConfiguration;
use std::sync::Arc;
use tracing::debug;

/// Flat price of the parking and cellar-only jobs.
pub const FLAT_JOB_PRICE: f64 = 170.0;
pub const HOUSE_SURCHARGE: f64 = 50.0;
/// Surfaces below this many m² get the small-surface cap.
pub const SMALL_SURFACE_AREA: f64 = 20.0;

pub const HOUSE_SURCHARGE_LABEL: &str = "Majoration maison / pavillon";
pub const ERP_LABEL: &str = "ERP avec nuisances sonores aeriennes";
pub const ERP_EXEMPT_LABEL: &str = "ERP (mandataire - offert)";
const PARKING_LABEL: &str = "Parking (amiante + termites)";
const CAVE_LABEL: &str = "Cave uniquement";

/// Stateless engine pricing requests against one configuration.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    config: Arc<PriceConfiguration>,
    default_scaling: ScalingMethod,
}

impl QuoteEngine {
    pub fn new(config: Arc<PriceConfiguration>) -> Self {
        Self {
            config,
            default_scaling: ScalingMethod::default(),
        }
    }

    pub fn with_default_scaling(mut self, method: ScalingMethod) -> Self {
        self.default_scaling = method;
        self
    }

    pub fn config(&self) -> &PriceConfiguration {
        &self.config
    }

    pub fn default_scaling(&self) -> ScalingMethod {
        self.default_scaling
    }

    pub fn quote(&self, request: &QuoteRequest) -> QuoteResult {
        calculate_quote(&self.config, request)
    }
}

/// Price `request` against `config`. Never fails: missing prices count as 0.
pub fn calculate_quote(config: &PriceConfiguration, request: &QuoteRequest) -> QuoteResult {
    let selection = Selection::resolve(config, request);

    let result = match request.job_type {
        JobType::Parking => flat_job_quote(config, request, &selection, FlatJob::parking()),
        JobType::Cave => flat_job_quote(config, request, &selection, FlatJob::cave()),
        JobType::Normal => normal_quote(config, request, &selection),
    };

    debug!(
        area = result.area,
        pack = result.pack.label(),
        purpose = result.purpose.code(),
        diagnostics = result.pack_summary.count,
        bundle = result.pack_summary.bundle_used,
        total = result.total,
        "quote computed"
    );

    result
}

/// Selected catalog entries, in catalog order, split around ERP.
struct Selection<'a> {
    erp_selected: bool,
    diagnostics: Vec<&'a Diagnostic>,
}

impl<'a> Selection<'a> {
    fn resolve(config: &'a PriceConfiguration, request: &QuoteRequest) -> Self {
        let selected: Vec<&Diagnostic> = config
            .catalog()
            .iter()
            .filter(|diagnostic| request.selected_diagnostic_ids.contains(&diagnostic.id))
            .filter(|diagnostic| !(request.purpose == Purpose::Rent && diagnostic.id == TERMITES))
            .collect();

        let erp_selected = selected.iter().any(|diagnostic| diagnostic.is_erp());
        let diagnostics = selected
            .into_iter()
            .filter(|diagnostic| !diagnostic.is_erp())
            .collect();

        Self {
            erp_selected,
            diagnostics,
        }
    }

    fn names(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.name.clone())
            .collect()
    }
}

struct FlatJob {
    label: &'static str,
    names: &'static [&'static str],
    forced_purpose: Option<Purpose>,
    bundle: bool,
}

impl FlatJob {
    fn parking() -> Self {
        Self {
            label: PARKING_LABEL,
            names: &[AMIANTE, TERMITES],
            forced_purpose: None,
            bundle: true,
        }
    }

    fn cave() -> Self {
        Self {
            label: CAVE_LABEL,
            names: &["CAVE"],
            forced_purpose: Some(Purpose::Sale),
            bundle: false,
        }
    }
}

fn flat_job_quote(
    config: &PriceConfiguration,
    request: &QuoteRequest,
    selection: &Selection<'_>,
    job: FlatJob,
) -> QuoteResult {
    let area = request.area;
    let pack = pack_for_area(area);
    let purpose = job.forced_purpose.unwrap_or(request.purpose);

    let mut line_items = vec![LineItem::flat(job.label, pack, purpose, FLAT_JOB_PRICE)];
    let mut total = FLAT_JOB_PRICE;

    if selection.erp_selected {
        let erp = erp_line(config, pricing_pack(area), purpose, request.agent_exempt);
        total += erp.price;
        line_items.push(erp);
    }

    QuoteResult {
        area,
        pack,
        purpose,
        scaling_factor: 1.0,
        line_items,
        total: round2(total),
        pack_summary: PackSummary {
            names: job.names.iter().map(|name| name.to_string()).collect(),
            count: job.names.len(),
            price: FLAT_JOB_PRICE,
            bundle_used: job.bundle,
            bundle_base: None,
            adjustment: None,
        },
        erp_selected: selection.erp_selected,
        notes: Vec::new(),
    }
}

/// Diagnostics subtotal before caps and surcharges.
struct Subtotal {
    price: f64,
    bundle_base: Option<f64>,
    adjustment: Option<SummaryAdjustment>,
}

fn normal_quote(
    config: &PriceConfiguration,
    request: &QuoteRequest,
    selection: &Selection<'_>,
) -> QuoteResult {
    let area = request.area;
    let purpose = request.purpose;
    let pack = pack_for_area(area);
    let factor = scaling_factor(area);
    let count = selection.diagnostics.len();

    let mut line_items = Vec::new();
    let mut notes = Vec::new();

    let bundle_price = if count >= 2 {
        config.bundle_price_for(band_for_area(area), purpose, count)
    } else {
        None
    };

    let mut subtotal = match bundle_price {
        Some(bundle_price) => {
            line_items.extend(
                selection
                    .diagnostics
                    .iter()
                    .map(|diagnostic| LineItem::bundled(diagnostic.name.clone(), pack, purpose)),
            );
            bundle_subtotal(config, request, count, bundle_price, &mut notes)
        }
        None => individual_subtotal(config, request, selection, &mut line_items, &mut notes),
    };

    if request.studette_override || area < SMALL_SURFACE_AREA {
        let cap = purpose.small_surface_cap();
        if subtotal.price > cap {
            debug!(subtotal = subtotal.price, cap, "small-surface cap applied");
            subtotal.price = cap;
        }
    }

    let mut surcharges = 0.0;
    if request.property_type == PropertyType::House {
        surcharges += HOUSE_SURCHARGE;
        line_items.push(LineItem::flat(
            HOUSE_SURCHARGE_LABEL,
            pack,
            purpose,
            HOUSE_SURCHARGE,
        ));
    }

    if selection.erp_selected {
        let erp = erp_line(config, pricing_pack(area), purpose, request.agent_exempt);
        surcharges += erp.price;
        line_items.push(erp);
    }

    QuoteResult {
        area,
        pack,
        purpose,
        scaling_factor: factor,
        line_items,
        total: round2(subtotal.price + surcharges),
        pack_summary: PackSummary {
            names: selection.names(),
            count,
            price: subtotal.price,
            bundle_used: bundle_price.is_some(),
            bundle_base: subtotal.bundle_base,
            adjustment: subtotal.adjustment,
        },
        erp_selected: selection.erp_selected,
        notes,
    }
}

fn bundle_subtotal(
    config: &PriceConfiguration,
    request: &QuoteRequest,
    count: usize,
    bundle_price: f64,
    notes: &mut Vec<String>,
) -> Subtotal {
    let area = request.area;
    let reference = if area > REFERENCE_AREA && request.scaling_method == ScalingMethod::Alternate
    {
        bundle_reference(config.bundles(), count, request.purpose)
    } else {
        None
    };

    let label = format!("Pack {count} diagnostics");
    let scaled = scale_price(area, request.scaling_method, bundle_price, reference, &label);
    notes.extend(scaled.note);

    let adjustment = scaled.adjustment.map(|adjustment| match adjustment {
        ScalingAdjustment::Multiplier { factor } => SummaryAdjustment::Multiplier { factor },
        ScalingAdjustment::Alternate { .. } => SummaryAdjustment::Alternate {
            notes: notes.clone(),
        },
    });

    Subtotal {
        price: scaled.price,
        bundle_base: Some(bundle_price),
        adjustment,
    }
}

fn individual_subtotal(
    config: &PriceConfiguration,
    request: &QuoteRequest,
    selection: &Selection<'_>,
    line_items: &mut Vec<LineItem>,
    notes: &mut Vec<String>,
) -> Subtotal {
    let area = request.area;
    let purpose = request.purpose;
    let price_pack = pricing_pack(area);
    let factor = scaling_factor(area);
    let scaled_area = area > REFERENCE_AREA;

    let mut sum = 0.0;
    let mut used_alternate = false;

    for diagnostic in &selection.diagnostics {
        let base_price = config.price_for(&diagnostic.id, price_pack, purpose);
        let reference = if scaled_area && request.scaling_method == ScalingMethod::Alternate {
            diagnostic_reference(config.prices(), &diagnostic.id, purpose)
        } else {
            None
        };

        let scaled = scale_price(
            area,
            request.scaling_method,
            base_price,
            reference,
            &diagnostic.name,
        );
        used_alternate |= scaled.method == ScalingMethod::Alternate;
        notes.extend(scaled.note);
        sum += scaled.price;

        line_items.push(LineItem {
            name: diagnostic.name.clone(),
            pack: price_pack,
            purpose,
            base_price,
            factor,
            price: scaled.price,
            adjustment: scaled.adjustment,
        });
    }

    let adjustment = if !scaled_area {
        None
    } else if used_alternate {
        Some(SummaryAdjustment::Alternate {
            notes: notes.clone(),
        })
    } else {
        Some(SummaryAdjustment::Multiplier { factor })
    };

    Subtotal {
        price: round2(sum),
        bundle_base: None,
        adjustment,
    }
}

/// Flat risk-exposure line; never scaled with the surface.
fn erp_line(
    config: &PriceConfiguration,
    pack: SizePack,
    purpose: Purpose,
    agent_exempt: bool,
) -> LineItem {
    let base_price = config.price_for(ERP, pack, purpose);
    let (name, price) = if agent_exempt {
        (ERP_EXEMPT_LABEL, 0.0)
    } else {
        (ERP_LABEL, round2(base_price))
    };

    LineItem {
        name: name.to_string(),
        pack,
        purpose,
        base_price,
        factor: 1.0,
        price,
        adjustment: None,
    }
}
