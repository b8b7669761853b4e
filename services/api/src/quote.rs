use crate::infra::{load_price_configuration, price_source};
use clap::Args;
use diag_quote::config::AppConfig;
use diag_quote::error::AppError;
use diag_quote::presentation::Breakdown;
use diag_quote::pricing::source::write_price_table;
use diag_quote::pricing::{
    JobType, PropertyType, Purpose, QuoteEngine, QuotePayload, QuoteRequest, QuoteResponse,
    ScalingMethod,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Living area in m²
    #[arg(long)]
    pub(crate) area: f64,
    /// Transaction purpose (rent or sale)
    #[arg(long, value_parser = crate::infra::parse_purpose)]
    pub(crate) purpose: Purpose,
    /// Diagnostic id to include; repeat for several (AMIANTE, DPE, ...)
    #[arg(long = "diagnostic", short = 'd')]
    pub(crate) diagnostics: Vec<String>,
    /// Job type (normal, parking or cave)
    #[arg(long, value_parser = crate::infra::parse_job_type, default_value = "normal")]
    pub(crate) job_type: JobType,
    /// Property type (apartment or house)
    #[arg(long, value_parser = crate::infra::parse_property_type, default_value = "apartment")]
    pub(crate) property_type: PropertyType,
    /// Offer the ERP report (real-estate agent exemption)
    #[arg(long)]
    pub(crate) agent_exempt: bool,
    /// Apply the small-surface cap regardless of the area
    #[arg(long)]
    pub(crate) studette: bool,
    /// Scaling method past 100 m² (defaults to the configured one)
    #[arg(long, value_parser = crate::infra::parse_scaling)]
    pub(crate) scaling: Option<ScalingMethod>,
    /// CSV price table to price against
    #[arg(long)]
    pub(crate) price_table: Option<PathBuf>,
    /// Print the full quote as JSON instead of the text breakdown
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PricesArgs {
    /// CSV price table to read instead of the configured one
    #[arg(long)]
    pub(crate) price_table: Option<PathBuf>,
    /// Write the normalized table to this CSV file instead of stdout
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

impl QuoteArgs {
    pub(crate) fn to_request(&self, default_scaling: ScalingMethod) -> QuoteRequest {
        QuotePayload {
            area: self.area,
            purpose: self.purpose,
            job_type: self.job_type,
            property_type: self.property_type,
            selected_diagnostic_ids: self
                .diagnostics
                .iter()
                .map(|id| id.trim().to_ascii_uppercase())
                .collect(),
            agent_exempt: self.agent_exempt,
            studette_override: self.studette,
            scaling_method: self.scaling,
        }
        .into_request(default_scaling)
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.price_table.clone() {
        config.pricing.price_table = Some(path);
    }

    let prices = load_price_configuration(&config.pricing)?;
    let engine = QuoteEngine::new(Arc::new(prices))
        .with_default_scaling(config.pricing.scaling_method);
    let request = args.to_request(engine.default_scaling());
    let result = engine.quote(&request);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &QuoteResponse::new(result))
            .map_err(std::io::Error::from)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", Breakdown::from_result(&result).to_text())?;
    }
    Ok(())
}

pub(crate) fn run_price_export(args: PricesArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.price_table {
        config.pricing.price_table = Some(path);
    }

    let prices = load_price_configuration(&config.pricing)?;

    match args.export {
        Some(path) => {
            price_source(Some(path.as_path())).save(&prices)?;
            println!("price table written to {}", path.display());
        }
        None => write_price_table(std::io::stdout().lock(), prices.prices())?,
    }
    Ok(())
}
