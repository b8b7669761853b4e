use chrono::NaiveDate;
use diag_quote::config::PricingConfig;
use diag_quote::error::AppError;
use diag_quote::pricing::{
    CsvPriceTable, JobType, PriceConfiguration, PriceSource, PropertyType, Purpose, ScalingMethod,
    SeededPriceSource,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Pick the price source: the CSV file when one is configured, the seeded
/// tables otherwise.
pub(crate) fn price_source(price_table: Option<&Path>) -> Box<dyn PriceSource> {
    match price_table {
        Some(path) => Box::new(CsvPriceTable::new(path)),
        None => Box::new(SeededPriceSource),
    }
}

pub(crate) fn load_price_configuration(
    pricing: &PricingConfig,
) -> Result<PriceConfiguration, AppError> {
    let source = price_source(pricing.price_table.as_deref());
    let config = source.load()?;

    match &pricing.price_table {
        Some(path) => info!(path = %path.display(), "price table loaded from csv"),
        None => info!("using seeded price table"),
    }

    Ok(config)
}

pub(crate) fn parse_purpose(raw: &str) -> Result<Purpose, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "rent" | "location" => Ok(Purpose::Rent),
        "sale" | "vente" => Ok(Purpose::Sale),
        other => Err(format!("unknown purpose '{other}' (expected rent or sale)")),
    }
}

pub(crate) fn parse_job_type(raw: &str) -> Result<JobType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "normal" => Ok(JobType::Normal),
        "parking" => Ok(JobType::Parking),
        "cave" => Ok(JobType::Cave),
        other => Err(format!(
            "unknown job type '{other}' (expected normal, parking or cave)"
        )),
    }
}

pub(crate) fn parse_property_type(raw: &str) -> Result<PropertyType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "apartment" | "appartement" => Ok(PropertyType::Apartment),
        "house" | "maison" => Ok(PropertyType::House),
        other => Err(format!(
            "unknown property type '{other}' (expected apartment or house)"
        )),
    }
}

pub(crate) fn parse_scaling(raw: &str) -> Result<ScalingMethod, String> {
    ScalingMethod::parse(raw)
        .ok_or_else(|| format!("unknown scaling method '{raw}' (expected multiplier or alternate)"))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsers_accept_french_aliases() {
        assert_eq!(parse_purpose("Vente"), Ok(Purpose::Sale));
        assert_eq!(parse_property_type("maison"), Ok(PropertyType::House));
        assert_eq!(parse_job_type(" cave "), Ok(JobType::Cave));
        assert_eq!(parse_scaling("stepped"), Ok(ScalingMethod::Alternate));
        assert!(parse_purpose("lease").is_err());
    }

    #[test]
    fn seeded_source_when_no_table_configured() {
        let pricing = PricingConfig {
            scaling_method: ScalingMethod::Multiplier,
            price_table: None,
        };
        let config = load_price_configuration(&pricing).expect("seeded config");
        assert_eq!(config, PriceConfiguration::seeded());
    }

    #[test]
    fn missing_csv_table_is_reported() {
        let pricing = PricingConfig {
            scaling_method: ScalingMethod::Multiplier,
            price_table: Some("/nonexistent/diag-quote/prices.csv".into()),
        };
        assert!(matches!(
            load_price_configuration(&pricing),
            Err(AppError::PriceTable(_))
        ));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("18/10/2026").is_err());
        assert_eq!(
            parse_date("2026-10-18"),
            Ok(NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date"))
        );
    }
}
