//! Where price configurations come from and where edits go.

use super::domain::{default_catalog, Diagnostic, SizePack};
use super::tables::{BundleTable, PackPrice, PriceConfiguration, PriceTable};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PriceTableError {
    #[error("failed to access price table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid price table data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown size pack '{0}' in price table")]
    UnknownPack(String),
}

/// Load/save pair for price configurations. The engine never calls this.
pub trait PriceSource: Send + Sync {
    fn load(&self) -> Result<PriceConfiguration, PriceTableError>;
    fn save(&self, config: &PriceConfiguration) -> Result<(), PriceTableError>;
}

/// Built-in tariff; saving is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededPriceSource;

impl PriceSource for SeededPriceSource {
    fn load(&self) -> Result<PriceConfiguration, PriceTableError> {
        Ok(PriceConfiguration::seeded())
    }

    fn save(&self, _config: &PriceConfiguration) -> Result<(), PriceTableError> {
        Ok(())
    }
}

/// Price grid stored as CSV rows of `diagnostic,pack,rent,sale`.
///
/// Bundle prices are not part of the file and always come from the seeded
/// bundle table.
#[derive(Debug, Clone)]
pub struct CsvPriceTable {
    path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct PriceRow {
    diagnostic: String,
    pack: String,
    rent: Option<f64>,
    sale: Option<f64>,
}

impl CsvPriceTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> PriceTableError {
        PriceTableError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PriceSource for CsvPriceTable {
    fn load(&self) -> Result<PriceConfiguration, PriceTableError> {
        let file = std::fs::File::open(&self.path).map_err(|err| self.io_error(err))?;
        let catalog = default_catalog();
        let prices = read_price_table(file, &catalog)?;
        debug!(path = %self.path.display(), "price table loaded");
        Ok(PriceConfiguration::new(catalog, prices, BundleTable::seeded()))
    }

    fn save(&self, config: &PriceConfiguration) -> Result<(), PriceTableError> {
        let file = std::fs::File::create(&self.path).map_err(|err| self.io_error(err))?;
        write_price_table(file, config.prices())?;
        debug!(path = %self.path.display(), "price table saved");
        Ok(())
    }
}

/// Parse CSV rows into a table normalized against `catalog`.
pub fn read_price_table<R: Read>(
    reader: R,
    catalog: &[Diagnostic],
) -> Result<PriceTable, PriceTableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut table = PriceTable::new();

    for record in csv_reader.deserialize::<PriceRow>() {
        let row = record?;
        let pack =
            SizePack::from_label(&row.pack).ok_or_else(|| PriceTableError::UnknownPack(row.pack))?;
        table.set(
            &row.diagnostic,
            pack,
            PackPrice {
                rent: row.rent.unwrap_or(0.0),
                sale: row.sale.unwrap_or(0.0),
            },
        );
    }

    Ok(table.normalized(catalog))
}

pub fn write_price_table<W: Write>(writer: W, table: &PriceTable) -> Result<(), PriceTableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (diagnostic, pack, price) in table.cells() {
        csv_writer.serialize(PriceRow {
            diagnostic: diagnostic.to_string(),
            pack: pack.label().to_string(),
            rent: Some(price.rent),
            sale: Some(price.sale),
        })?;
    }
    csv_writer
        .flush()
        .map_err(|err| PriceTableError::Csv(err.into()))?;
    Ok(())
}
