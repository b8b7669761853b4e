use super::domain::{
    default_catalog, AreaBand, Diagnostic, Purpose, SizePack, AMIANTE, CARREZ_BOUTIN, DPE,
    ELECTRICITE, ERP, GAZ, PLOMB, TERMITES,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Rent and sale price for one (diagnostic, pack) cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackPrice {
    pub rent: f64,
    pub sale: f64,
}

impl PackPrice {
    pub const fn uniform(value: f64) -> Self {
        Self {
            rent: value,
            sale: value,
        }
    }

    pub const fn for_purpose(&self, purpose: Purpose) -> f64 {
        match purpose {
            Purpose::Rent => self.rent,
            Purpose::Sale => self.sale,
        }
    }
}

/// Per-diagnostic, per-pack price grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    rows: BTreeMap<String, BTreeMap<SizePack, PackPrice>>,
}

const SEED_ORDER: [&str; 8] = [
    AMIANTE,
    DPE,
    CARREZ_BOUTIN,
    PLOMB,
    TERMITES,
    GAZ,
    ELECTRICITE,
    ERP,
];

const SEED_BY_PACK: [(SizePack, [f64; 8]); 5] = [
    (SizePack::F1, [100.0, 120.0, 120.0, 130.0, 100.0, 130.0, 130.0, 40.0]),
    (SizePack::F2, [100.0, 120.0, 120.0, 130.0, 100.0, 130.0, 130.0, 40.0]),
    (SizePack::F3, [120.0, 140.0, 140.0, 150.0, 130.0, 130.0, 130.0, 40.0]),
    (SizePack::F4, [120.0, 190.0, 160.0, 170.0, 130.0, 130.0, 130.0, 40.0]),
    (SizePack::F5, [130.0, 190.0, 180.0, 190.0, 160.0, 130.0, 130.0, 40.0]),
];

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default tariff grid, normalized against `catalog`.
    pub fn seeded(catalog: &[Diagnostic]) -> Self {
        let mut table = Self::new();
        for (pack, row) in SEED_BY_PACK {
            for (id, value) in SEED_ORDER.iter().zip(row) {
                table.set(id, pack, PackPrice::uniform(value));
            }
        }
        table.normalized(catalog)
    }

    pub fn set(&mut self, diagnostic_id: &str, pack: SizePack, price: PackPrice) -> &mut Self {
        self.rows
            .entry(diagnostic_id.to_string())
            .or_default()
            .insert(pack, price);
        self
    }

    pub fn entry(&self, diagnostic_id: &str, pack: SizePack) -> Option<PackPrice> {
        self.rows
            .get(diagnostic_id)
            .and_then(|packs| packs.get(&pack))
            .copied()
    }

    /// Price for a cell; absent cells price at 0.
    pub fn price_for(&self, diagnostic_id: &str, pack: SizePack, purpose: Purpose) -> f64 {
        match self.entry(diagnostic_id, pack) {
            Some(price) => price.for_purpose(purpose),
            None => {
                debug!(
                    diagnostic = diagnostic_id,
                    pack = pack.label(),
                    purpose = purpose.code(),
                    "no price configured, pricing at 0"
                );
                0.0
            }
        }
    }

    /// Copy holding exactly one cell per (catalog diagnostic, pack), absent
    /// cells filled with zeros. Rows outside the catalog are dropped.
    pub fn normalized(&self, catalog: &[Diagnostic]) -> Self {
        let rows = catalog
            .iter()
            .map(|diagnostic| {
                let packs = SizePack::ordered()
                    .into_iter()
                    .map(|pack| {
                        let price = self.entry(&diagnostic.id, pack).unwrap_or_default();
                        (pack, price)
                    })
                    .collect();
                (diagnostic.id.clone(), packs)
            })
            .collect();
        Self { rows }
    }

    /// Flattened `(diagnostic, pack, price)` cells in key order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, SizePack, PackPrice)> + '_ {
        self.rows.iter().flat_map(|(id, packs)| {
            packs
                .iter()
                .map(move |(pack, price)| (id.as_str(), *pack, *price))
        })
    }
}

/// Flat prices for multi-diagnostic bundles keyed by band, purpose and count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleTable {
    rows: BTreeMap<AreaBand, BTreeMap<Purpose, BTreeMap<usize, f64>>>,
}

const RENT_COUNTS: [usize; 5] = [2, 3, 4, 5, 6];
const SALE_COUNTS: [usize; 6] = [2, 3, 4, 5, 6, 7];

const BUNDLE_SEED: [(AreaBand, [f64; 5], [f64; 6]); 3] = [
    (
        AreaBand::Band45,
        [150.0, 180.0, 200.0, 250.0, 300.0],
        [150.0, 180.0, 225.0, 275.0, 340.0, 380.0],
    ),
    (
        AreaBand::Band80,
        [180.0, 200.0, 250.0, 300.0, 350.0],
        [180.0, 210.0, 265.0, 310.0, 370.0, 420.0],
    ),
    (
        AreaBand::Band100,
        [200.0, 220.0, 270.0, 320.0, 370.0],
        [200.0, 230.0, 280.0, 330.0, 385.0, 455.0],
    ),
];

impl BundleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let mut table = Self::new();
        for (band, rent, sale) in BUNDLE_SEED {
            for (count, price) in RENT_COUNTS.iter().zip(rent) {
                table.set(band, Purpose::Rent, *count, price);
            }
            for (count, price) in SALE_COUNTS.iter().zip(sale) {
                table.set(band, Purpose::Sale, *count, price);
            }
        }
        table
    }

    pub fn set(&mut self, band: AreaBand, purpose: Purpose, count: usize, price: f64) -> &mut Self {
        self.rows
            .entry(band)
            .or_default()
            .entry(purpose)
            .or_default()
            .insert(count, price);
        self
    }

    /// Bundle price, or `None` when no bundle applies. A zero entry counts as
    /// absent so the caller falls back to per-diagnostic pricing.
    pub fn bundle_price_for(&self, band: AreaBand, purpose: Purpose, count: usize) -> Option<f64> {
        self.rows
            .get(&band)
            .and_then(|purposes| purposes.get(&purpose))
            .and_then(|counts| counts.get(&count))
            .copied()
            .filter(|price| *price > 0.0)
    }
}

/// Read-only pricing configuration threaded through every quote.
///
/// Constructors normalize the price table, so every catalog diagnostic has
/// a cell for every pack. Updates produce a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceConfiguration {
    catalog: Vec<Diagnostic>,
    prices: PriceTable,
    bundles: BundleTable,
}

impl PriceConfiguration {
    pub fn new(catalog: Vec<Diagnostic>, prices: PriceTable, bundles: BundleTable) -> Self {
        let prices = prices.normalized(&catalog);
        Self {
            catalog,
            prices,
            bundles,
        }
    }

    pub fn seeded() -> Self {
        let catalog = default_catalog();
        let prices = PriceTable::seeded(&catalog);
        Self::new(catalog, prices, BundleTable::seeded())
    }

    pub fn with_prices(&self, prices: PriceTable) -> Self {
        Self::new(self.catalog.clone(), prices, self.bundles.clone())
    }

    pub fn catalog(&self) -> &[Diagnostic] {
        &self.catalog
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn bundles(&self) -> &BundleTable {
        &self.bundles
    }

    pub fn price_for(&self, diagnostic_id: &str, pack: SizePack, purpose: Purpose) -> f64 {
        self.prices.price_for(diagnostic_id, pack, purpose)
    }

    pub fn bundle_price_for(&self, band: AreaBand, purpose: Purpose, count: usize) -> Option<f64> {
        self.bundles.bundle_price_for(band, purpose, count)
    }
}

impl Default for PriceConfiguration {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_table_matches_reference_grid() {
        let config = PriceConfiguration::seeded();
        assert_eq!(config.price_for(DPE, SizePack::F5, Purpose::Sale), 190.0);
        assert_eq!(config.price_for(AMIANTE, SizePack::F3, Purpose::Rent), 120.0);
        assert_eq!(config.price_for(ERP, SizePack::F1, Purpose::Sale), 40.0);
        assert_eq!(config.price_for(PLOMB, SizePack::F6Plus, Purpose::Sale), 0.0);
    }

    #[test]
    fn missing_lookups_price_at_zero() {
        let config = PriceConfiguration::seeded();
        assert_eq!(config.price_for("RADON", SizePack::F2, Purpose::Rent), 0.0);
        assert_eq!(PriceTable::new().price_for(DPE, SizePack::F1, Purpose::Sale), 0.0);
    }

    #[test]
    fn normalization_fills_every_pack() {
        let catalog = default_catalog();
        let mut sparse = PriceTable::new();
        sparse.set(DPE, SizePack::F2, PackPrice { rent: 95.0, sale: 110.0 });
        sparse.set("UNKNOWN", SizePack::F1, PackPrice::uniform(12.0));

        let table = sparse.normalized(&catalog);

        assert_eq!(table.cells().count(), catalog.len() * SizePack::ordered().len());
        assert_eq!(table.entry(DPE, SizePack::F2), Some(PackPrice { rent: 95.0, sale: 110.0 }));
        assert_eq!(table.entry(GAZ, SizePack::F4), Some(PackPrice::default()));
        assert_eq!(table.entry("UNKNOWN", SizePack::F1), None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let catalog = default_catalog();
        let mut sparse = PriceTable::new();
        sparse.set(TERMITES, SizePack::F5, PackPrice { rent: 0.0, sale: 175.0 });

        let once = sparse.normalized(&catalog);
        let twice = once.normalized(&catalog);

        assert_eq!(once, twice);
        assert_eq!(PriceTable::seeded(&catalog).normalized(&catalog), PriceTable::seeded(&catalog));
    }

    #[test]
    fn bundle_lookup_reports_absent_counts() {
        let bundles = BundleTable::seeded();
        assert_eq!(bundles.bundle_price_for(AreaBand::Band45, Purpose::Sale, 3), Some(180.0));
        assert_eq!(bundles.bundle_price_for(AreaBand::Band80, Purpose::Rent, 2), Some(180.0));
        assert_eq!(bundles.bundle_price_for(AreaBand::Band100, Purpose::Sale, 7), Some(455.0));
        assert_eq!(bundles.bundle_price_for(AreaBand::Band100, Purpose::Rent, 7), None);
        assert_eq!(bundles.bundle_price_for(AreaBand::Band45, Purpose::Rent, 1), None);
    }

    #[test]
    fn zero_bundle_entry_is_treated_as_absent() {
        let mut bundles = BundleTable::seeded();
        bundles.set(AreaBand::Band45, Purpose::Rent, 2, 0.0);
        assert_eq!(bundles.bundle_price_for(AreaBand::Band45, Purpose::Rent, 2), None);
    }

    #[test]
    fn with_prices_returns_new_normalized_configuration() {
        let config = PriceConfiguration::seeded();
        let mut prices = PriceTable::new();
        prices.set(DPE, SizePack::F1, PackPrice::uniform(99.0));

        let updated = config.with_prices(prices);

        assert_eq!(updated.price_for(DPE, SizePack::F1, Purpose::Rent), 99.0);
        assert_eq!(updated.price_for(AMIANTE, SizePack::F1, Purpose::Rent), 0.0);
        assert_eq!(config.price_for(DPE, SizePack::F1, Purpose::Rent), 120.0);
    }
}
