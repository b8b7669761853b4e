//! Customer details and the cell writes that turn a quote into a filled-in
//! quote template. Producing the spreadsheet file itself is left to the caller.

use crate::pricing::area::display_label_for_area;
use crate::pricing::domain::{JobType, PropertyType, AMIANTE};
use crate::pricing::engine::ERP_LABEL;
use crate::pricing::{QuoteRequest, QuoteResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Civility {
    #[default]
    #[serde(rename = "M.")]
    Monsieur,
    #[serde(rename = "Mme")]
    Madame,
    #[serde(rename = "couple")]
    Couple,
    #[serde(rename = "company")]
    Company,
}

impl Civility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monsieur => "M.",
            Self::Madame => "Mme",
            Self::Couple => "M. et Mme",
            Self::Company => "",
        }
    }
}

/// Invoice fields collected alongside the quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDetails {
    pub civility: Civility,
    pub company: String,
    pub first_name: String,
    pub last_name: String,
    pub no_first_name: bool,
    pub street_number: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub designation: String,
    pub description: String,
    pub property_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceValidationError {
    #[error("company name is required")]
    MissingCompany,
    #[error("last name is required")]
    MissingLastName,
    #[error("first and last name are required")]
    MissingFullName,
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl InvoiceDetails {
    pub fn validate(&self) -> Result<(), InvoiceValidationError> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();

        match self.civility {
            Civility::Company if self.company.trim().is_empty() => {
                return Err(InvoiceValidationError::MissingCompany)
            }
            Civility::Company => {}
            Civility::Couple if last.is_empty() => {
                return Err(InvoiceValidationError::MissingLastName)
            }
            _ if self.no_first_name && last.is_empty() => {
                return Err(InvoiceValidationError::MissingLastName)
            }
            _ if !self.no_first_name
                && self.civility != Civility::Couple
                && (first.is_empty() || last.is_empty()) =>
            {
                return Err(InvoiceValidationError::MissingFullName)
            }
            _ => {}
        }

        let required = [
            ("street number", &self.street_number),
            ("street", &self.street),
            ("postal code", &self.postal_code),
            ("city", &self.city),
            ("designation", &self.designation),
            ("description", &self.description),
            ("property type", &self.property_type),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(InvoiceValidationError::MissingField(*field)),
            None => Ok(()),
        }
    }

    /// Name as printed on the quote: surname upper-cased, given name capitalized.
    pub fn full_name(&self) -> String {
        let last = self.last_name.trim().to_uppercase();
        let first = capitalize(self.first_name.trim());

        match self.civility {
            Civility::Company => self.company.trim().to_uppercase(),
            Civility::Couple => format!("{} {last}", Civility::Couple.label()),
            civility if first.is_empty() => format!("{} {last}", civility.label())
                .trim()
                .to_string(),
            civility => format!("{} {last} {first}", civility.label())
                .trim()
                .to_string(),
        }
    }

    /// Fill a blank designation and property type from the quote being billed.
    pub fn with_quote_suggestions(mut self, request: &QuoteRequest, result: &QuoteResult) -> Self {
        if self.designation.trim().is_empty() {
            self.designation = designation_for(result);
        }
        if self.property_type.trim().is_empty() {
            self.property_type =
                property_kind(request.job_type, request.property_type, result.area);
        }
        self
    }

    pub fn street_line(&self) -> String {
        format!("{}, {}", self.street_number.trim(), self.street.trim())
    }

    pub fn city_line(&self) -> String {
        format!("{} {}", self.postal_code.trim(), self.city.trim())
    }

    fn file_stem(&self) -> String {
        let stem = match self.civility {
            Civility::Company => self.company.trim().to_string(),
            _ => self.last_name.trim().to_uppercase(),
        };
        if stem.is_empty() {
            "CLIENT".to_string()
        } else {
            stem
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// Suggested designation: the diagnostics pack, then the ERP report.
pub fn designation_for(result: &QuoteResult) -> String {
    let summary = &result.pack_summary;
    let mut parts = Vec::new();
    if summary.count > 0 {
        parts.push(format!("1 Pack {}", summary.names.join(", ")));
    }
    if result.erp_selected {
        parts.push(ERP_LABEL.to_string());
    }
    parts.join(" · ")
}

/// Property type code for the invoice, e.g. `APPARTEMENT F3/F4`.
pub fn property_kind(job_type: JobType, property_type: PropertyType, area: f64) -> String {
    match (job_type, property_type) {
        (JobType::Cave, _) => "CAVE".to_string(),
        (JobType::Parking, _) => "PARKING".to_string(),
        (JobType::Normal, PropertyType::House) => "MAISON".to_string(),
        (JobType::Normal, PropertyType::Apartment) => {
            format!("APPARTEMENT {}", display_label_for_area(area))
        }
    }
}

/// `APPARTEMENT f2` -> `Appartement F2`.
pub fn format_property_label(value: &str) -> String {
    value
        .split_whitespace()
        .enumerate()
        .map(|(idx, part)| {
            if idx == 0 {
                capitalize(part)
            } else {
                part.to_uppercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellWrite {
    pub cell: &'static str,
    pub value: CellValue,
}

/// Everything needed to fill the quote template for one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentFill {
    pub cells: Vec<CellWrite>,
    /// Template cell holding the asbestos clause, blanked unless AMIANTE is quoted.
    pub asbestos_clause_cell: &'static str,
    pub keep_asbestos_clause: bool,
    pub file_name: String,
}

const ASBESTOS_CLAUSE_CELL: &str = "B30";

impl DocumentFill {
    pub fn build(
        result: &QuoteResult,
        invoice: &InvoiceDetails,
        today: NaiveDate,
    ) -> Result<Self, InvoiceValidationError> {
        invoice.validate()?;

        let property_type = invoice.property_type.trim();
        let property_type = if property_type == "APPARTEMENT" {
            format!("APPARTEMENT {}", display_label_for_area(result.area))
        } else {
            property_type.to_string()
        };

        let text = |cell: &'static str, value: String| CellWrite {
            cell,
            value: CellValue::Text(value),
        };

        let cells = vec![
            text("B12", today.format("%d/%m/%Y").to_string()),
            text("B9", today.format("%d%m/%Y").to_string()),
            text("D8", invoice.full_name()),
            text("D9", invoice.street_line()),
            text("D10", invoice.city_line()),
            CellWrite {
                cell: "E39",
                value: CellValue::Number(result.total),
            },
            text("B21", invoice.designation.trim().to_string()),
            text("B26", invoice.street_line()),
            text("B27", invoice.city_line()),
            text("A21", format_property_label(&property_type)),
        ];

        Ok(Self {
            cells,
            asbestos_clause_cell: ASBESTOS_CLAUSE_CELL,
            keep_asbestos_clause: result.pack_summary.includes(AMIANTE),
            file_name: format!("DEVIS_{}.xlsx", invoice.file_stem()),
        })
    }

    pub fn cell(&self, address: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|write| write.cell == address)
            .map(|write| &write.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::domain::{Purpose, DPE, ERP};
    use crate::pricing::{calculate_quote, PriceConfiguration, QuoteRequest};

    fn invoice() -> InvoiceDetails {
        InvoiceDetails {
            civility: Civility::Madame,
            first_name: "jeanne".to_string(),
            last_name: "Martin".to_string(),
            street_number: "12".to_string(),
            street: "rue des Lilas".to_string(),
            postal_code: "75011".to_string(),
            city: "Paris".to_string(),
            designation: "1 Pack AMIANTE, DPE".to_string(),
            description: "Appartement F2".to_string(),
            property_type: "APPARTEMENT".to_string(),
            ..InvoiceDetails::default()
        }
    }

    fn quote(request: QuoteRequest) -> QuoteResult {
        calculate_quote(&PriceConfiguration::seeded(), &request)
    }

    #[test]
    fn full_name_variants() {
        let mut details = invoice();
        assert_eq!(details.full_name(), "Mme MARTIN Jeanne");

        details.first_name.clear();
        assert_eq!(details.full_name(), "Mme MARTIN");

        details.civility = Civility::Couple;
        assert_eq!(details.full_name(), "M. et Mme MARTIN");

        details.civility = Civility::Company;
        details.company = "Agence du Parc".to_string();
        assert_eq!(details.full_name(), "AGENCE DU PARC");
    }

    #[test]
    fn validation_requires_names_per_civility() {
        let mut details = invoice();
        assert_eq!(details.validate(), Ok(()));

        details.first_name.clear();
        assert_eq!(details.validate(), Err(InvoiceValidationError::MissingFullName));

        details.no_first_name = true;
        assert_eq!(details.validate(), Ok(()));

        details.civility = Civility::Company;
        assert_eq!(details.validate(), Err(InvoiceValidationError::MissingCompany));
    }

    #[test]
    fn validation_requires_address_fields() {
        let mut details = invoice();
        details.city = "  ".to_string();
        assert_eq!(details.validate(), Err(InvoiceValidationError::MissingField("city")));
    }

    #[test]
    fn designation_joins_pack_and_erp() {
        let result = quote(
            QuoteRequest::new(40.0, Purpose::Sale).with_diagnostics([AMIANTE, DPE, ERP]),
        );
        assert_eq!(
            designation_for(&result),
            "1 Pack AMIANTE, DPE · ERP avec nuisances sonores aeriennes"
        );
    }

    #[test]
    fn property_kind_codes() {
        assert_eq!(
            property_kind(JobType::Normal, PropertyType::Apartment, 65.0),
            "APPARTEMENT F3/F4"
        );
        assert_eq!(property_kind(JobType::Normal, PropertyType::House, 65.0), "MAISON");
        assert_eq!(property_kind(JobType::Parking, PropertyType::House, 10.0), "PARKING");
        assert_eq!(format_property_label("APPARTEMENT f3/f4"), "Appartement F3/F4");
    }

    #[test]
    fn document_fill_writes_expected_cells() {
        let result =
            quote(QuoteRequest::new(40.0, Purpose::Sale).with_diagnostics([AMIANTE, DPE]));
        let today = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");

        let fill = DocumentFill::build(&result, &invoice(), today).expect("invoice valid");
        let text = |value: &str| Some(CellValue::Text(value.to_string()));

        assert_eq!(fill.cell("B12").cloned(), text("07/03/2025"));
        assert_eq!(fill.cell("B9").cloned(), text("0703/2025"));
        assert_eq!(fill.cell("D9").cloned(), text("12, rue des Lilas"));
        assert_eq!(fill.cell("E39"), Some(&CellValue::Number(150.0)));
        assert_eq!(fill.cell("A21").cloned(), text("Appartement F2"));
        assert_eq!(fill.asbestos_clause_cell, "B30");
        assert!(fill.keep_asbestos_clause);
        assert_eq!(fill.file_name, "DEVIS_MARTIN.xlsx");
    }

    #[test]
    fn blank_designation_and_type_come_from_the_quote() {
        let request = QuoteRequest::new(65.0, Purpose::Sale).with_diagnostics([DPE, ERP]);
        let result = quote(request.clone());
        let details = InvoiceDetails {
            designation: " ".to_string(),
            property_type: String::new(),
            ..invoice()
        }
        .with_quote_suggestions(&request, &result);

        assert_eq!(details.designation, "1 Pack DPE · ERP avec nuisances sonores aeriennes");
        assert_eq!(details.property_type, "APPARTEMENT F3/F4");
        assert_eq!(details.validate(), Ok(()));

        let typed = invoice().with_quote_suggestions(&request, &result);
        assert_eq!(typed.designation, "1 Pack AMIANTE, DPE");
        assert_eq!(typed.property_type, "APPARTEMENT");
    }

    #[test]
    fn document_fill_rejects_invalid_invoice() {
        let result = quote(QuoteRequest::new(40.0, Purpose::Sale).with_diagnostics([DPE]));
        let today = NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date");
        let mut details = invoice();
        details.street.clear();

        assert_eq!(
            DocumentFill::build(&result, &details, today),
            Err(InvoiceValidationError::MissingField("street"))
        );
    }
}
