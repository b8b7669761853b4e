use crate::pricing::area::display_label_for_area;
use crate::pricing::{QuoteResult, SummaryAdjustment};
use serde::Serialize;
use std::fmt::Write;

pub const EMPTY_SELECTION_MESSAGE: &str = "Selectionnez au moins un diagnostic.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownRow {
    pub label: String,
    /// Formatted amount; explanatory rows carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl BreakdownRow {
    fn priced(label: impl Into<String>, price: f64) -> Self {
        Self {
            label: label.into(),
            price: Some(format!("{price:.2}")),
        }
    }

    fn note(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            price: None,
        }
    }
}

/// Human-readable itemization of a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub pack_label: &'static str,
    pub purpose_label: &'static str,
    pub area: f64,
    pub rows: Vec<BreakdownRow>,
    pub total: String,
    pub empty: bool,
}

impl Breakdown {
    pub fn from_result(result: &QuoteResult) -> Self {
        let summary = &result.pack_summary;
        let mut rows = Vec::new();

        if summary.count > 0 {
            let label = format!(
                "{} · Pack {} diagnostics",
                summary.names.join(", "),
                summary.count
            );
            rows.push(BreakdownRow::priced(label, summary.price));

            if let Some(SummaryAdjustment::Multiplier { factor }) = &summary.adjustment {
                if *factor > 1.0 {
                    rows.push(BreakdownRow::note(format!("Multiplicateur × {factor:.2}")));
                }
            }
            rows.extend(result.notes.iter().map(BreakdownRow::note));
        }

        rows.extend(
            result
                .priced_lines()
                .map(|line| BreakdownRow::priced(line.name.clone(), line.price)),
        );

        Self {
            pack_label: display_label_for_area(result.area),
            purpose_label: result.purpose.label(),
            area: result.area,
            rows,
            total: format!("{:.2}", result.total),
            empty: summary.count == 0 && result.priced_lines().next().is_none(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Plain-text table for terminals.
    pub fn to_text(&self) -> String {
        if self.empty {
            return EMPTY_SELECTION_MESSAGE.to_string();
        }

        let width = self
            .rows
            .iter()
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0)
            .max("Total".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "Pack : {} · Objectif : {} · Surface : {} m²",
            self.pack_label, self.purpose_label, self.area
        );
        for row in &self.rows {
            let price = row.price.as_deref().unwrap_or("");
            let padding = width - row.label.chars().count();
            let _ = writeln!(out, "{}{} {:>10}", row.label, " ".repeat(padding), price);
        }
        let _ = write!(out, "{:<width$} {:>10}", "Total", self.total);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::domain::{Purpose, ScalingMethod, DPE, ERP, GAZ, PLOMB};
    use crate::pricing::{calculate_quote, PriceConfiguration, QuoteRequest};

    fn quote(request: QuoteRequest) -> QuoteResult {
        calculate_quote(&PriceConfiguration::seeded(), &request)
    }

    #[test]
    fn bundle_breakdown_lists_summary_and_surcharges() {
        let result =
            quote(QuoteRequest::new(40.0, Purpose::Sale).with_diagnostics([DPE, PLOMB, ERP]));
        let breakdown = Breakdown::from_result(&result);

        assert_eq!(breakdown.pack_label, "F2");
        assert_eq!(breakdown.purpose_label, "Vente");
        assert_eq!(breakdown.rows[0].label, "DPE, PLOMB · Pack 2 diagnostics");
        assert_eq!(breakdown.rows[0].price.as_deref(), Some("150.00"));
        assert_eq!(breakdown.rows[1].label, "ERP avec nuisances sonores aeriennes");
        assert_eq!(breakdown.rows.len(), 2);
        assert_eq!(breakdown.total, "190.00");
    }

    #[test]
    fn multiplier_row_shown_past_reference() {
        let result = quote(QuoteRequest::new(150.0, Purpose::Rent).with_diagnostics([GAZ]));
        let breakdown = Breakdown::from_result(&result);

        assert!(breakdown
            .rows
            .iter()
            .any(|row| row.label == "Multiplicateur × 1.50" && row.price.is_none()));
    }

    #[test]
    fn alternate_notes_become_rows() {
        let result = quote(
            QuoteRequest::new(120.0, Purpose::Sale)
                .with_diagnostics([DPE])
                .with_scaling(ScalingMethod::Alternate),
        );
        let breakdown = Breakdown::from_result(&result);

        assert!(breakdown
            .rows
            .iter()
            .any(|row| row.label.starts_with("DPE : Difference 50.00 EUR")));
        assert_eq!(breakdown.total, "215.00");
    }

    #[test]
    fn empty_selection_renders_prompt() {
        let result = quote(QuoteRequest::new(55.0, Purpose::Rent));
        let breakdown = Breakdown::from_result(&result);

        assert!(breakdown.is_empty());
        assert_eq!(breakdown.to_text(), EMPTY_SELECTION_MESSAGE);
    }

    #[test]
    fn text_rendering_ends_with_total() {
        let result = quote(QuoteRequest::new(70.0, Purpose::Rent).with_diagnostics([DPE]));
        let text = Breakdown::from_result(&result).to_text();

        assert!(text.starts_with("Pack : F3/F4 · Objectif : Location"));
        assert!(text.trim_end().ends_with("190.00"));
    }
}
