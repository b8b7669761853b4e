//! Consumers of a finished quote: the itemized breakdown shown to the
//! customer and the cell writes for the quote spreadsheet template.

mod breakdown;
pub mod document;

pub use breakdown::{Breakdown, BreakdownRow, EMPTY_SELECTION_MESSAGE};
pub use document::{
    designation_for, format_property_label, property_kind, CellValue, CellWrite, Civility,
    DocumentFill, InvoiceDetails, InvoiceValidationError,
};
