use super::domain::{Diagnostic, Purpose, TERMITES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Diagnostics a customer has toggled on, before purpose rules apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticSelection {
    selected: BTreeSet<String>,
}

impl DiagnosticSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `id` in or out of the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Ids that can be priced for `purpose`; termites inspections are sale-only.
    pub fn effective_ids(&self, purpose: Purpose) -> BTreeSet<String> {
        self.selected
            .iter()
            .filter(|id| is_selectable(id, purpose))
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for DiagnosticSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn is_selectable(id: &str, purpose: Purpose) -> bool {
    !(purpose == Purpose::Rent && id == TERMITES)
}

/// Catalog entry as offered to the customer for a given purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectableDiagnostic {
    pub id: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

pub fn selectable_diagnostics(
    catalog: &[Diagnostic],
    purpose: Purpose,
    selection: &DiagnosticSelection,
) -> Vec<SelectableDiagnostic> {
    catalog
        .iter()
        .map(|diagnostic| {
            let disabled = !is_selectable(&diagnostic.id, purpose);
            let label = if disabled {
                format!("{} (vente uniquement)", diagnostic.name)
            } else {
                diagnostic.name.clone()
            };
            SelectableDiagnostic {
                id: diagnostic.id.clone(),
                label,
                disabled,
                selected: selection.contains(&diagnostic.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::domain::{default_catalog, AMIANTE, DPE};

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = DiagnosticSelection::new();
        assert!(selection.toggle(DPE));
        assert!(selection.contains(DPE));
        assert!(!selection.toggle(DPE));
        assert!(selection.is_empty());
    }

    #[test]
    fn termites_are_dropped_for_rentals() {
        let selection: DiagnosticSelection = [AMIANTE, TERMITES].into_iter().collect();

        let rent = selection.effective_ids(Purpose::Rent);
        let sale = selection.effective_ids(Purpose::Sale);

        assert_eq!(rent.len(), 1);
        assert!(rent.contains(AMIANTE));
        assert!(sale.contains(TERMITES));
    }

    #[test]
    fn selectable_list_disables_termites_for_rent() {
        let selection: DiagnosticSelection = [DPE].into_iter().collect();
        let entries = selectable_diagnostics(&default_catalog(), Purpose::Rent, &selection);

        let termites = entries
            .iter()
            .find(|entry| entry.id == TERMITES)
            .expect("termites listed");
        assert!(termites.disabled);
        assert_eq!(termites.label, "TERMITES (vente uniquement)");

        let dpe = entries.iter().find(|entry| entry.id == DPE).expect("dpe listed");
        assert!(dpe.selected);
        assert!(!dpe.disabled);
        assert_eq!(entries.len(), 8);
    }
}
