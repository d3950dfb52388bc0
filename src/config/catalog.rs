//! Option catalog for the form's selector fields.
//!
//! The lists are informational: they are offered to the user, but a value
//! outside them is still accepted and stored.

use crate::core::fields::OptionList;
use serde::Deserialize;

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Selectable values, one list per [`OptionList`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Exporting agencies
    pub agencies: Vec<String>,
    /// Shipping weeks
    pub weeks: Vec<String>,
    /// Shipping lines
    pub carriers: Vec<String>,
    /// Empty-container depots
    pub depots: Vec<String>,
    /// Port terminals
    pub terminals: Vec<String>,
    /// Box models
    pub box_types: Vec<String>,
    /// Containerised or loose
    pub shipment_types: Vec<String>,
    /// Incoterms
    pub negotiations: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            agencies: owned(&["HugoFruit", "Fresh-Up"]),
            weeks: owned(&["2026-09", "2026-10", "2026-11", "2026-12"]),
            carriers: owned(&[
                "Happag LLoyd",
                "Maersk",
                "Cosco",
                "MSC",
                "Baltic",
                "ONE",
                "Seatrade",
                "Hamburg Süd",
            ]),
            depots: owned(&[
                "Aretina",
                "Blasti",
                "Depconsa",
                "Farbem Norte",
                "Farbem Sur",
                "Medlog Norte",
                "Medlog Sur",
                "Opacif Norte",
                "Opacif Sur",
                "PRCS",
                "RFS",
                "Tasesa",
                "Tercon",
            ]),
            terminals: owned(&["DP World", "TPG", "Contecon", "Naportec", "Yilport", "Fertisa"]),
            box_types: owned(&["208", "209", "22XU", "SF101", "Extrapesada"]),
            shipment_types: owned(&["Carga Contenerizada", "Carga Suelta"]),
            negotiations: owned(&["FOB", "CFR", "CIF"]),
        }
    }
}

impl Catalog {
    /// The values offered for `list`.
    #[must_use]
    pub fn options(&self, list: OptionList) -> &[String] {
        match list {
            OptionList::Agencies => &self.agencies,
            OptionList::Weeks => &self.weeks,
            OptionList::Carriers => &self.carriers,
            OptionList::Depots => &self.depots,
            OptionList::Terminals => &self.terminals,
            OptionList::BoxTypes => &self.box_types,
            OptionList::ShipmentTypes => &self.shipment_types,
            OptionList::Negotiations => &self.negotiations,
        }
    }
}
