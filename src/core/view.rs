//! View state for the desk: which module is showing, which form tab is open,
//! and how records are projected into table rows.

use crate::core::fields::FormTab;
use crate::entities::shipment;
use std::fmt;
use std::str::FromStr;

/// Modules listed in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Module {
    /// Shipments: the only implemented module
    #[default]
    Embarques,
    /// Production scheduling
    Programacion,
    /// Logistics
    Logistica,
    /// Quotas
    Cupos,
}

impl Module {
    /// Sidebar order.
    pub const ALL: [Self; 4] = [Self::Embarques, Self::Programacion, Self::Logistica, Self::Cupos];

    /// Identifier used to select the module.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Embarques => "embarques",
            Self::Programacion => "programacion",
            Self::Logistica => "logistica",
            Self::Cupos => "cupos",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Embarques => "Embarques",
            Self::Programacion => "Programación",
            Self::Logistica => "Logística",
            Self::Cupos => "Cupos",
        }
    }

    /// Sidebar icon.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Embarques => "🚢",
            Self::Programacion => "🍌",
            Self::Logistica => "🚛",
            Self::Cupos => "📊",
        }
    }

    /// Whether the module has a working screen.
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        matches!(self, Self::Embarques)
    }

    /// Text shown in place of an unimplemented module.
    #[must_use]
    pub const fn placeholder(self) -> Option<&'static str> {
        match self {
            Self::Embarques => None,
            Self::Programacion => Some("Módulo de Operaciones en desarrollo..."),
            Self::Logistica => Some("Módulo de Logística en desarrollo..."),
            Self::Cupos => Some("Módulo de Cupos en desarrollo..."),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

impl FromStr for Module {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| format!("unknown module '{wanted}'"))
    }
}

/// Layout state that does not touch the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Module currently shown
    pub active_module: Module,
    /// Form tab currently shown
    pub active_tab: FormTab,
    /// Form body hidden
    pub form_collapsed: bool,
    /// Sidebar expanded with labels
    pub sidebar_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_module: Module::Embarques,
            active_tab: FormTab::Comex,
            form_collapsed: false,
            sidebar_open: true,
        }
    }
}

impl ViewState {
    /// Shows `module`. Unimplemented modules render their placeholder.
    pub fn select_module(&mut self, module: Module) {
        self.active_module = module;
    }

    /// Shows `tab`; form values are unaffected.
    pub fn select_tab(&mut self, tab: FormTab) {
        self.active_tab = tab;
    }

    /// Collapses or expands the form body.
    pub fn toggle_form(&mut self) {
        self.form_collapsed = !self.form_collapsed;
    }

    /// Collapses the sidebar to icons, or expands it.
    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Opening a record for edit always shows the form.
    pub fn reveal_form(&mut self) {
        self.form_collapsed = false;
    }
}

/// One line of the records table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRow {
    /// Record id, used by edit and delete
    pub id: i64,
    /// Shipping week
    pub week: String,
    /// Booking number
    pub booking: String,
    /// Vessel name and voyage, space separated
    pub vessel_voyage: String,
    /// Client
    pub client: String,
    /// Boxes in containers plus loose boxes
    pub total_boxes: f64,
    /// Stored FOB value
    pub fob: f64,
}

impl From<&shipment::Model> for ShipmentRow {
    fn from(record: &shipment::Model) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let vessel_voyage = format!("{} {}", text(&record.vessel), text(&record.voyager))
            .trim()
            .to_string();

        Self {
            id: record.id_embarque,
            week: text(&record.semana),
            booking: text(&record.booking),
            vessel_voyage,
            client: text(&record.cliente),
            total_boxes: record.cajas_totales_cont + record.cajas_totales_granel,
            fob: record.fob,
        }
    }
}
