//! Plain-text rendering of the desk for the console.

use crate::config::Catalog;
use crate::core::derivation::Derived;
use crate::core::fields::{FieldKind, FieldSpec, FormTab};
use crate::core::form::{EditTarget, FieldValue, ShipmentForm};
use crate::core::view::{Module, ShipmentRow, ViewState};
use std::fmt::Write;

/// Whole numbers without decimals, everything else with two.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n:.2}")
    }
}

/// The four quick totals shown above the form.
#[must_use]
pub fn summary_strip(derived: &Derived) -> String {
    format!(
        "Total Cajas: {} | Peso Neto (Kg): {} | Peso Bruto (Kg): {} | Valor FOB Est.: ${}",
        format_number(derived.grand_total_boxes),
        format_number(derived.net_weight_total),
        format_number(derived.gross_weight_total),
        format_number(derived.fob_total),
    )
}

/// Shown while a save is still waiting on the store.
pub const PROCESSING_LABEL: &str = "PROCESANDO...";

/// Label of the submit control.
#[must_use]
pub const fn submit_label(target: EditTarget) -> &'static str {
    match target {
        EditTarget::Idle => "GUARDAR NUEVO EMBARQUE",
        EditTarget::Editing(_) => "ACTUALIZAR REGISTRO",
    }
}

/// Tab buttons with the active one bracketed, plus the collapse toggle.
#[must_use]
pub fn tab_bar(view: &ViewState) -> String {
    let tabs: Vec<String> = FormTab::ALL
        .into_iter()
        .map(|tab| {
            if tab == view.active_tab {
                format!("[{tab}]")
            } else {
                format!(" {tab} ")
            }
        })
        .collect();
    let toggle = if view.form_collapsed { "Ampliar Formulario" } else { "Contraer" };
    format!("{}   ({toggle})", tabs.join(" "))
}

fn derived_value(name: &str, derived: &Derived) -> Option<f64> {
    match name {
        "cajas_totales_cont" => Some(derived.boxes_in_containers),
        "cajas_totales_pallet" => Some(derived.boxes_on_pallets),
        "pneto_total" => Some(derived.net_weight_total),
        "pbruto_total" => Some(derived.gross_weight_total),
        _ => None,
    }
}

fn render_value(spec: &FieldSpec, form: &ShipmentForm, derived: &Derived) -> String {
    if let Some(value) = derived_value(spec.name, derived) {
        return format_number(value);
    }
    match form.get(spec.name) {
        Some(FieldValue::Number(n)) => format_number(*n),
        Some(FieldValue::Text(s)) if s.is_empty() && spec.options.is_some() => {
            "Seleccione...".to_string()
        }
        Some(FieldValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}

/// Fields of `tab` with their current values. Derived fields show the
/// recomputed total and are marked `(auto)`.
#[must_use]
pub fn form_fields(tab: FormTab, form: &ShipmentForm, derived: &Derived) -> String {
    let mut out = String::new();
    for spec in tab.fields() {
        let marker = if spec.derived { " (auto)" } else { "" };
        let kind = match spec.kind {
            FieldKind::Number => "#",
            FieldKind::Text => " ",
        };
        let _ = writeln!(
            out,
            "  {kind} {:<30} {:<28} {}{marker}",
            spec.label,
            spec.name,
            render_value(spec, form, derived)
        );
    }
    out
}

/// Options offered for a selector field, one per line.
#[must_use]
pub fn field_options(spec: &FieldSpec, catalog: &Catalog) -> String {
    spec.options.map_or_else(
        || format!("'{}' is free input; any value is accepted.", spec.name),
        |list| {
            let mut out = format!("Options for {}:\n", spec.label);
            for option in catalog.options(list) {
                let _ = writeln!(out, "  - {option}");
            }
            out
        },
    )
}

/// The records table, newest first.
#[must_use]
pub fn records_table(rows: &[ShipmentRow]) -> String {
    let mut out = String::from("Registros Recientes\n");
    let _ = writeln!(
        out,
        "{:>6}  {:<8}  {:<30}  {:<20}  {:>12}  {:>14}",
        "ID", "Semana", "Booking / Nave", "Cliente", "Cajas Totales", "FOB Est."
    );
    if rows.is_empty() {
        out.push_str("  (sin registros)\n");
        return out;
    }
    for row in rows {
        let booking = if row.vessel_voyage.is_empty() {
            row.booking.clone()
        } else {
            format!("{} / {}", row.booking, row.vessel_voyage)
        };
        let _ = writeln!(
            out,
            "{:>6}  {:<8}  {:<30}  {:<20}  {:>12}  {:>14}",
            row.id,
            row.week,
            booking,
            row.client,
            format_number(row.total_boxes),
            format!("${}", format_number(row.fob)),
        );
    }
    out
}

/// Sidebar entries. Collapsed, only icons are shown.
#[must_use]
pub fn sidebar(view: &ViewState, live: bool) -> String {
    let mut out = String::new();
    if view.sidebar_open {
        out.push_str("HF SYSTEM\n");
    }
    for module in Module::ALL {
        let active = if module == view.active_module { ">" } else { " " };
        if view.sidebar_open {
            let soon = if module.is_implemented() { "" } else { " (próximamente)" };
            let _ = writeln!(
                out,
                "{active} {} {:<14} [{}]{soon}",
                module.icon(),
                module.label(),
                module.id()
            );
        } else {
            let _ = writeln!(out, "{active} {}", module.icon());
        }
    }
    if view.sidebar_open {
        let status = if live { "Sistema Online" } else { "Sin conexión en tiempo real" };
        let _ = writeln!(out, "● {status}");
    }
    out
}
