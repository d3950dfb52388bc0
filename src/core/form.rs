//! Form state for composing or editing one shipment.
//!
//! The [`FormController`] owns the working field values and the edit target.
//! Inputs are never validated: numbers are coerced the way a browser number
//! input would coerce them, and everything else is stored verbatim until the
//! store accepts or rejects it.

use crate::core::derivation::{Derived, QuantityInputs, derive, resolve_fob};
use crate::core::fields::{FIELDS, FieldKind, FieldSpec, field};
use crate::entities::shipment;
use sea_orm::ModelTrait;
use sea_orm::sea_query::ValueType;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// A single field value in the working form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text as typed
    Text(String),
    /// Coerced numeric value (may be NaN for unparsable input)
    Number(f64),
}

impl FieldValue {
    /// The initial value for a field of the given kind.
    #[must_use]
    pub const fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Number => Self::Number(0.0),
        }
    }

    /// Interprets raw input according to `kind`.
    #[must_use]
    pub fn parse(kind: FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::Text => Self::Text(raw.to_string()),
            FieldKind::Number => Self::Number(coerce_number(raw)),
        }
    }

    /// Numeric view; text reads as 0.
    #[must_use]
    pub const fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(_) => 0.0,
        }
    }

    /// Whether this is a blank text value.
    #[must_use]
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

/// Coerces raw input to a number: blank is 0, anything unparsable is NaN.
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Snapshot of every editable field.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentForm {
    values: BTreeMap<&'static str, FieldValue>,
}

impl Default for ShipmentForm {
    fn default() -> Self {
        Self::empty()
    }
}

impl ShipmentForm {
    /// All numbers zero, all text empty.
    #[must_use]
    pub fn empty() -> Self {
        let values = FIELDS
            .iter()
            .map(|spec| (spec.name, FieldValue::empty(spec.kind)))
            .collect();
        Self { values }
    }

    /// Builds a form from a persisted record. NULL text reads back as "".
    #[must_use]
    pub fn from_model(record: &shipment::Model) -> Self {
        let values = FIELDS
            .iter()
            .map(|spec| (spec.name, read_column(record, spec)))
            .collect();
        Self { values }
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Numeric value of a field, 0 when missing.
    #[must_use]
    pub fn number(&self, name: &str) -> f64 {
        self.values.get(name).map_or(0.0, FieldValue::as_number)
    }

    /// Text value of a field, "" when missing or numeric.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    /// The quantities the derived totals are computed from.
    #[must_use]
    pub fn quantities(&self) -> QuantityInputs {
        QuantityInputs {
            containers: self.number("cant_contenedores"),
            boxes_per_container: self.number("cajas_x_cont"),
            pallets: self.number("cant_pallets"),
            boxes_per_pallet: self.number("cajas_x_pallet"),
            loose_boxes: self.number("cajas_totales_granel"),
            net_weight_per_box: self.number("pneto_x_caja"),
            gross_weight_per_box: self.number("pbruto_x_caja"),
            price_per_box: self.number("precio_x_caja"),
        }
    }

    fn set(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }
}

fn read_column(record: &shipment::Model, spec: &FieldSpec) -> FieldValue {
    let Ok(column) = shipment::Column::from_str(spec.name) else {
        return FieldValue::empty(spec.kind);
    };
    let value = record.get(column);
    match spec.kind {
        FieldKind::Number => FieldValue::Number(<f64 as ValueType>::try_from(value).unwrap_or(0.0)),
        FieldKind::Text => FieldValue::Text(
            <Option<String> as ValueType>::try_from(value)
                .ok()
                .flatten()
                .unwrap_or_default(),
        ),
    }
}

/// A record ready to be written to the store.
///
/// Derived fields are filled in and blank text has been turned into `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentPayload {
    values: BTreeMap<&'static str, Option<FieldValue>>,
}

impl ShipmentPayload {
    /// Value for a column, `None` when absent (NULL) or unknown.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Numeric value for a column, 0 when absent.
    #[must_use]
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, FieldValue::as_number)
    }

    /// Text value for a column, `None` when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Iterates over every column and its (possibly absent) value.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&FieldValue>)> + '_ {
        self.values.iter().map(|(name, value)| (*name, value.as_ref()))
    }
}

/// Which record, if any, the form is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditTarget {
    /// Composing a new record
    #[default]
    Idle,
    /// Editing the persisted record with this id
    Editing(i64),
}

impl EditTarget {
    /// The id being edited, if any.
    #[must_use]
    pub const fn id(self) -> Option<i64> {
        match self {
            Self::Idle => None,
            Self::Editing(id) => Some(id),
        }
    }
}

/// Owns the working form and the edit target.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    form: ShipmentForm,
    target: EditTarget,
}

impl FormController {
    /// Starts with an empty form and no edit target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current field values.
    #[must_use]
    pub const fn form(&self) -> &ShipmentForm {
        &self.form
    }

    /// The current edit target.
    #[must_use]
    pub const fn edit_target(&self) -> EditTarget {
        self.target
    }

    /// Stores `raw` under `name`, coercing numeric fields.
    ///
    /// Returns `false` (and changes nothing) for unknown names and for derived
    /// fields, which are always recomputed.
    pub fn update_field(&mut self, name: &str, raw: &str) -> bool {
        let Some(spec) = field(name) else {
            debug!("Ignoring update for unknown field '{}'", name);
            return false;
        };
        if spec.derived {
            debug!("Ignoring update for derived field '{}'", name);
            return false;
        }
        self.form.set(spec.name, FieldValue::parse(spec.kind, raw));
        true
    }

    /// Derived totals for the current values.
    #[must_use]
    pub fn recompute(&self) -> Derived {
        derive(&self.form.quantities())
    }

    /// Replaces the whole form with `record` and makes it the edit target.
    pub fn load_for_edit(&mut self, record: &shipment::Model) {
        self.form = ShipmentForm::from_model(record);
        self.target = EditTarget::Editing(record.id_embarque);
    }

    /// Back to an empty form with no edit target.
    pub fn reset(&mut self) {
        self.form = ShipmentForm::empty();
        self.target = EditTarget::Idle;
    }

    /// Packages the current values for the store.
    #[must_use]
    pub fn build_payload(&self) -> ShipmentPayload {
        let derived = self.recompute();
        let mut merged = self.form.clone();
        merged.set("cajas_totales_cont", FieldValue::Number(derived.boxes_in_containers));
        merged.set("cajas_totales_pallet", FieldValue::Number(derived.boxes_on_pallets));
        merged.set("pneto_total", FieldValue::Number(derived.net_weight_total));
        merged.set("pbruto_total", FieldValue::Number(derived.gross_weight_total));
        merged.set(
            "fob",
            FieldValue::Number(resolve_fob(self.form.number("fob"), derived.fob_total)),
        );

        let values = merged
            .values
            .into_iter()
            .map(|(name, value)| {
                let value = if value.is_blank_text() { None } else { Some(value) };
                (name, value)
            })
            .collect();
        ShipmentPayload { values }
    }
}
