//! Derived totals for a shipment.
//!
//! [`derive`] is a pure function of a [`QuantityInputs`] snapshot. The desk
//! calls it on every read of the summary and again when packaging a payload, so
//! nothing here is cached.

/// The input quantities the derived totals depend on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuantityInputs {
    /// Number of containers
    pub containers: f64,
    /// Boxes loaded in each container
    pub boxes_per_container: f64,
    /// Number of pallets
    pub pallets: f64,
    /// Boxes stacked on each pallet
    pub boxes_per_pallet: f64,
    /// Boxes shipped as loose cargo
    pub loose_boxes: f64,
    /// Net weight of one box (kg)
    pub net_weight_per_box: f64,
    /// Gross weight of one box (kg)
    pub gross_weight_per_box: f64,
    /// Price of one box
    pub price_per_box: f64,
}

/// Totals computed from [`QuantityInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Derived {
    /// containers × boxes per container
    pub boxes_in_containers: f64,
    /// pallets × boxes per pallet
    pub boxes_on_pallets: f64,
    /// boxes in containers + loose boxes; pallet boxes are not added
    pub grand_total_boxes: f64,
    /// grand total × net weight per box
    pub net_weight_total: f64,
    /// grand total × gross weight per box
    pub gross_weight_total: f64,
    /// grand total × price per box
    pub fob_total: f64,
}

/// Computes every derived total from a snapshot of the inputs.
#[must_use]
pub fn derive(inputs: &QuantityInputs) -> Derived {
    let boxes_in_containers = inputs.containers * inputs.boxes_per_container;
    let boxes_on_pallets = inputs.pallets * inputs.boxes_per_pallet;
    let grand_total_boxes = boxes_in_containers + inputs.loose_boxes;

    Derived {
        boxes_in_containers,
        boxes_on_pallets,
        grand_total_boxes,
        net_weight_total: grand_total_boxes * inputs.net_weight_per_box,
        gross_weight_total: grand_total_boxes * inputs.gross_weight_per_box,
        fob_total: grand_total_boxes * inputs.price_per_box,
    }
}

/// Picks the FOB value to persist.
///
/// A manually entered value wins unless it is falsy (zero or NaN), in which
/// case the derived estimate is used. An explicit zero therefore cannot be
/// saved over a non-zero estimate.
#[must_use]
pub fn resolve_fob(manual: f64, derived_total: f64) -> f64 {
    if manual == 0.0 || manual.is_nan() {
        derived_total
    } else {
        manual
    }
}
