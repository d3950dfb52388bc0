//! Shipment entity - One export shipment ("embarque").
//!
//! Text columns are nullable: the desk stores blank inputs as NULL so optional
//! dates and references never hit a type constraint. Quantity columns are
//! non-null REAL values.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shipment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "embarques")]
pub struct Model {
    /// Identifier assigned by the store on insert
    #[sea_orm(primary_key)]
    pub id_embarque: i64,
    /// Week code, e.g. "2026-10"
    pub semana: Option<String>,
    /// Booking number
    pub booking: Option<String>,
    /// Vessel name
    pub vessel: Option<String>,
    /// Voyage number
    pub voyager: Option<String>,
    /// Shipping line
    pub naviera: Option<String>,
    /// Client
    pub cliente: Option<String>,
    /// Destination country
    pub pais_destino: Option<String>,
    /// Destination city
    pub ciudad_destino: Option<String>,
    /// Port of discharge
    pub puerto_destino_de_descarga: Option<String>,
    /// Final destination of the cargo
    pub destino_final_de_la_carga: Option<String>,
    /// Depot the empty container is withdrawn from
    pub depot_de_retiro: Option<String>,
    /// Port terminal or warehouse
    pub almacen_terminal_portuario: Option<String>,
    /// "Carga Contenerizada" or "Carga Suelta"
    pub tipo_de_embarque: Option<String>,
    /// Number of containers
    pub cant_contenedores: f64,
    /// Boxes per container
    pub cajas_x_cont: f64,
    /// Derived: containers × boxes per container
    pub cajas_totales_cont: f64,
    /// Number of pallets
    pub cant_pallets: f64,
    /// Boxes per pallet
    pub cajas_x_pallet: f64,
    /// Derived: pallets × boxes per pallet
    pub cajas_totales_pallet: f64,
    /// Loose-cargo boxes
    pub cajas_totales_granel: f64,
    /// Brand
    pub marca: Option<String>,
    /// Box model
    pub tipo_de_caja: Option<String>,
    /// Fruit quality grade
    pub calidad: Option<String>,
    /// Pad used in the box
    pub pad: Option<String>,
    /// Bag used in the box
    pub funda: Option<String>,
    /// Sachet used in the box
    pub sachet: Option<String>,
    /// Post-harvest treatment molecule
    pub molecula: Option<String>,
    /// Net weight per box (kg)
    pub pneto_x_caja: f64,
    /// Derived: grand total boxes × net weight per box
    pub pneto_total: f64,
    /// Gross weight per box (kg)
    pub pbruto_x_caja: f64,
    /// Derived: grand total boxes × gross weight per box
    pub pbruto_total: f64,
    /// Free reefer power hours
    pub horas_energia_libre: f64,
    /// Start of free reefer power
    pub inicio_energia_libre: Option<String>,
    /// Physical cut-off
    pub cut_off_fisico: Option<String>,
    /// Documents cut-off
    pub cut_off_docs: Option<String>,
    /// Free detention days
    pub detencion_libre: Option<String>,
    /// Free storage days
    pub almacenaje_libre: Option<String>,
    /// Exporting agency
    pub agencia_exportadora: Option<String>,
    /// Free-form notes
    pub observaciones: Option<String>,
    /// Purchase order
    pub orden: Option<String>,
    /// Phytosanitary certificate (AUCP)
    pub aucp: Option<String>,
    /// Export declaration (DAE)
    pub dae: Option<String>,
    /// Whether the export declaration is regularised
    pub regularizado: Option<String>,
    /// Estimated time of departure
    pub etd: Option<String>,
    /// Transit time
    pub tte: Option<String>,
    /// Estimated time of arrival
    pub eta: Option<String>,
    /// Price per box
    pub precio_x_caja: f64,
    /// Invoice number
    pub factura: Option<String>,
    /// Bill of lading
    pub bl: Option<String>,
    /// Release status
    pub liberacion: Option<String>,
    /// Incoterm
    pub negociacion: Option<String>,
    /// Payment terms
    pub terminos_de_pago: Option<String>,
    /// FOB value, manual or derived from price per box
    pub fob: f64,
    /// CFR value
    pub cfr: f64,
    /// Bank
    pub banco: Option<String>,
    /// Whether documents were sent
    pub documentos_enviados: Option<String>,
    /// Responsible area or department
    pub area_departamento: Option<String>,
}

/// Shipments stand alone; no relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
