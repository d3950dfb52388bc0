//! Field catalog for the shipment form.
//!
//! Every editable column of [`crate::entities::shipment`] is described here once:
//! its label, whether it is numeric, whether the desk derives it, and which
//! option list (if any) feeds its selector. Tabs reference fields by name; a
//! field may appear on more than one tab.

use std::fmt;
use std::str::FromStr;

/// How raw input for a field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, stored as-is (blank becomes NULL on save)
    Text,
    /// Numeric input, coerced on every update
    Number,
}

/// Option lists from the catalog that back selector fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionList {
    /// Exporting agencies
    Agencies,
    /// Shipping weeks
    Weeks,
    /// Shipping lines
    Carriers,
    /// Empty-container depots
    Depots,
    /// Port terminals and warehouses
    Terminals,
    /// Box models
    BoxTypes,
    /// Containerised or loose cargo
    ShipmentTypes,
    /// Incoterms
    Negotiations,
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name, also the key used by the form
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Input interpretation
    pub kind: FieldKind,
    /// Computed by the desk; not independently editable
    pub derived: bool,
    /// Selector options, when the field is a dropdown
    pub options: Option<OptionList>,
}

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text,
        derived: false,
        options: None,
    }
}

const fn select(name: &'static str, label: &'static str, options: OptionList) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text,
        derived: false,
        options: Some(options),
    }
}

const fn number(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number,
        derived: false,
        options: None,
    }
}

const fn derived(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number,
        derived: true,
        options: None,
    }
}

/// All editable fields, in column order.
pub const FIELDS: &[FieldSpec] = &[
    select("semana", "Semana", OptionList::Weeks),
    text("booking", "Booking"),
    text("vessel", "Nave"),
    text("voyager", "Voyager"),
    select("naviera", "Naviera", OptionList::Carriers),
    text("cliente", "Cliente"),
    text("pais_destino", "País De Destino"),
    text("ciudad_destino", "Ciudad De Destino"),
    text("puerto_destino_de_descarga", "Puerto De Destino De Descarga"),
    text("destino_final_de_la_carga", "Destino Final De La Carga"),
    select("depot_de_retiro", "Depot de Retiro", OptionList::Depots),
    select(
        "almacen_terminal_portuario",
        "Almacén / Terminal Portuario",
        OptionList::Terminals,
    ),
    select("tipo_de_embarque", "Tipo De Embarque", OptionList::ShipmentTypes),
    number("cant_contenedores", "Cant. De Contenedores"),
    number("cajas_x_cont", "Cajas Por Contenedor"),
    derived("cajas_totales_cont", "Cjs.Totales En Contenedores"),
    number("cant_pallets", "Cant. De Pallets"),
    number("cajas_x_pallet", "Cajas Por Pallet"),
    derived("cajas_totales_pallet", "Cjs.Totales De Pallets"),
    number("cajas_totales_granel", "Cjs.Totales Al Granel"),
    text("marca", "Marca"),
    select("tipo_de_caja", "Tipo De Caja", OptionList::BoxTypes),
    text("calidad", "Calidad"),
    text("pad", "Pad"),
    text("funda", "Funda"),
    text("sachet", "Sachet"),
    text("molecula", "Molecula"),
    number("pneto_x_caja", "Peso Neto Por Caja"),
    derived("pneto_total", "Peso Neto Total"),
    number("pbruto_x_caja", "Peso Bruto Por Caja"),
    derived("pbruto_total", "Peso Bruto Total"),
    number("horas_energia_libre", "Horas Energía Libre"),
    text("inicio_energia_libre", "Inicio Energía Libre"),
    text("cut_off_fisico", "Cut Off Físico"),
    text("cut_off_docs", "Cut Off Docs"),
    text("detencion_libre", "Días De Detención Libre"),
    text("almacenaje_libre", "Días De Almacenaje Libre"),
    select("agencia_exportadora", "Agencia", OptionList::Agencies),
    text("observaciones", "Observaciones"),
    text("orden", "Orden"),
    text("aucp", "AUCP"),
    text("dae", "DAE"),
    text("regularizado", "Regularizado"),
    text("etd", "ETD"),
    text("tte", "TTE"),
    text("eta", "ETA"),
    number("precio_x_caja", "Precio"),
    text("factura", "Factura"),
    text("bl", "BL"),
    text("liberacion", "Liberación"),
    select("negociacion", "Negociación", OptionList::Negotiations),
    text("terminos_de_pago", "Términos De Pago"),
    number("fob", "FOB"),
    number("cfr", "CFR"),
    text("banco", "Banco"),
    text("documentos_enviados", "Documentos Enviados"),
    text("area_departamento", "Área / Departamento"),
];

/// Looks up a field by column name.
#[must_use]
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

/// The three tabs of the shipment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormTab {
    /// Commercial / export data
    #[default]
    Comex,
    /// Cargo description and transit dates
    Carga,
    /// Invoicing and payment
    Financiero,
}

const COMEX_FIELDS: &[&str] = &[
    "agencia_exportadora",
    "semana",
    "booking",
    "vessel",
    "voyager",
    "naviera",
    "cliente",
    "puerto_destino_de_descarga",
    "depot_de_retiro",
    "almacen_terminal_portuario",
    "marca",
    "tipo_de_caja",
    "tipo_de_embarque",
    "cant_contenedores",
    "cajas_x_cont",
    "cajas_totales_cont",
    "cant_pallets",
    "cajas_x_pallet",
    "cajas_totales_pallet",
    "cajas_totales_granel",
    "horas_energia_libre",
    "inicio_energia_libre",
    "cut_off_fisico",
    "cut_off_docs",
    "detencion_libre",
    "almacenaje_libre",
    "observaciones",
];

const CARGA_FIELDS: &[&str] = &[
    "molecula",
    "calidad",
    "pad",
    "funda",
    "sachet",
    "pneto_x_caja",
    "pneto_total",
    "pbruto_x_caja",
    "pbruto_total",
    "pais_destino",
    "ciudad_destino",
    "puerto_destino_de_descarga",
    "destino_final_de_la_carga",
    "orden",
    "aucp",
    "dae",
    "etd",
    "tte",
    "eta",
];

const FINANCIERO_FIELDS: &[&str] = &[
    "factura",
    "bl",
    "regularizado",
    "liberacion",
    "banco",
    "documentos_enviados",
    "precio_x_caja",
    "fob",
    "cfr",
    "negociacion",
    "terminos_de_pago",
    "area_departamento",
];

impl FormTab {
    /// Tabs in display order.
    pub const ALL: [Self; 3] = [Self::Comex, Self::Carga, Self::Financiero];

    /// Label shown on the tab button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Comex => "Comex",
            Self::Carga => "Carga",
            Self::Financiero => "Financiero",
        }
    }

    /// Fields shown on this tab, in display order.
    pub fn fields(self) -> impl Iterator<Item = &'static FieldSpec> {
        let names = match self {
            Self::Comex => COMEX_FIELDS,
            Self::Carga => CARGA_FIELDS,
            Self::Financiero => FINANCIERO_FIELDS,
        };
        names.iter().filter_map(|name| field(name))
    }
}

impl fmt::Display for FormTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "comex" => Ok(Self::Comex),
            "carga" => Ok(Self::Carga),
            "financiero" => Ok(Self::Financiero),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}
