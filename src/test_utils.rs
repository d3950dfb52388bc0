//! Shared test utilities for the shipment desk.
//!
//! Helpers for setting up in-memory stores and building records and payloads
//! with sensible defaults.

use crate::{
    core::form::{FormController, ShipmentPayload},
    entities::shipment,
    errors::Result,
    store::SeaOrmStore,
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with the shipments table.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A [`SeaOrmStore`] over a fresh in-memory database.
pub async fn setup_test_store() -> Result<SeaOrmStore> {
    Ok(SeaOrmStore::new(setup_test_db().await?, 16))
}

/// Payload for an otherwise empty form with only `booking` filled in.
///
/// # Defaults
/// * every other text field blank (stored as NULL)
/// * every quantity 0
pub fn payload_with_booking(booking: &str) -> ShipmentPayload {
    let mut form = FormController::new();
    form.update_field("booking", booking);
    form.build_payload()
}

/// A fully populated persisted record.
///
/// Derived columns agree with their inputs: 2 containers × 1080 boxes, 18 kg
/// net and 19 kg gross per box, 7.5 per box. `observaciones` is NULL.
pub fn sample_model(id: i64) -> shipment::Model {
    let text = |s: &str| Some(s.to_string());
    shipment::Model {
        id_embarque: id,
        semana: text("2026-10"),
        booking: Some(format!("BKG-{id}")),
        vessel: text("MSC"),
        voyager: text("AURORA"),
        naviera: text("MSC"),
        cliente: text("Fyffes"),
        pais_destino: text("Países Bajos"),
        ciudad_destino: text("Rotterdam"),
        puerto_destino_de_descarga: text("Rotterdam"),
        destino_final_de_la_carga: text("Rotterdam"),
        depot_de_retiro: text("Medlog Sur"),
        almacen_terminal_portuario: text("DP World"),
        tipo_de_embarque: text("Carga Contenerizada"),
        cant_contenedores: 2.0,
        cajas_x_cont: 1080.0,
        cajas_totales_cont: 2160.0,
        cant_pallets: 40.0,
        cajas_x_pallet: 54.0,
        cajas_totales_pallet: 2160.0,
        cajas_totales_granel: 0.0,
        marca: text("HugoFruit"),
        tipo_de_caja: text("208"),
        calidad: text("Premium"),
        pad: text("Sí"),
        funda: text("Polybag"),
        sachet: text("No"),
        molecula: text("Imazalil"),
        pneto_x_caja: 18.0,
        pneto_total: 38880.0,
        pbruto_x_caja: 19.0,
        pbruto_total: 41040.0,
        horas_energia_libre: 48.0,
        inicio_energia_libre: text("2026-03-01 08:00"),
        cut_off_fisico: text("2026-03-03"),
        cut_off_docs: text("2026-03-02"),
        detencion_libre: text("21 días"),
        almacenaje_libre: text("7 días"),
        agencia_exportadora: text("HugoFruit"),
        observaciones: None,
        orden: text("OC-118"),
        aucp: text("AUCP-55"),
        dae: text("028-2026-40-00012345"),
        regularizado: text("No"),
        etd: text("2026-03-04"),
        tte: text("18"),
        eta: text("2026-03-22"),
        precio_x_caja: 7.5,
        factura: text("001-001-000000123"),
        bl: text("MEDU1234567"),
        liberacion: text("Pendiente"),
        negociacion: text("FOB"),
        terminos_de_pago: text("30 días"),
        fob: 16200.0,
        cfr: 19800.0,
        banco: text("Pichincha"),
        documentos_enviados: text("No"),
        area_departamento: text("Comex"),
    }
}
