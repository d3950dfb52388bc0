//! Record store - where shipments live.
//!
//! The desk talks to the store only through [`RecordStore`], so the backing
//! database can be swapped for [`MemoryStore`] in tests. Every successful
//! mutation is published on the store's change feed; any handle sharing the
//! same store sees it.

pub mod database;
pub mod memory;

pub use database::SeaOrmStore;
pub use memory::{MemoryStore, StoreCall};

use crate::core::fields::{FieldKind, field};
use crate::core::form::{FieldValue, ShipmentPayload};
use crate::entities::shipment;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Value};
use std::str::FromStr;
use tokio::sync::broadcast;
use tracing::warn;

/// Kind of mutation that produced a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A record was created
    Insert,
    /// A record was overwritten
    Update,
    /// A record was removed
    Delete,
}

/// Notification that the shipments table changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// What happened
    pub kind: ChangeKind,
    /// The affected record
    pub id: i64,
    /// When the store applied the change
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Stamps a new event with the current time.
    #[must_use]
    pub fn now(kind: ChangeKind, id: i64) -> Self {
        Self {
            kind,
            id,
            at: Utc::now(),
        }
    }
}

/// Operations the desk needs from a shipment store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, newest (highest id) first.
    async fn list(&self) -> Result<Vec<shipment::Model>>;

    /// Inserts a record and returns the id the store assigned.
    async fn create(&self, payload: &ShipmentPayload) -> Result<i64>;

    /// Overwrites the record with `id`.
    ///
    /// # Errors
    /// `ShipmentNotFound` when no such record exists, or whatever the store
    /// reports when it rejects the values.
    async fn update(&self, id: i64, payload: &ShipmentPayload) -> Result<()>;

    /// Permanently removes the record with `id`.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Opens a new receiver on the change feed.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Number of receivers currently open on the change feed.
    fn subscriber_count(&self) -> usize;
}

/// Converts a payload into an active model with every column set except the id.
#[must_use]
pub fn to_active_model(payload: &ShipmentPayload) -> shipment::ActiveModel {
    let mut model = <shipment::ActiveModel as Default>::default();
    for (name, value) in payload.iter() {
        let (Some(spec), Ok(column)) = (field(name), shipment::Column::from_str(name)) else {
            warn!("Payload column '{}' has no matching table column", name);
            continue;
        };
        model.set(column, column_value(spec.kind, value));
    }
    model
}

fn column_value(kind: FieldKind, value: Option<&FieldValue>) -> Value {
    match (kind, value) {
        (FieldKind::Number, Some(v)) => Value::from(v.as_number()),
        (FieldKind::Number, None) => Value::from(0.0_f64),
        (FieldKind::Text, Some(FieldValue::Text(s))) => Value::from(Some(s.clone())),
        (FieldKind::Text, Some(FieldValue::Number(n))) => Value::from(Some(n.to_string())),
        (FieldKind::Text, None) => Value::from(None::<String>),
    }
}
