//! In-process record store.
//!
//! Behaves like [`super::SeaOrmStore`] (ids ascend, list is newest first,
//! NaN quantities are refused) and additionally records every call, can be
//! told to reject writes and can slow them down, which is what the desk tests
//! need.

use crate::core::form::{FieldValue, ShipmentPayload};
use crate::entities::shipment;
use crate::errors::{Error, Result};
use crate::store::{ChangeEvent, ChangeKind, RecordStore, to_active_model};
use async_trait::async_trait;
use sea_orm::{Set, TryIntoModel};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tracing::debug;

/// A store operation, as seen by [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    /// [`RecordStore::list`]
    List,
    /// [`RecordStore::create`]
    Create,
    /// [`RecordStore::update`] for this id
    Update(i64),
    /// [`RecordStore::delete`] for this id
    Delete(i64),
}

#[derive(Default)]
struct MemoryState {
    records: BTreeMap<i64, shipment::Model>,
    last_id: i64,
    rejection: Option<String>,
    write_delay: Option<Duration>,
    calls: Vec<StoreCall>,
}

/// Shipment store held entirely in memory.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store with a small change feed.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(MemoryState::default()),
            changes,
        }
    }

    /// Makes every following create, update and delete fail with `message`.
    pub async fn reject_writes(&self, message: &str) {
        self.state.lock().await.rejection = Some(message.to_string());
    }

    /// Lifts a previous [`Self::reject_writes`].
    pub async fn accept_writes(&self) {
        self.state.lock().await.rejection = None;
    }

    /// Makes every following create, update and delete take `delay` first.
    pub async fn delay_writes(&self, delay: Duration) {
        self.state.lock().await.write_delay = Some(delay);
    }

    async fn pause(&self) {
        let delay = self.state.lock().await.write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    /// Every call made so far, oldest first.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.records.is_empty()
    }

    fn publish(&self, kind: ChangeKind, id: i64) {
        let delivered = self.changes.send(ChangeEvent::now(kind, id)).unwrap_or(0);
        debug!("Published {:?} for shipment {} to {} subscribers", kind, id, delivered);
    }
}

/// SQLite binds NaN as NULL, which the NOT NULL quantity columns refuse.
/// Infinities are stored as-is.
fn build_record(id: i64, payload: &ShipmentPayload) -> Result<shipment::Model> {
    let nan = payload
        .iter()
        .find(|(_, value)| matches!(value, Some(FieldValue::Number(n)) if n.is_nan()));
    if let Some((name, _)) = nan {
        return Err(Error::StoreRejected {
            message: format!("NOT NULL constraint failed: embarques.{name}"),
        });
    }
    let mut model = to_active_model(payload);
    model.id_embarque = Set(id);
    model.try_into_model().map_err(Into::into)
}

fn check_rejection(state: &MemoryState) -> Result<()> {
    match &state.rejection {
        Some(message) => Err(Error::StoreRejected {
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<shipment::Model>> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::List);
        Ok(state.records.values().rev().cloned().collect())
    }

    async fn create(&self, payload: &ShipmentPayload) -> Result<i64> {
        self.pause().await;
        let id = {
            let mut state = self.state.lock().await;
            state.calls.push(StoreCall::Create);
            check_rejection(&state)?;
            let id = state.last_id + 1;
            let record = build_record(id, payload)?;
            state.records.insert(id, record);
            state.last_id = id;
            id
        };
        self.publish(ChangeKind::Insert, id);
        Ok(id)
    }

    async fn update(&self, id: i64, payload: &ShipmentPayload) -> Result<()> {
        self.pause().await;
        {
            let mut state = self.state.lock().await;
            state.calls.push(StoreCall::Update(id));
            check_rejection(&state)?;
            if !state.records.contains_key(&id) {
                return Err(Error::ShipmentNotFound { id });
            }
            let record = build_record(id, payload)?;
            state.records.insert(id, record);
        }
        self.publish(ChangeKind::Update, id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.pause().await;
        {
            let mut state = self.state.lock().await;
            state.calls.push(StoreCall::Delete(id));
            check_rejection(&state)?;
            if state.records.remove(&id).is_none() {
                return Err(Error::ShipmentNotFound { id });
            }
        }
        self.publish(ChangeKind::Delete, id);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::form::FormController;
    use crate::test_utils::payload_with_booking;

    #[tokio::test]
    async fn test_memory_store_matches_database_ordering() -> Result<()> {
        let store = MemoryStore::new();
        let a = store.create(&payload_with_booking("A")).await?;
        let b = store.create(&payload_with_booking("B")).await?;

        let ids: Vec<i64> = store.list().await?.iter().map(|r| r.id_embarque).collect();
        assert_eq!(ids, vec![b, a]);

        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() -> Result<()> {
        let store = MemoryStore::new();
        let first = store.create(&payload_with_booking("A")).await?;
        store.delete(first).await?;
        let second = store.create(&payload_with_booking("B")).await?;
        assert!(second > first);

        Ok(())
    }

    #[tokio::test]
    async fn test_nan_is_refused_but_infinity_is_stored() -> Result<()> {
        let store = MemoryStore::new();

        let mut form = FormController::new();
        form.update_field("cfr", "1e400");
        let id = store.create(&form.build_payload()).await?;
        let records = store.list().await?;
        assert_eq!(records[0].id_embarque, id);
        assert!(records[0].cfr.is_infinite());

        form.update_field("cfr", "mil");
        let err = store.create(&form.build_payload()).await.unwrap_err();
        assert_eq!(err.to_string(), "NOT NULL constraint failed: embarques.cfr");
        assert_eq!(store.len().await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_switch() -> Result<()> {
        let store = MemoryStore::new();
        store.reject_writes("permission denied for table embarques").await;

        let err = store.create(&payload_with_booking("A")).await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table embarques");
        assert!(store.is_empty().await);

        store.accept_writes().await;
        store.create(&payload_with_booking("A")).await?;
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.calls().await,
            vec![StoreCall::Create, StoreCall::Create]
        );

        Ok(())
    }
}
