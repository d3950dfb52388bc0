//! The shipment desk - form, visible list and store wired together.
//!
//! A [`ShipmentDesk`] is one open view of the shipments module. Opening it loads
//! the list and subscribes to the store's change feed; closing or dropping it
//! releases the subscription. Submits and deletes go to the store and refresh
//! the list when they succeed; on failure the form is left as it was so the
//! user can correct it and resubmit.

use crate::core::derivation::Derived;
use crate::core::form::{EditTarget, FormController};
use crate::core::subscription::ChangeSubscription;
use crate::core::view::{ShipmentRow, ViewState};
use crate::entities::shipment;
use crate::errors::{Error, Result};
use crate::store::RecordStore;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Question asked before a record is deleted.
pub const DELETE_PROMPT: &str = "¿Está seguro de eliminar este embarque?";

const CHANGE_CHANNEL: &str = "embarques-changes";

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait ConfirmGate: Send {
    /// Returns `true` to go ahead.
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// A gate with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl ConfirmGate for AutoConfirm {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new record was stored under this id
    Created(i64),
    /// The record with this id was overwritten
    Updated(i64),
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(_) => f.write_str("Registrado exitosamente"),
            Self::Updated(_) => f.write_str("Actualizado correctamente"),
        }
    }
}

/// Result of a delete request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the prompt; nothing was sent
    Declined,
    /// The record with this id is gone
    Deleted(i64),
}

/// Read side of the desk's busy flag.
///
/// The flag is up while a submit is in flight. Handles stay valid after the
/// desk moves, so a front end can poll one while `submit` holds the desk.
#[derive(Debug, Clone, Default)]
pub struct BusyHandle(Arc<AtomicBool>);

impl BusyHandle {
    /// Whether a submit is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn raise(&self) -> BusyGuard {
        self.0.store(true, Ordering::Release);
        BusyGuard(Arc::clone(&self.0))
    }
}

/// Lowers the busy flag when a submit ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Reloads `records` from the store. The list is untouched on error.
async fn refresh_records(
    store: &dyn RecordStore,
    records: &RwLock<Vec<shipment::Model>>,
) -> Result<usize> {
    let fresh = store.list().await?;
    let count = fresh.len();
    *records.write().await = fresh;
    debug!("Visible list refreshed with {} shipments", count);
    Ok(count)
}

/// One open view of the shipments module.
pub struct ShipmentDesk {
    store: Arc<dyn RecordStore>,
    form: FormController,
    view: ViewState,
    records: Arc<RwLock<Vec<shipment::Model>>>,
    subscription: Option<ChangeSubscription>,
    busy: BusyHandle,
}

impl ShipmentDesk {
    /// Loads the list and starts listening for changes.
    #[instrument(skip(store))]
    pub async fn open(store: Arc<dyn RecordStore>) -> Self {
        let records = Arc::new(RwLock::new(Vec::new()));
        let mut desk = Self {
            store,
            form: FormController::new(),
            view: ViewState::default(),
            records,
            subscription: None,
            busy: BusyHandle::default(),
        };
        desk.refresh_quietly().await;
        desk.subscription = Some(desk.subscribe());
        info!("Shipment desk opened");
        desk
    }

    fn subscribe(&self) -> ChangeSubscription {
        let store = Arc::clone(&self.store);
        let records = Arc::clone(&self.records);
        let feed = store.subscribe();
        ChangeSubscription::open(CHANGE_CHANNEL, feed, move |_| {
            let store = Arc::clone(&store);
            let records = Arc::clone(&records);
            async move {
                if let Err(e) = refresh_records(store.as_ref(), &records).await {
                    warn!("Refresh after change notification failed: {}", e);
                }
            }
        })
    }

    /// Stops listening for changes.
    pub async fn close(mut self) {
        let Some(subscription) = self.subscription.take() else {
            info!("Shipment desk closed");
            return;
        };
        let channel = subscription.channel().to_string();
        subscription.close().await;
        info!("Shipment desk closed, channel '{}' released", channel);
    }

    /// Whether the change subscription is running.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(ChangeSubscription::is_active)
    }

    /// Reloads the visible list from the store.
    pub async fn refresh(&self) -> Result<usize> {
        refresh_records(self.store.as_ref(), &self.records).await
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.refresh().await {
            warn!("Could not load shipments, keeping the current list: {}", e);
        }
    }

    /// Snapshot of the visible list, newest first.
    pub async fn records(&self) -> Vec<shipment::Model> {
        self.records.read().await.clone()
    }

    /// The visible list projected into table rows.
    pub async fn rows(&self) -> Vec<ShipmentRow> {
        self.records.read().await.iter().map(ShipmentRow::from).collect()
    }

    /// The form controller.
    #[must_use]
    pub const fn form(&self) -> &FormController {
        &self.form
    }

    /// Layout state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable layout state.
    pub const fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Forwards to [`FormController::update_field`].
    pub fn update_field(&mut self, name: &str, raw: &str) -> bool {
        self.form.update_field(name, raw)
    }

    /// Derived totals for the summary strip.
    #[must_use]
    pub fn summary(&self) -> Derived {
        self.form.recompute()
    }

    /// Which record is being edited.
    #[must_use]
    pub const fn edit_target(&self) -> EditTarget {
        self.form.edit_target()
    }

    /// A handle that reports the busy flag from outside the desk.
    #[must_use]
    pub fn busy_handle(&self) -> BusyHandle {
        self.busy.clone()
    }

    /// Loads a record from the visible list into the form for editing.
    pub async fn edit(&mut self, id: i64) -> Result<()> {
        let record = self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id_embarque == id)
            .cloned()
            .ok_or(Error::ShipmentNotFound { id })?;
        self.edit_record(&record);
        Ok(())
    }

    /// Loads `record` into the form for editing and shows the form.
    pub fn edit_record(&mut self, record: &shipment::Model) {
        self.form.load_for_edit(record);
        self.view.reveal_form();
        debug!("Editing shipment {}", record.id_embarque);
    }

    /// Drops the edit target and empties the form.
    pub fn cancel_edit(&mut self) {
        self.form.reset();
    }

    /// Creates or updates depending on the edit target.
    ///
    /// On success the form is reset and the list reloaded. On failure nothing
    /// local changes and the store's error is returned.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let _busy = self.busy.raise();
        let payload = self.form.build_payload();

        let outcome = match self.form.edit_target() {
            EditTarget::Idle => SubmitOutcome::Created(self.store.create(&payload).await?),
            EditTarget::Editing(id) => {
                self.store.update(id, &payload).await?;
                SubmitOutcome::Updated(id)
            }
        };

        info!("{:?}", outcome);
        self.form.reset();
        self.refresh_quietly().await;
        Ok(outcome)
    }

    /// Deletes record `id` once `gate` confirms.
    ///
    /// Deleting the record being edited also clears the form.
    #[instrument(skip(self, gate))]
    pub async fn delete(&mut self, id: i64, gate: &mut dyn ConfirmGate) -> Result<DeleteOutcome> {
        if !gate.confirm(DELETE_PROMPT).await {
            debug!("Delete of shipment {} declined", id);
            return Ok(DeleteOutcome::Declined);
        }

        self.store.delete(id).await?;

        if self.form.edit_target() == EditTarget::Editing(id) {
            self.form.reset();
        }
        self.refresh_quietly().await;
        Ok(DeleteOutcome::Deleted(id))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::form::ShipmentForm;
    use crate::store::{MemoryStore, StoreCall};
    use crate::test_utils::*;
    use std::time::Duration;

    async fn open_with_memory() -> (Arc<MemoryStore>, ShipmentDesk) {
        init_test_tracing();
        let store = Arc::new(MemoryStore::new());
        let desk = ShipmentDesk::open(Arc::clone(&store) as Arc<dyn RecordStore>).await;
        (store, desk)
    }

    async fn wait_for_len(desk: &ShipmentDesk, expected: usize) {
        for _ in 0..200 {
            if desk.records().await.len() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("visible list never reached {expected} records");
    }

    fn fill_worked_example(desk: &mut ShipmentDesk) {
        desk.update_field("booking", "EBKG0912");
        desk.update_field("cant_contenedores", "3");
        desk.update_field("cajas_x_cont", "20");
        desk.update_field("pbruto_x_caja", "1.5");
    }

    #[tokio::test]
    async fn test_open_loads_list_and_subscribes() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        store.create(&payload_with_booking("EXISTING")).await?;

        let desk = ShipmentDesk::open(Arc::clone(&store) as Arc<dyn RecordStore>).await;
        assert_eq!(desk.records().await.len(), 1);
        assert!(desk.is_live());
        assert_eq!(store.subscriber_count(), 1);

        desk.close().await;
        assert_eq!(store.subscriber_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reopening_does_not_leak_channels() {
        let store = Arc::new(MemoryStore::new());
        for _ in 0..5 {
            let desk = ShipmentDesk::open(Arc::clone(&store) as Arc<dyn RecordStore>).await;
            desk.close().await;
        }
        assert_eq!(store.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_matches_worked_example() {
        let (_store, mut desk) = open_with_memory().await;
        fill_worked_example(&mut desk);
        let summary = desk.summary();
        assert_eq!(summary.grand_total_boxes, 60.0);
        assert_eq!(summary.gross_weight_total, 90.0);
        desk.close().await;
    }

    #[tokio::test]
    async fn test_submit_without_target_creates_and_resets() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        fill_worked_example(&mut desk);

        let outcome = desk.submit().await?;
        let SubmitOutcome::Created(id) = outcome else {
            panic!("expected a create, got {outcome:?}");
        };
        assert_eq!(outcome.to_string(), "Registrado exitosamente");

        assert_eq!(desk.edit_target(), EditTarget::Idle);
        assert_eq!(desk.form().form(), &ShipmentForm::empty());
        assert!(store.calls().await.contains(&StoreCall::Create));

        let records = desk.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id_embarque, id);
        assert_eq!(records[0].cajas_totales_cont, 60.0);
        assert_eq!(records[0].pbruto_total, 90.0);
        assert_eq!(records[0].cliente, None);

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_with_target_updates_that_record_only() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("OLD")).await?;
        desk.refresh().await?;

        desk.edit(id).await?;
        assert_eq!(desk.edit_target(), EditTarget::Editing(id));
        desk.update_field("booking", "NEW");

        let outcome = desk.submit().await?;
        assert_eq!(outcome, SubmitOutcome::Updated(id));
        assert_eq!(outcome.to_string(), "Actualizado correctamente");
        assert_eq!(desk.edit_target(), EditTarget::Idle);

        let calls = store.calls().await;
        assert_eq!(calls.iter().filter(|c| **c == StoreCall::Create).count(), 1);
        assert!(calls.contains(&StoreCall::Update(id)));

        let records = desk.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].booking.as_deref(), Some("NEW"));

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_submit_keeps_form_and_target() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("OLD")).await?;
        desk.refresh().await?;
        desk.edit(id).await?;
        desk.update_field("booking", "CHANGED");
        let before = desk.form().form().clone();

        store.reject_writes("value too long for type character varying(20)").await;
        let err = desk.submit().await.unwrap_err();
        assert!(err.is_store_rejection());
        assert_eq!(err.to_string(), "value too long for type character varying(20)");

        assert_eq!(desk.form().form(), &before);
        assert_eq!(desk.edit_target(), EditTarget::Editing(id));
        assert!(!desk.busy_handle().is_busy());
        assert_eq!(desk.records().await[0].booking.as_deref(), Some("OLD"));

        // Corrected resubmit goes through
        store.accept_writes().await;
        assert_eq!(desk.submit().await?, SubmitOutcome::Updated(id));

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_busy_flag_is_up_only_while_submit_is_in_flight() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        store.delay_writes(Duration::from_millis(100)).await;
        let busy = desk.busy_handle();
        assert!(!busy.is_busy());

        let watcher = {
            let busy = busy.clone();
            tokio::spawn(async move {
                for _ in 0..200 {
                    if busy.is_busy() {
                        return true;
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
                false
            })
        };
        desk.update_field("booking", "SLOW");
        desk.submit().await?;
        assert!(watcher.await.unwrap(), "flag never seen up during submit");
        assert!(!busy.is_busy());

        // Lowered again when the store refuses
        store.reject_writes("statement timeout").await;
        assert!(desk.submit().await.is_err());
        assert!(!busy.is_busy());

        // And when the submit is abandoned half way
        store.accept_writes().await;
        let abandoned = tokio::time::timeout(Duration::from_millis(10), desk.submit()).await;
        assert!(abandoned.is_err());
        assert!(!busy.is_busy());

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_declined_delete_is_a_no_op() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("KEEP")).await?;
        desk.refresh().await?;

        let outcome = desk.delete(id, &mut AutoConfirm(false)).await?;
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(!store.calls().await.contains(&StoreCall::Delete(id)));
        assert_eq!(store.len().await, 1);
        assert_eq!(desk.records().await.len(), 1);

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_confirmed_delete_of_edited_record_returns_to_idle() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("GONE")).await?;
        desk.refresh().await?;
        desk.edit(id).await?;

        let outcome = desk.delete(id, &mut AutoConfirm(true)).await?;
        assert_eq!(outcome, DeleteOutcome::Deleted(id));
        assert_eq!(desk.edit_target(), EditTarget::Idle);
        assert!(desk.records().await.is_empty());

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_of_other_record_keeps_edit_target() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let editing = store.create(&payload_with_booking("EDIT")).await?;
        let other = store.create(&payload_with_booking("OTHER")).await?;
        desk.refresh().await?;
        desk.edit(editing).await?;

        desk.delete(other, &mut AutoConfirm(true)).await?;
        assert_eq!(desk.edit_target(), EditTarget::Editing(editing));
        assert_eq!(desk.form().form().text("booking"), "EDIT");

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_delete_leaves_list() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("STAYS")).await?;
        desk.refresh().await?;

        store.reject_writes("permission denied").await;
        let err = desk.delete(id, &mut AutoConfirm(true)).await.unwrap_err();
        assert!(err.is_store_rejection());
        assert_eq!(desk.records().await.len(), 1);

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let (_store, mut desk) = open_with_memory().await;
        let err = desk.edit(77).await.unwrap_err();
        assert!(matches!(err, Error::ShipmentNotFound { id: 77 }));
        assert_eq!(desk.edit_target(), EditTarget::Idle);
        desk.close().await;
    }

    #[tokio::test]
    async fn test_edit_reveals_collapsed_form_and_cancel_resets() -> Result<()> {
        let (store, mut desk) = open_with_memory().await;
        let id = store.create(&payload_with_booking("X")).await?;
        desk.refresh().await?;
        desk.view_mut().toggle_form();

        desk.edit(id).await?;
        assert!(!desk.view().form_collapsed);

        desk.cancel_edit();
        assert_eq!(desk.edit_target(), EditTarget::Idle);
        assert_eq!(desk.form().form(), &ShipmentForm::empty());

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_change_from_another_client_refreshes_list() -> Result<()> {
        let (store, desk) = open_with_memory().await;
        assert!(desk.records().await.is_empty());

        // Another client writes straight to the shared store
        store.create(&payload_with_booking("REMOTE")).await?;
        wait_for_len(&desk, 1).await;
        assert_eq!(desk.rows().await[0].booking, "REMOTE");

        let id = desk.records().await[0].id_embarque;
        store.delete(id).await?;
        wait_for_len(&desk, 0).await;

        desk.close().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_desk_stops_refreshing() -> Result<()> {
        let (store, desk) = open_with_memory().await;
        let records = Arc::clone(&desk.records);
        desk.close().await;

        store.create(&payload_with_booking("LATE")).await?;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(records.read().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_desk_over_sqlite_store() -> Result<()> {
        init_test_tracing();
        let store = Arc::new(setup_test_store().await?);
        let mut desk = ShipmentDesk::open(Arc::clone(&store) as Arc<dyn RecordStore>).await;

        fill_worked_example(&mut desk);
        desk.update_field("etd", "");
        let SubmitOutcome::Created(id) = desk.submit().await? else {
            panic!("expected a create");
        };

        desk.edit(id).await?;
        desk.update_field("cliente", "Fyffes");
        assert_eq!(desk.submit().await?, SubmitOutcome::Updated(id));

        let records = desk.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cliente.as_deref(), Some("Fyffes"));
        assert_eq!(records[0].etd, None);
        assert_eq!(records[0].pbruto_total, 90.0);

        assert_eq!(desk.delete(id, &mut AutoConfirm(true)).await?, DeleteOutcome::Deleted(id));
        assert!(desk.records().await.is_empty());

        desk.close().await;
        Ok(())
    }
}
