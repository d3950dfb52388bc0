//! SeaORM-backed record store.

use crate::config::AppConfig;
use crate::config::database::{create_connection, create_tables};
use crate::core::form::ShipmentPayload;
use crate::entities::{Shipment, shipment};
use crate::errors::{Error, Result};
use crate::store::{ChangeEvent, ChangeKind, RecordStore, to_active_model};
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, QueryOrder, prelude::*};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// Shipment store over a SQL database.
///
/// Clones share the connection pool and the change feed, so a mutation made
/// through one clone notifies subscribers of every other clone.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SeaOrmStore {
    /// Wraps an open connection. The schema must already exist.
    #[must_use]
    pub fn new(db: DatabaseConnection, feed_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(feed_capacity.max(1));
        Self { db, changes }
    }

    /// Opens the configured database and makes sure the table exists.
    #[instrument(skip(config))]
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let db = create_connection(&config.database_url).await?;
        create_tables(&db).await?;
        info!("Connected to shipment store.");
        Ok(Self::new(db, config.change_feed_capacity))
    }

    /// Closes the underlying connection pool.
    pub async fn disconnect(self) -> Result<()> {
        self.db.close().await?;
        info!("Disconnected from shipment store.");
        Ok(())
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn publish(&self, kind: ChangeKind, id: i64) {
        // No receivers is fine: nobody is watching.
        let delivered = self.changes.send(ChangeEvent::now(kind, id)).unwrap_or(0);
        debug!("Published {:?} for shipment {} to {} subscribers", kind, id, delivered);
    }
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    async fn list(&self) -> Result<Vec<shipment::Model>> {
        Shipment::find()
            .order_by_desc(shipment::Column::IdEmbarque)
            .all(&self.db)
            .await
            .map_err(Into::into)
    }

    #[instrument(skip(self, payload))]
    async fn create(&self, payload: &ShipmentPayload) -> Result<i64> {
        let model = to_active_model(payload);
        let id = Shipment::insert(model).exec(&self.db).await?.last_insert_id;
        info!("Created shipment {}", id);
        self.publish(ChangeKind::Insert, id);
        Ok(id)
    }

    #[instrument(skip(self, payload))]
    async fn update(&self, id: i64, payload: &ShipmentPayload) -> Result<()> {
        let model = to_active_model(payload);
        let result = Shipment::update_many()
            .set(model)
            .filter(shipment::Column::IdEmbarque.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(Error::ShipmentNotFound { id });
        }
        info!("Updated shipment {}", id);
        self.publish(ChangeKind::Update, id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = Shipment::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(Error::ShipmentNotFound { id });
        }
        info!("Deleted shipment {}", id);
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
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;

        let first = store.create(&payload_with_booking("BKG-1")).await?;
        let second = store.create(&payload_with_booking("BKG-2")).await?;
        assert!(second > first);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_newest_first() -> Result<()> {
        let store = setup_test_store().await?;
        for booking in ["A", "B", "C"] {
            store.create(&payload_with_booking(booking)).await?;
        }

        let records = store.list().await?;
        let bookings: Vec<_> = records.iter().map(|r| r.booking.clone().unwrap()).collect();
        assert_eq!(bookings, vec!["C", "B", "A"]);
        assert!(records.windows(2).all(|w| w[0].id_embarque > w[1].id_embarque));

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_text_is_stored_as_null() -> Result<()> {
        let store = setup_test_store().await?;
        let id = store.create(&payload_with_booking("BKG-9")).await?;

        let record = Shipment::find_by_id(id).one(store.connection()).await?.unwrap();
        assert_eq!(record.booking.as_deref(), Some("BKG-9"));
        assert_eq!(record.cliente, None);
        assert_eq!(record.etd, None);
        assert_eq!(record.cant_contenedores, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_overwrites_in_place() -> Result<()> {
        let store = setup_test_store().await?;
        let id = store.create(&payload_with_booking("OLD")).await?;

        store.update(id, &payload_with_booking("NEW")).await?;

        let records = store.list().await?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id_embarque, id);
        assert_eq!(records[0].booking.as_deref(), Some("NEW"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_rejected() -> Result<()> {
        let store = setup_test_store().await?;

        let update = store.update(404, &payload_with_booking("X")).await;
        assert!(matches!(update, Err(Error::ShipmentNotFound { id: 404 })));

        let delete = store.delete(404).await;
        assert!(matches!(delete, Err(Error::ShipmentNotFound { id: 404 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_permanently() -> Result<()> {
        let store = setup_test_store().await?;
        let keep = store.create(&payload_with_booking("KEEP")).await?;
        let gone = store.create(&payload_with_booking("GONE")).await?;

        store.delete(gone).await?;

        let ids: Vec<i64> = store.list().await?.iter().map(|r| r.id_embarque).collect();
        assert_eq!(ids, vec![keep]);
        assert!(Shipment::find_by_id(gone).one(store.connection()).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_nan_quantity_is_rejected_by_the_table() -> Result<()> {
        let store = setup_test_store().await?;
        let mut form = crate::core::form::FormController::new();
        form.update_field("cant_contenedores", "tres");

        let result = store.create(&form.build_payload()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().is_store_rejection());
        assert!(store.list().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_mutations_reach_every_clone() -> Result<()> {
        let store = setup_test_store().await?;
        let other_client = store.clone();
        let mut feed = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);

        let id = other_client.create(&payload_with_booking("B")).await?;
        other_client.update(id, &payload_with_booking("B2")).await?;
        other_client.delete(id).await?;

        let kinds: Vec<ChangeKind> = vec![
            feed.recv().await.unwrap().kind,
            feed.recv().await.unwrap().kind,
            feed.recv().await.unwrap().kind,
        ];
        assert_eq!(kinds, vec![ChangeKind::Insert, ChangeKind::Update, ChangeKind::Delete]);

        drop(feed);
        assert_eq!(store.subscriber_count(), 0);

        Ok(())
    }
}
