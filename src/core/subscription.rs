//! Standing change subscription.
//!
//! A [`ChangeSubscription`] owns one receiver on a store's change feed and a
//! task that runs a callback for every notification. Dropping it (or calling
//! [`ChangeSubscription::close`]) aborts the task, which drops the receiver, so
//! no channel outlives the view that opened it.

use crate::store::ChangeEvent;
use std::future::Future;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Scoped handle on a running change listener.
#[derive(Debug)]
pub struct ChangeSubscription {
    channel: String,
    task: Option<JoinHandle<()>>,
}

impl ChangeSubscription {
    /// Spawns a listener on `feed` that awaits `on_change` for each event.
    ///
    /// A lagged receiver still triggers one callback: events were missed, so
    /// the table changed. The listener stops when the feed closes.
    pub fn open<F, Fut>(
        channel: &str,
        mut feed: broadcast::Receiver<ChangeEvent>,
        mut on_change: F,
    ) -> Self
    where
        F: FnMut(Option<ChangeEvent>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = channel.to_string();
        let task = tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(event) => {
                        debug!(
                            "[{}] {:?} on shipment {} at {}",
                            name, event.kind, event.id, event.at
                        );
                        on_change(Some(event)).await;
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("[{}] Missed {} change notifications", name, missed);
                        on_change(None).await;
                    }
                    Err(RecvError::Closed) => {
                        debug!("[{}] Change feed closed", name);
                        break;
                    }
                }
            }
        });
        info!("Subscribed to changes on channel '{}'", channel);

        Self {
            channel: channel.to_string(),
            task: Some(task),
        }
    }

    /// Name given when the subscription was opened.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Whether the listener is still running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the listener and waits until its receiver is released.
    pub async fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // JoinError::Cancelled is the expected outcome here
            let _ = task.await;
            info!("Unsubscribed from channel '{}'", self.channel);
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Dropped subscription on channel '{}'", self.channel);
        }
    }
}
