//! Push-based location source boundary.
//!
//! A [`Subscription`] is the scoped handle on a source: events arrive in
//! delivery order and dropping the handle unsubscribes, whether the consumer
//! finished normally, was aborted or panicked.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::error::LocationError;
use crate::types::location::Sample;

pub type SubscriptionId = u64;

#[derive(Debug, Clone)]
pub enum LocationEvent {
    Sample(Sample),
    Error(LocationError),
}

pub trait LocationSource: Send + Sync {
    fn subscribe(
        &self,
    ) -> Result<(SubscriptionId, mpsc::UnboundedReceiver<LocationEvent>), LocationError>;

    fn unsubscribe(&self, id: SubscriptionId);
}

pub struct Subscription {
    id: SubscriptionId,
    events: mpsc::UnboundedReceiver<LocationEvent>,
    source: Arc<dyn LocationSource>,
}

impl Subscription {
    pub fn open(source: Arc<dyn LocationSource>) -> Result<Self, LocationError> {
        let (id, events) = source.subscribe()?;
        Ok(Self { id, events, source })
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next event, or `None` once the source stops delivering.
    pub async fn next(&mut self) -> Option<LocationEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
        tracing::debug!("Released location subscription {}", self.id);
    }
}

/// In-process source that fans published events out to every subscriber.
pub struct BroadcastLocationSource {
    supported: bool,
    next_id: AtomicU64,
    subscribers: DashMap<SubscriptionId, mpsc::UnboundedSender<LocationEvent>>,
}

impl BroadcastLocationSource {
    pub fn new() -> Self {
        Self {
            supported: true,
            next_id: AtomicU64::new(1),
            subscribers: DashMap::new(),
        }
    }

    /// A source for an environment without location capability; every
    /// subscribe attempt fails with [`LocationError::Unsupported`].
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Delivers `event` to all live subscribers and returns how many received it.
    pub fn publish(&self, event: LocationEvent) -> usize {
        self.subscribers
            .retain(|_, sender| sender.send(event.clone()).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for BroadcastLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationSource for BroadcastLocationSource {
    fn subscribe(
        &self,
    ) -> Result<(SubscriptionId, mpsc::UnboundedReceiver<LocationEvent>), LocationError> {
        if !self.supported {
            return Err(LocationError::Unsupported);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.insert(id, sender);
        Ok((id, receiver))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }
}
