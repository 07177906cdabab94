//! Fan-out of the ranked set to subscribed observers.
//!
//! Each observer gets its own bounded channel; `publish` uses `try_send`,
//! so a slow or unreachable observer can never stall delivery to the rest —
//! it is dropped instead. New subscribers receive the most recently
//! published set immediately, so there is no empty-state flash while
//! waiting for the next cycle.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::RankedSet;

/// Per-observer buffer. An observer this many pushes behind is considered
/// stalled and gets disconnected on the next publish.
const OBSERVER_CHANNEL_CAPACITY: usize = 16;

/// Handle identifying one observer's subscription.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
}

struct Observer {
    subscription: Subscription,
    tx: mpsc::Sender<Arc<RankedSet>>,
}

struct Inner {
    observers: HashMap<Uuid, Observer>,
    latest: Arc<RankedSet>,
}

pub struct Distributor {
    inner: RwLock<Inner>,
}

impl Default for Distributor {
    fn default() -> Self {
        Self::new()
    }
}

impl Distributor {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                observers: HashMap::new(),
                latest: Arc::new(RankedSet::empty()),
            }),
        }
    }

    /// Register an observer and hand back its receive side.
    ///
    /// The latest published set is already queued on the receiver when this
    /// returns (the empty set if no cycle has run yet).
    pub async fn subscribe(&self) -> (Subscription, mpsc::Receiver<Arc<RankedSet>>) {
        let (tx, rx) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);
        let subscription = Subscription {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        // Freshly created channel — this cannot be full.
        let _ = tx.try_send(inner.latest.clone());
        inner.observers.insert(
            subscription.id,
            Observer {
                subscription: subscription.clone(),
                tx,
            },
        );
        debug!(observer = %subscription.id, total = inner.observers.len(), "Observer subscribed");

        (subscription, rx)
    }

    /// Remove a subscription, releasing its resources immediately.
    /// Returns whether it was still registered.
    pub async fn unsubscribe(&self, id: Uuid) -> bool {
        let mut inner = self.inner.write().await;
        let removed = inner.observers.remove(&id).is_some();
        if removed {
            debug!(observer = %id, total = inner.observers.len(), "Observer unsubscribed");
        }
        removed
    }

    /// Push `set` to every live observer, best-effort and isolated per
    /// observer. Returns the number of observers delivered to.
    pub async fn publish(&self, set: Arc<RankedSet>) -> usize {
        let mut inner = self.inner.write().await;
        inner.latest = set.clone();

        let mut delivered = 0;
        inner.observers.retain(|id, observer| {
            match observer.tx.try_send(set.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        observer = %id,
                        connected_at = %observer.subscription.connected_at,
                        "Observer stalled — dropping subscription"
                    );
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(observer = %id, "Observer gone — dropping subscription");
                    false
                }
            }
        });

        delivered
    }

    /// Current number of live subscriptions.
    pub async fn observer_count(&self) -> usize {
        self.inner.read().await.observers.len()
    }

    /// The most recently published set.
    pub async fn latest(&self) -> Arc<RankedSet> {
        self.inner.read().await.latest.clone()
    }
}
