//! Subscriptions with an action in flight.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

use log::debug;

use crate::entity::SubscriptionId;

/// Tracks the subscriptions an action is running on.
///
/// Cloning shares the marker. Each id is held by at most one action at a time.
#[derive(Clone, Default)]
pub struct BusyMarker {
    ids: Arc<Mutex<HashSet<SubscriptionId>>>,
}

impl BusyMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Busy ids in ascending order.
    pub fn busy_ids(&self) -> Vec<SubscriptionId> {
        let mut ids: Vec<_> = self
            .ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_busy(&self, id: SubscriptionId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&id)
    }

    pub fn is_idle(&self) -> bool {
        self.ids.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    /// Marks `id` busy until the returned guard is dropped.
    ///
    /// Returns `None` when `id` is already busy.
    pub fn acquire(&self, id: SubscriptionId) -> Option<BusyGuard> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(id) {
            return None;
        }
        debug!("Subscription {id} marked busy");
        Some(BusyGuard {
            marker: self.clone(),
            id,
        })
    }
}

/// Releases its id on drop, whatever the outcome of the action.
pub struct BusyGuard {
    marker: BusyMarker,
    id: SubscriptionId,
}

impl BusyGuard {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut ids = self.marker.ids.lock().unwrap_or_else(|e| e.into_inner());
        if ids.remove(&self.id) {
            debug!("Subscription {} no longer busy", self.id);
        }
    }
}
