//! Subscription manager for broadcasting list events.

use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{
    DropReason, ListEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<ListEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if buffer is full (subscriber will be dropped).
    fn try_send(&self, event: ListEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    /// Check if this subscription wants an event.
    fn matches(&self, event: &ListEvent) -> bool {
        let filter: &SubscriptionFilter = &self.config.filter;

        if event.is_bulk() {
            return filter.include_bulk_events;
        }

        if !filter.include_item_events {
            return false;
        }

        match (&filter.stores, event.store()) {
            (Some(stores), Some(store)) => stores.contains(&store),
            _ => true,
        }
    }
}

/// Manages subscriptions and broadcasts events.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription, returning a handle for receiving events.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        let subscription = Subscription { config, sender };

        self.subscriptions.write().insert(id, subscription);

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Send dropped event (best effort)
            let _ = sub.sender.try_send(ListEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Broadcast an event to matching subscriptions. Subscribers that fail to
    /// receive are dropped.
    pub fn broadcast(&self, event: ListEvent) {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if sub.matches(&event) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        // Remove dropped subscriptions
        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    // Try to notify about the drop (might fail, that's ok)
                    let _ = sub.sender.try_send(ListEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Item, StoreLabel};
    use std::time::Duration;

    fn added(name: &str, store: StoreLabel) -> ListEvent {
        ListEvent::ItemAdded {
            item: Item::new(name, 1, store),
        }
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager = SubscriptionManager::new();

        let handle = manager.subscribe(SubscriptionConfig::default());
        assert_eq!(manager.subscription_count(), 1);

        manager.unsubscribe(handle.id);
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_broadcast_to_matching() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::stores(vec![StoreLabel::Costco]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast(added("Milk", StoreLabel::Costco));

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        match event {
            ListEvent::ItemAdded { item } => assert_eq!(item.store, StoreLabel::Costco),
            _ => panic!("Expected ItemAdded event, got {:?}", event),
        }
    }

    #[test]
    fn test_broadcast_filters_non_matching() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::stores(vec![StoreLabel::Costco]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast(added("Bread", StoreLabel::Walmart));

        let result = handle.recv_timeout(Duration::from_millis(50));
        assert!(result.is_err());
    }

    #[test]
    fn test_bulk_events_need_bulk_filter() {
        let manager = SubscriptionManager::new();

        let items_only = manager.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::items(),
            ..Default::default()
        });
        let bulk_only = manager.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::bulk(),
            ..Default::default()
        });

        manager.broadcast(ListEvent::PurchasedCleared { removed: 3 });

        assert!(items_only.recv_timeout(Duration::from_millis(50)).is_err());
        let event = bulk_only.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(event, ListEvent::PurchasedCleared { removed: 3 }));
    }

    #[test]
    fn test_drop_slow_subscriber() {
        // Small buffer
        let manager = SubscriptionManager::new();
        let config = SubscriptionConfig {
            buffer_size: 2,
            filter: SubscriptionFilter::all(),
        };
        let _handle = manager.subscribe(config);

        // Flood with events
        for i in 0..10 {
            manager.broadcast(added(&format!("item{}", i), StoreLabel::Other));
        }

        // Subscriber should be dropped
        assert_eq!(manager.subscription_count(), 0);
    }
}
