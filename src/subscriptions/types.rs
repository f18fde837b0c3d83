//! Subscription types for live list updates.

use crate::types::{Item, ItemId, StoreLabel, Timestamp};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Filter per-item events by store label (None = all stores).
    pub stores: Option<Vec<StoreLabel>>,

    /// Include per-item events (add, purchase, qty, toggle, remove).
    pub include_item_events: bool,

    /// Include bulk events (clear purchased, mark all needed).
    pub include_bulk_events: bool,
}

impl SubscriptionFilter {
    /// Subscribe to per-item events on every store.
    pub fn items() -> Self {
        Self {
            include_item_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to per-item events for specific stores.
    pub fn stores(stores: Vec<StoreLabel>) -> Self {
        Self {
            stores: Some(stores),
            include_item_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to bulk events only.
    pub fn bulk() -> Self {
        Self {
            include_bulk_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            include_item_events: true,
            include_bulk_events: true,
            ..Default::default()
        }
    }
}

/// Events broadcast after each successful mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListEvent {
    // --- Per-item Events ---
    /// A new item was added to the list.
    ItemAdded { item: Item },

    /// An item was marked purchased.
    ItemPurchased {
        id: ItemId,
        store: StoreLabel,
        purchase_count: u32,
        at: Timestamp,
    },

    /// An item's quantity was changed.
    QtyChanged {
        id: ItemId,
        store: StoreLabel,
        qty: u32,
    },

    /// An item's needed flag was flipped.
    NeededToggled {
        id: ItemId,
        store: StoreLabel,
        needed: bool,
    },

    /// An item was deleted.
    ItemRemoved { id: ItemId, store: StoreLabel },

    // --- Bulk Events ---
    /// All purchased items were removed.
    PurchasedCleared { removed: usize },

    /// Every item was marked needed again.
    AllMarkedNeeded { updated: usize },

    // --- Lifecycle Events ---
    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl ListEvent {
    /// The store a per-item event concerns, if any.
    pub fn store(&self) -> Option<StoreLabel> {
        match self {
            ListEvent::ItemAdded { item } => Some(item.store),
            ListEvent::ItemPurchased { store, .. }
            | ListEvent::QtyChanged { store, .. }
            | ListEvent::NeededToggled { store, .. }
            | ListEvent::ItemRemoved { store, .. } => Some(*store),
            _ => None,
        }
    }

    /// Whether this is a bulk (whole-collection) event.
    pub fn is_bulk(&self) -> bool {
        matches!(
            self,
            ListEvent::PurchasedCleared { .. } | ListEvent::AllMarkedNeeded { .. }
        )
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ListEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ListEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ListEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ListEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
