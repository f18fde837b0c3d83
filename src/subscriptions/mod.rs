//! Live notifications for list mutations.
//!
//! The store broadcasts a [`ListEvent`] after every successful mutation so a
//! presentation layer can re-render without being coupled to the store.

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, ListEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
