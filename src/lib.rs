//! # Grocery Store
//!
//! A persistent grocery list: an owned item collection that rewrites a
//! single durable JSON key after every mutation, with pure derived views
//! layered on top.
//!
//! ## Core Concepts
//!
//! - **Items**: Name, quantity, target store, needed flag, purchase history
//! - **Views**: Store-grouped/filtered lists, suggestions, favorites
//! - **Subscriptions**: Events after each mutation, for re-rendering
//!
//! ## Example
//!
//! ```ignore
//! use grocer::{Filter, GroceryStore, StoreConfig, StoreLabel};
//!
//! let store = GroceryStore::open_or_create(StoreConfig {
//!     path: "./my-list".into(),
//!     ..Default::default()
//! })?;
//!
//! // Add an item and buy it
//! let milk = store.add("Milk", 2, StoreLabel::Costco)?.unwrap();
//! store.mark_purchased(&milk.id)?;
//!
//! // Derive views
//! let sections = store.grouped_lists(Filter::All);
//! let hints = store.suggestions();
//! ```

pub mod error;
pub mod storage;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod views;

// Re-exports
pub use error::{Result, StoreError};
pub use storage::{ListStorage, STORAGE_KEY};
pub use store::{GroceryStore, StoreConfig, BACKUP_FILE_NAME};
pub use subscriptions::{
    DropReason, ListEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
pub use views::{
    favorites, grouped_lists, suggestions, Favorite, Filter, StoreSection, Suggestion,
    FAVORITE_LIMIT, SUGGESTION_LIMIT,
};
