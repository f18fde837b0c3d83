//! Main GroceryStore struct tying all components together.

use crate::error::{Result, StoreError};
use crate::storage::ListStorage;
use crate::subscriptions::{
    ListEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Item, ItemId, ListStats, StoreLabel, Timestamp};
use crate::views::{self, Favorite, Filter, StoreSection, Suggestion};
use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Filename used for user-facing backups.
pub const BACKUP_FILE_NAME: &str = "family-grocery-backup.json";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base path for the store.
    pub path: PathBuf,

    /// Whether to create the store if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./grocery"),
            create_if_missing: true,
        }
    }
}

/// The grocery list store.
///
/// Owns the item collection, persists the whole collection to a single
/// durable key after every mutation, and notifies subscribers so a
/// presentation layer can re-render. Derived views (grouped lists,
/// suggestions, favorites) are computed on demand and never mutate.
pub struct GroceryStore {
    /// Store configuration.
    config: StoreConfig,

    /// Lock file for exclusive access.
    _lock_file: File,

    /// Durable single-key storage.
    storage: ListStorage,

    /// The item collection, in insertion order.
    items: RwLock<Vec<Item>>,

    /// Subscription manager.
    subscriptions: SubscriptionManager,

    /// Lock serializing mutate-persist-notify sequences.
    write_lock: Mutex<()>,
}

impl GroceryStore {
    /// Open an existing store or create a new one.
    pub fn open_or_create(config: StoreConfig) -> Result<Self> {
        if config.path.exists() {
            Self::open(config)
        } else if config.create_if_missing {
            Self::create(config)
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    /// Create a new store.
    pub fn create(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)?;
        Self::init(config)
    }

    /// Open an existing store.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.path.exists() {
            return Err(StoreError::NotInitialized);
        }
        Self::init(config)
    }

    fn init(config: StoreConfig) -> Result<Self> {
        let lock_file = Self::acquire_lock(&config.path)?;
        let storage = ListStorage::new(&config.path)?;

        // Missing or malformed data yields an empty collection.
        let items = storage.load()?;
        tracing::debug!(items = items.len(), path = %config.path.display(), "opened store");

        Ok(Self {
            config,
            _lock_file: lock_file,
            storage,
            items: RwLock::new(items),
            subscriptions: SubscriptionManager::new(),
            write_lock: Mutex::new(()),
        })
    }

    // --- Mutations ---
    //
    // Every mutation persists the full collection, then notifies
    // subscribers. A mutation that matched nothing persists but emits no
    // event.

    /// Add an item to the list.
    ///
    /// The name is trimmed; a blank name is a silent no-op returning `None`.
    /// Quantity is clamped to at least 1. New items start needed, with no
    /// purchase history.
    pub fn add(&self, name: &str, qty: u32, store: StoreLabel) -> Result<Option<Item>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let _lock = self.write_lock.lock();

        let item = Item::new(name, qty.max(1), store);
        {
            let mut items = self.items.write();
            items.push(item.clone());
            self.storage.save(&items)?;
        }

        tracing::debug!(id = %item.id, name = %item.name, store = %item.store, "added item");
        self.subscriptions.broadcast(ListEvent::ItemAdded { item: item.clone() });

        Ok(Some(item))
    }

    /// Quick-add a remembered favorite to a store. Always quantity 1.
    pub fn quick_add(&self, name: &str, store: StoreLabel) -> Result<Option<Item>> {
        self.add(name, 1, store)
    }

    /// Mark an item purchased: no longer needed, purchase count bumped,
    /// purchase time recorded. Unknown ids are a silent no-op.
    pub fn mark_purchased(&self, id: &ItemId) -> Result<bool> {
        let _lock = self.write_lock.lock();

        let event = {
            let mut items = self.items.write();
            let event = items.iter_mut().find(|it| &it.id == id).map(|it| {
                let at = Timestamp::now();
                it.needed = false;
                it.purchase_count += 1;
                it.last_purchased_at = Some(at);
                ListEvent::ItemPurchased {
                    id: it.id.clone(),
                    store: it.store,
                    purchase_count: it.purchase_count,
                    at,
                }
            });
            self.storage.save(&items)?;
            event
        };

        Ok(self.notify(event))
    }

    /// Set an item's quantity, clamped to at least 1. Unknown ids are a
    /// silent no-op.
    pub fn set_qty(&self, id: &ItemId, qty: u32) -> Result<bool> {
        let _lock = self.write_lock.lock();

        let event = {
            let mut items = self.items.write();
            let event = items.iter_mut().find(|it| &it.id == id).map(|it| {
                it.qty = qty.max(1);
                ListEvent::QtyChanged {
                    id: it.id.clone(),
                    store: it.store,
                    qty: it.qty,
                }
            });
            self.storage.save(&items)?;
            event
        };

        Ok(self.notify(event))
    }

    /// Flip an item's needed flag. Unknown ids are a silent no-op.
    pub fn toggle_needed(&self, id: &ItemId) -> Result<bool> {
        let _lock = self.write_lock.lock();

        let event = {
            let mut items = self.items.write();
            let event = items.iter_mut().find(|it| &it.id == id).map(|it| {
                it.needed = !it.needed;
                ListEvent::NeededToggled {
                    id: it.id.clone(),
                    store: it.store,
                    needed: it.needed,
                }
            });
            self.storage.save(&items)?;
            event
        };

        Ok(self.notify(event))
    }

    /// Delete an item. Unknown ids are a silent no-op.
    pub fn remove(&self, id: &ItemId) -> Result<bool> {
        let _lock = self.write_lock.lock();

        let event = {
            let mut items = self.items.write();
            let event = items
                .iter()
                .find(|it| &it.id == id)
                .map(|it| ListEvent::ItemRemoved {
                    id: it.id.clone(),
                    store: it.store,
                });
            items.retain(|it| &it.id != id);
            self.storage.save(&items)?;
            event
        };

        Ok(self.notify(event))
    }

    /// Remove every purchased item, preserving the relative order of the
    /// rest. Returns how many items were removed.
    pub fn clear_purchased(&self) -> Result<usize> {
        let _lock = self.write_lock.lock();

        let removed = {
            let mut items = self.items.write();
            let before = items.len();
            items.retain(|it| it.needed);
            let removed = before - items.len();
            self.storage.save(&items)?;
            removed
        };

        if removed > 0 {
            tracing::debug!(removed, "cleared purchased items");
            self.subscriptions
                .broadcast(ListEvent::PurchasedCleared { removed });
        }
        Ok(removed)
    }

    /// Mark every item needed again. Purchase history is untouched. Returns
    /// how many items changed.
    pub fn mark_all_needed(&self) -> Result<usize> {
        let _lock = self.write_lock.lock();

        let updated = {
            let mut items = self.items.write();
            let mut updated = 0;
            for it in items.iter_mut() {
                if !it.needed {
                    it.needed = true;
                    updated += 1;
                }
            }
            self.storage.save(&items)?;
            updated
        };

        if updated > 0 {
            self.subscriptions
                .broadcast(ListEvent::AllMarkedNeeded { updated });
        }
        Ok(updated)
    }

    /// Persist the full collection to the durable key.
    ///
    /// Mutations already persist; this is for callers that want an explicit
    /// write, e.g. before shutdown.
    pub fn persist(&self) -> Result<()> {
        let _lock = self.write_lock.lock();
        self.storage.save(&self.items.read())
    }

    fn notify(&self, event: Option<ListEvent>) -> bool {
        match event {
            Some(event) => {
                self.subscriptions.broadcast(event);
                true
            }
            None => false,
        }
    }

    // --- Read Surface ---

    /// Snapshot of the collection, in insertion order.
    pub fn items(&self) -> Vec<Item> {
        self.items.read().clone()
    }

    /// Look up a single item.
    pub fn get_item(&self, id: &ItemId) -> Option<Item> {
        self.items.read().iter().find(|it| &it.id == id).cloned()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Store statistics.
    pub fn stats(&self) -> ListStats {
        let items = self.items.read();
        let needed_count = items.iter().filter(|it| it.needed).count();
        ListStats {
            item_count: items.len(),
            needed_count,
            purchased_count: items.len() - needed_count,
            favorite_count: views::favorites(&items).len(),
            storage_bytes: self.storage.size(),
        }
    }

    // --- Derived Views ---

    /// Per-store sections under the given filter. See [`views::grouped_lists`].
    pub fn grouped_lists(&self, filter: Filter) -> Vec<StoreSection> {
        views::grouped_lists(&self.items.read(), filter)
    }

    /// Quick-fill name suggestions. See [`views::suggestions`].
    pub fn suggestions(&self) -> Vec<Suggestion> {
        views::suggestions(&self.items.read())
    }

    /// Remembered favorites. See [`views::favorites`].
    pub fn favorites(&self) -> Vec<Favorite> {
        views::favorites(&self.items.read())
    }

    // --- Export ---

    /// Serialize the full collection to a pretty-printed JSON document.
    pub fn export_snapshot(&self) -> Result<String> {
        let items = self.items.read();
        Ok(serde_json::to_string_pretty(&*items)?)
    }

    /// Write the snapshot to `family-grocery-backup.json` under `dir`,
    /// returning the path written.
    pub fn write_backup(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(BACKUP_FILE_NAME);
        fs::write(&path, self.export_snapshot()?)?;
        Ok(path)
    }

    // --- Subscriptions ---

    /// Subscribe to list events.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Unsubscribe.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id)
    }

    /// Get the store path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    // --- Private Helpers ---

    fn acquire_lock(path: &Path) -> Result<File> {
        fs::create_dir_all(path)?;

        let lock_path = path.join("LOCK");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }
}
