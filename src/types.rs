//! Core types for the grocery store.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter feeding id generation; distinct per call within a process.
static NEXT_ID_SEED: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an item.
///
/// Opaque short hex string, assigned at creation and never changed.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Generate a fresh id.
    ///
    /// Hashes a monotonic counter together with the wall clock and keeps the
    /// first 8 hex characters.
    pub fn generate() -> Self {
        let seed = NEXT_ID_SEED.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(nanos.to_le_bytes());
        let digest = hasher.finalize();

        ItemId(hex::encode(&digest[0..4]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_millis() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// The fixed store vocabulary. `Other` is the catch-all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreLabel {
    Walmart,
    #[serde(rename = "Sam's Club")]
    SamsClub,
    Costco,
    Other,
}

impl StoreLabel {
    /// All labels, in display order.
    pub const ALL: [StoreLabel; 4] = [
        StoreLabel::Walmart,
        StoreLabel::SamsClub,
        StoreLabel::Costco,
        StoreLabel::Other,
    ];

    /// The label as it appears in persisted data and in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreLabel::Walmart => "Walmart",
            StoreLabel::SamsClub => "Sam's Club",
            StoreLabel::Costco => "Costco",
            StoreLabel::Other => "Other",
        }
    }

    /// Parse a label string. Anything outside the fixed vocabulary maps to
    /// `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Walmart" => StoreLabel::Walmart,
            "Sam's Club" => StoreLabel::SamsClub,
            "Costco" => StoreLabel::Costco,
            _ => StoreLabel::Other,
        }
    }
}

impl fmt::Display for StoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single grocery item.
///
/// Serialized camelCase so the durable key stays field-compatible with the
/// original localStorage format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (assigned at creation).
    pub id: ItemId,

    /// User-entered name, trimmed, non-empty.
    pub name: String,

    /// Quantity to buy, always >= 1.
    pub qty: u32,

    /// Which store this item belongs to.
    pub store: StoreLabel,

    /// True while the item is still to buy.
    pub needed: bool,

    /// How many times the item has been marked purchased.
    pub purchase_count: u32,

    /// When the item was last marked purchased.
    pub last_purchased_at: Option<Timestamp>,
}

impl Item {
    /// Construct a fresh item. Callers are expected to have trimmed the name
    /// and clamped the quantity.
    pub fn new(name: impl Into<String>, qty: u32, store: StoreLabel) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            qty,
            store,
            needed: true,
            purchase_count: 0,
            last_purchased_at: None,
        }
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default)]
pub struct ListStats {
    pub item_count: usize,
    pub needed_count: usize,
    pub purchased_count: usize,
    pub favorite_count: usize,
    pub storage_bytes: u64,
}
