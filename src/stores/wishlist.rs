use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::persist::{persist, PersistOptions, Storage};
use crate::selector::Subscription;
use crate::store::Store;

/// Storage key for the persisted wishlist.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

/// Product ids the user marked, in the order they were added.
///
/// `item_ids` is replaced with a new `Arc` on every change and left alone
/// otherwise, so a subscription on it fires exactly when membership changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    pub item_ids: Arc<Vec<u64>>,
}

impl WishlistState {
    pub fn contains(&self, id: u64) -> bool {
        self.item_ids.contains(&id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWishlist {
    pub item_ids: Vec<u64>,
}

#[derive(Debug, Clone)]
pub struct WishlistStore {
    store: Store<WishlistState>,
}

impl WishlistStore {
    pub fn new() -> Self {
        Self {
            store: Store::named("wishlist", WishlistState::default()),
        }
    }

    pub fn store(&self) -> &Store<WishlistState> {
        &self.store
    }

    pub fn item_ids(&self) -> Arc<Vec<u64>> {
        self.store.read(|s| Arc::clone(&s.item_ids))
    }

    pub fn is_in_wishlist(&self, id: u64) -> bool {
        self.store.read(|s| s.contains(id))
    }

    pub fn count(&self) -> usize {
        self.store.read(|s| s.item_ids.len())
    }

    pub fn add_to_wishlist(&self, id: u64) {
        self.store.dispatch("wishlist/add", |s| {
            if !s.contains(id) {
                s.item_ids = Arc::new(with_item(&s.item_ids, id));
            }
        });
    }

    pub fn remove_from_wishlist(&self, id: u64) {
        self.store.dispatch("wishlist/remove", |s| {
            if s.contains(id) {
                s.item_ids = Arc::new(without_item(&s.item_ids, id));
            }
        });
    }

    pub fn toggle_wishlist(&self, id: u64) {
        self.store.dispatch("wishlist/toggle", |s| {
            let next = if s.contains(id) {
                without_item(&s.item_ids, id)
            } else {
                with_item(&s.item_ids, id)
            };
            s.item_ids = Arc::new(next);
        });
    }

    pub fn clear_wishlist(&self) {
        self.store.dispatch("wishlist/clear", |s| {
            if !s.item_ids.is_empty() {
                s.item_ids = Arc::new(Vec::new());
            }
        });
    }

    /// Restore the wishlist from `storage` and keep it written back.
    pub fn persist(&self, storage: Arc<dyn Storage>, version: u32) -> Result<Subscription> {
        persist(
            &self.store,
            storage,
            PersistOptions::new(WISHLIST_STORAGE_KEY).version(version),
            |s: &WishlistState| PersistedWishlist {
                item_ids: s.item_ids.to_vec(),
            },
            |s, p| s.item_ids = Arc::new(p.item_ids),
        )
    }
}

impl Default for WishlistStore {
    fn default() -> Self {
        Self::new()
    }
}

fn with_item(ids: &[u64], id: u64) -> Vec<u64> {
    let mut next = Vec::with_capacity(ids.len() + 1);
    next.extend_from_slice(ids);
    next.push(id);
    next
}

fn without_item(ids: &[u64], id: u64) -> Vec<u64> {
    ids.iter().copied().filter(|&i| i != id).collect()
}
