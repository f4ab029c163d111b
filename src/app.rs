//! Application wiring.
//!
//! Stores are built once, here, and handed to consumers through the
//! [`AppContext`] rather than living in globals. Tests build a fresh context
//! per case.

use std::sync::Arc;
use tracing::info;

use crate::api::{HttpProductApi, Product, ProductApi};
use crate::config::AppConfig;
use crate::devtools::{devtools, Inspector, TracingInspector};
use crate::error::Result;
use crate::persist::{FileStorage, MemoryStorage, Storage};
use crate::selector::Subscription;
use crate::stores::{AuthStore, CounterStore, ProductStore, WishlistStore};

pub struct AppContext<A> {
    pub counter: CounterStore,
    pub auth: AuthStore,
    pub products: ProductStore<A>,
    pub wishlist: WishlistStore,
    storage: Arc<dyn Storage>,
    _persistence: Vec<Subscription>,
}

impl AppContext<HttpProductApi> {
    /// Build the context described by `config`, talking to the real API.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let api = HttpProductApi::new(config.api_base_url.as_str())?
            .with_product_timeout(config.request_timeout());
        let storage: Arc<dyn Storage> = match &config.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir)),
            None => Arc::new(MemoryStorage::new()),
        };
        Self::with_parts(config, api, storage)
    }
}

impl<A: ProductApi> AppContext<A> {
    /// Build the context from explicit collaborators.
    ///
    /// Persisted stores are hydrated before this returns, so every consumer
    /// starts from the restored state.
    pub fn with_parts(config: &AppConfig, api: A, storage: Arc<dyn Storage>) -> Result<Self> {
        let counter = CounterStore::new();
        let auth = AuthStore::new();
        let products = ProductStore::new(Arc::new(api));
        let wishlist = WishlistStore::new();

        let persistence = vec![
            auth.persist(Arc::clone(&storage), config.persist_version)?,
            wishlist.persist(Arc::clone(&storage), config.persist_version)?,
        ];

        let context = Self {
            counter,
            auth,
            products,
            wishlist,
            storage,
            _persistence: persistence,
        };
        if config.devtools {
            context.attach_inspector(Arc::new(TracingInspector));
        }
        info!(
            logged_in = context.auth.is_logged_in(),
            wishlist = context.wishlist.count(),
            "application state ready"
        );
        Ok(context)
    }

    /// Report every action of every store to `inspector`.
    pub fn attach_inspector(&self, inspector: Arc<dyn Inspector>) {
        devtools(self.counter.store(), Arc::clone(&inspector));
        devtools(self.auth.store(), Arc::clone(&inspector));
        devtools(self.products.store(), Arc::clone(&inspector));
        devtools(self.wishlist.store(), inspector);
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Loaded products that are on the wishlist, in catalogue order.
    pub fn wishlist_products(&self) -> Vec<Product> {
        let Some(products) = self.products.products() else {
            return Vec::new();
        };
        let ids = self.wishlist.item_ids();
        products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect()
    }
}
