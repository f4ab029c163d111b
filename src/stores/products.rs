use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{Product, ProductApi};
use crate::resource::{RequestToken, RequestTracker, Resource};
use crate::store::Store;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductState {
    pub products: Resource<Arc<Vec<Product>>>,
    pub current_product: Resource<Arc<Product>>,
}

/// A response that arrived after its request was superseded or cleared.
struct Superseded;

/// Product list and product detail, both fetched from a [`ProductApi`].
///
/// Each fetch runs `pending → fulfilled | rejected`. Failures are stored as
/// [`Resource::Error`] and never returned. If a fetch is started again, or
/// the resource is cleared, before an earlier one answers, the earlier answer
/// is dropped.
pub struct ProductStore<A> {
    store: Store<ProductState>,
    api: Arc<A>,
    list_requests: Arc<RequestTracker>,
    detail_requests: Arc<RequestTracker>,
}

impl<A: ProductApi> ProductStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            store: Store::named("products", ProductState::default()),
            api,
            list_requests: Arc::new(RequestTracker::new()),
            detail_requests: Arc::new(RequestTracker::new()),
        }
    }

    pub fn store(&self) -> &Store<ProductState> {
        &self.store
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Loaded products, or the stale list while a refresh is in flight.
    pub fn products(&self) -> Option<Arc<Vec<Product>>> {
        self.store.read(|s| s.products.data().cloned())
    }

    pub fn current_product(&self) -> Option<Arc<Product>> {
        self.store.read(|s| s.current_product.data().cloned())
    }

    pub async fn fetch_products(&self) {
        let token = self.store.dispatch("products/fetchProducts/pending", |s| {
            s.products = std::mem::take(&mut s.products).start();
            self.list_requests.begin()
        });

        let result = self.api.fetch_products().await;
        let (label, next) = match result {
            Ok(items) => ("products/fetchProducts/fulfilled", Resource::succeed(Arc::new(items))),
            Err(e) => {
                warn!(error = %e, "fetching products failed");
                ("products/fetchProducts/rejected", Resource::fail(e.to_string()))
            }
        };
        self.resolve(&self.list_requests, token, label, |s| s.products = next);
    }

    pub async fn fetch_product_by_id(&self, id: &str) {
        let token = self.store.dispatch("products/fetchProductById/pending", |s| {
            s.current_product = std::mem::take(&mut s.current_product).start();
            self.detail_requests.begin()
        });

        let result = self.api.fetch_product(id).await;
        let (label, next) = match result {
            Ok(product) => (
                "products/fetchProductById/fulfilled",
                Resource::succeed(Arc::new(product)),
            ),
            Err(e) => {
                warn!(%id, error = %e, "fetching product failed");
                ("products/fetchProductById/rejected", Resource::fail(e.to_string()))
            }
        };
        self.resolve(&self.detail_requests, token, label, |s| s.current_product = next);
    }

    /// Back to `Idle`. Any fetch still in flight will be ignored.
    pub fn clear_products(&self) {
        self.store.dispatch("products/clearProducts", |s| {
            self.list_requests.invalidate();
            s.products = Resource::Idle;
        });
    }

    pub fn clear_current_product(&self) {
        self.store.dispatch("products/clearCurrentProduct", |s| {
            self.detail_requests.invalidate();
            s.current_product = Resource::Idle;
        });
    }

    // Tokens are issued, invalidated and checked only under the store's
    // writer lock, each together with the commit it belongs to. The last
    // `Loading` committed therefore always belongs to the current token.
    fn resolve<F>(&self, tracker: &RequestTracker, token: RequestToken, label: &str, apply: F)
    where
        F: FnOnce(&mut ProductState),
    {
        let applied = self.store.try_dispatch(label, |s| {
            if !tracker.is_current(token) {
                return Err(Superseded);
            }
            apply(s);
            Ok(())
        });
        if applied.is_err() {
            debug!(action = label, "discarded superseded response");
        }
    }
}

impl<A> Clone for ProductStore<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            api: Arc::clone(&self.api),
            list_requests: Arc::clone(&self.list_requests),
            detail_requests: Arc::clone(&self.detail_requests),
        }
    }
}
