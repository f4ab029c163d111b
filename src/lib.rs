//! # Larder
//!
//! Application state stores with selector-scoped subscriptions.
//!
//! ## Stores
//!
//! A [`Store<S>`] owns one slice of state and changes it only through named
//! actions. Each action commits a new immutable snapshot built by
//! shallow-cloning the previous one, so untouched fields (and the `Arc`s
//! inside them) carry over as they were.
//!
//! ## Selectors
//!
//! Consumers subscribe to a *derived* value:
//!
//! - [`Store::subscribe`] - call back when the selected value changes
//! - [`Store::select`] - keep a cached [`Selected<T>`] view
//! - [`Identity`] - value equality for scalars, pointer identity for `Arc`s
//!
//! A change to one field never notifies a subscription that selects another.
//!
//! ## Around the stores
//!
//! - [`resource`] - `Idle / Loading / Success / Error` state for async fetches
//! - [`persist`] - write a chosen subset of a store to durable storage
//! - [`devtools`] - report every action and its resulting state
//! - [`stores`] and [`app`] - the counter, auth, product and wishlist stores
//!
//! ```
//! use larder::stores::{AuthStore, UserProfile};
//!
//! let auth = AuthStore::new();
//! let logged_in = auth.store().select(|s| s.is_logged_in);
//!
//! auth.login(UserProfile::new("John Doe", "john.doe@example.com"));
//! assert!(logged_in.get());
//! assert_eq!(logged_in.changes(), 1);
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod devtools;
pub mod error;
pub mod persist;
pub mod resource;
pub mod selector;
pub mod store;
pub mod stores;

// Re-export main types for convenience
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{Error, FetchError, Result};
pub use resource::Resource;
pub use selector::{Identity, Selected, Subscription};
pub use store::{ActionObserver, Store};
