//! The application's stores.
//!
//! Each wraps a [`Store`](crate::Store) with a typed state and named
//! actions. Action labels are `"<store>/<action>"`; async actions report
//! `/pending`, `/fulfilled` and `/rejected` steps.

mod auth;
mod counter;
mod products;
mod wishlist;

pub use auth::{AuthState, AuthStore, PersistedAuth, UserProfile, AUTH_STORAGE_KEY};
pub use counter::{CounterState, CounterStore};
pub use products::{ProductState, ProductStore};
pub use wishlist::{PersistedWishlist, WishlistState, WishlistStore, WISHLIST_STORAGE_KEY};
