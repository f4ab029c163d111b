//! State containers.
//!
//! A [`Store`] owns one slice of application state. State only changes
//! through the store's own actions, each of which commits a new snapshot and
//! then broadcasts it to the store's subscriptions.

mod store;

pub use store::{ActionObserver, Store, ANONYMOUS_ACTION};

pub(crate) use store::Listener;
