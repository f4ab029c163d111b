//! Selector-scoped subscriptions.
//!
//! A consumer registers a selector, a pure function from the full state to
//! the part it cares about, and is notified only when that part changes.
//! Changes elsewhere in the same store do not reach it.

mod identity;
mod selected;
mod selection;
mod subscription;

pub use identity::Identity;
pub use selected::Selected;
pub use subscription::Subscription;

pub(crate) use selection::{Selection, Watcher};
