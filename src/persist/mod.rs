//! Durable state.
//!
//! Persistence is an ordinary subscriber: it selects the subset of a store
//! that should survive restarts and writes it to a [`Storage`] whenever that
//! subset changes.

mod persist;
mod storage;

pub use persist::{clear_persisted, persist, PersistOptions};
pub use storage::{FileStorage, MemoryStorage, Storage};
