use serde::Serialize;

use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterState {
    pub count: i64,
}

/// The simplest store: one number and three actions.
#[derive(Debug, Clone)]
pub struct CounterStore {
    store: Store<CounterState>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self {
            store: Store::named("counter", CounterState::default()),
        }
    }

    pub fn store(&self) -> &Store<CounterState> {
        &self.store
    }

    pub fn count(&self) -> i64 {
        self.store.read(|s| s.count)
    }

    pub fn increment(&self) {
        self.store.dispatch("counter/increment", |s| s.count += 1);
    }

    pub fn decrement(&self) {
        self.store.dispatch("counter/decrement", |s| s.count -= 1);
    }

    pub fn reset(&self) {
        self.store.dispatch("counter/reset", |s| s.count = 0);
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}
