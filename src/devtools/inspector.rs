use parking_lot::Mutex;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::{ActionObserver, Store};

/// One action as seen by an inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    pub store: String,
    pub action: String,
    pub state: serde_json::Value,
}

/// Devtools-style sink for action records. Write-only from the store's point
/// of view.
pub trait Inspector: Send + Sync {
    fn record(&self, entry: &ActionRecord);
}

/// Logs every action through `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInspector;

impl Inspector for TracingInspector {
    fn record(&self, entry: &ActionRecord) {
        debug!(
            target: "larder::devtools",
            store = %entry.store,
            action = %entry.action,
            state = %entry.state,
            "action"
        );
    }
}

/// Keeps records in memory, oldest first.
#[derive(Debug, Default)]
pub struct RecordingInspector {
    records: Mutex<Vec<ActionRecord>>,
}

impl RecordingInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ActionRecord> {
        self.records.lock().clone()
    }

    /// Labels of the recorded actions, in order.
    pub fn actions(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.action.clone()).collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Inspector for RecordingInspector {
    fn record(&self, entry: &ActionRecord) {
        self.records.lock().push(entry.clone());
    }
}

struct Bridge<S> {
    inspector: Arc<dyn Inspector>,
    _state: PhantomData<fn(&S)>,
}

impl<S: Serialize> ActionObserver<S> for Bridge<S> {
    fn on_action(&self, store: &str, action: &str, state: &S) {
        match serde_json::to_value(state) {
            Ok(state) => self.inspector.record(&ActionRecord {
                store: store.to_string(),
                action: action.to_string(),
                state,
            }),
            Err(e) => warn!(store, action, error = %e, "state is not serializable"),
        }
    }
}

/// Report every action on `store` to `inspector`.
pub fn devtools<S>(store: &Store<S>, inspector: Arc<dyn Inspector>)
where
    S: Serialize + Clone + Send + Sync + 'static,
{
    store.observe(Arc::new(Bridge {
        inspector,
        _state: PhantomData,
    }));
}
