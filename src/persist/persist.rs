use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::Storage;
use crate::error::Result;
use crate::selector::Subscription;
use crate::store::Store;

/// Where and how a store's persisted subset is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOptions {
    /// Storage key, e.g. `"auth-storage"`.
    pub name: String,
    /// Schema version written alongside the data. Stored data with a
    /// different version is ignored on load.
    pub version: u32,
}

impl PersistOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 0,
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<P> {
    state: P,
    version: u32,
}

/// Make part of a store durable.
///
/// First loads `options.name` from `storage` and, if it holds data written
/// with the same version, applies it with `merge` as the action
/// `"<store>/hydrate"`. Call this before any consumer subscribes so that
/// nobody observes the pre-hydration state.
///
/// Then subscribes with `partialize` as the selector: whenever the persisted
/// subset changes (by value), it is written back. Write failures are logged
/// and otherwise ignored; the in-memory state stays authoritative.
///
/// Keep the returned subscription alive for as long as the store should be
/// persisted.
pub fn persist<S, P, Part, Merge>(
    store: &Store<S>,
    storage: Arc<dyn Storage>,
    options: PersistOptions,
    partialize: Part,
    merge: Merge,
) -> Result<Subscription>
where
    S: Clone + Send + Sync + 'static,
    P: Serialize + DeserializeOwned + PartialEq + Clone + Send + 'static,
    Part: Fn(&S) -> P + Send + Sync + 'static,
    Merge: FnOnce(&mut S, P),
{
    if let Some(persisted) = load::<P>(storage.as_ref(), &options)? {
        store.dispatch(&format!("{}/hydrate", store.name()), |state| {
            merge(state, persisted)
        });
        info!(store = %store.name(), key = %options.name, "state hydrated");
    }

    let key = options.name;
    let version = options.version;
    let subscription = store.subscribe_with(
        partialize,
        |a: &P, b: &P| a == b,
        move |next: &P| {
            let written = serde_json::to_string(&Envelope {
                state: next,
                version,
            })
            .map_err(crate::error::Error::from)
            .and_then(|json| storage.set_item(&key, &json));
            if let Err(e) = written {
                warn!(%key, error = %e, "failed to persist state");
            }
        },
    );
    Ok(subscription)
}

fn load<P: DeserializeOwned>(storage: &dyn Storage, options: &PersistOptions) -> Result<Option<P>> {
    let Some(raw) = storage.get_item(&options.name)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Envelope<P>>(&raw) {
        Ok(envelope) if envelope.version == options.version => Ok(Some(envelope.state)),
        Ok(envelope) => {
            warn!(
                key = %options.name,
                stored = envelope.version,
                expected = options.version,
                "discarding persisted state with another version"
            );
            Ok(None)
        }
        Err(e) => {
            warn!(key = %options.name, error = %e, "discarding unreadable persisted state");
            Ok(None)
        }
    }
}

/// Forget whatever was persisted under `name`.
pub fn clear_persisted(storage: &dyn Storage, name: &str) -> Result<()> {
    storage.remove_item(name)
}
