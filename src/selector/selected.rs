use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{Identity, Selection, Subscription};
use crate::store::Store;

/// A consumer's live view of one selector.
///
/// Caches the latest selected value and counts how many times it changed,
/// which is how many times a UI bound to it would have to refresh.
///
/// ```
/// use larder::Store;
///
/// #[derive(Clone)]
/// struct State {
///     count: i32,
///     label: &'static str,
/// }
///
/// let store = Store::new(State { count: 0, label: "a" });
/// let count = store.select(|s: &State| s.count);
///
/// store.update(|s| s.label = "b");
/// assert_eq!(count.changes(), 0);
///
/// store.update(|s| s.count = 5);
/// assert_eq!(count.get(), 5);
/// assert_eq!(count.changes(), 1);
/// ```
pub struct Selected<T> {
    value: Arc<RwLock<T>>,
    changes: Arc<AtomicUsize>,
    subscription: Subscription,
}

impl<T> Selected<T>
where
    T: Identity + Clone + Send + Sync + 'static,
{
    pub(crate) fn new<S, Sel>(store: &Store<S>, selector: Sel) -> Self
    where
        S: Clone + Send + Sync + 'static,
        Sel: Fn(&S) -> T + Send + Sync + 'static,
    {
        let value = Arc::new(RwLock::new(store.read(&selector)));
        let changes = Arc::new(AtomicUsize::new(0));

        let on_change = {
            let value = Arc::clone(&value);
            let changes = Arc::clone(&changes);
            move |next: &T| {
                *value.write() = next.clone();
                changes.fetch_add(1, Ordering::SeqCst);
            }
        };
        // Refill the cache from the snapshot the selection starts from, so a
        // commit landing before registration cannot leave the two apart.
        let selection = store.register(|state, version| {
            let initial = selector(&**state);
            *value.write() = initial.clone();
            Selection::new(selector, T::same, on_change, initial, version)
        });
        let subscription = Subscription::new(selection);

        Self {
            value,
            changes,
            subscription,
        }
    }

    /// Current selected value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Read the value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    /// How many change notifications this view has received.
    pub fn changes(&self) -> usize {
        self.changes.load(Ordering::SeqCst)
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}
