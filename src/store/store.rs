use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::selector::{Identity, Selected, Selection, Subscription, Watcher};

/// Label reported for updates that were not given an action name.
pub const ANONYMOUS_ACTION: &str = "anonymous";

/// Receives every committed snapshot of a store, in commit order.
pub(crate) trait Listener<S>: Send + Sync {
    /// `version` increases by one per commit; listeners use it to ignore a
    /// snapshot older than one they already handled.
    fn notify(&self, state: &Arc<S>, version: u64);

    fn is_active(&self) -> bool;
}

/// Hook invoked after each committed action, once the broadcast is done.
///
/// Observers are passive: they get a read-only view of the resulting state
/// and the label of the action that produced it. Actions are reported in
/// commit order, including those dispatched by subscribers during a
/// broadcast. An observer must not dispatch on the store it observes.
pub trait ActionObserver<S>: Send + Sync {
    fn on_action(&self, store: &str, action: &str, state: &S);
}

struct Snapshot<S> {
    state: Arc<S>,
    version: u64,
}

// A committed action waiting to be shown to the observers.
struct Applied<S> {
    label: String,
    state: Arc<S>,
}

struct Shared<S> {
    name: String,
    state: RwLock<Snapshot<S>>,
    // Serializes writers. Re-entrant so a subscriber can dispatch on the
    // store that is notifying it.
    writer: ReentrantMutex<()>,
    // Set while an action closure edits its draft.
    drafting: AtomicBool,
    listeners: Mutex<Vec<Weak<dyn Listener<S>>>>,
    observers: RwLock<Vec<Arc<dyn ActionObserver<S>>>>,
    // Filled in commit order, drained by whichever commit finishes first.
    unreported: Mutex<VecDeque<Applied<S>>>,
}

/// Clears the drafting flag even if the action closure panics.
struct Drafting<'a>(&'a AtomicBool);

impl<'a> Drafting<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        let nested = flag.swap(true, Ordering::Relaxed);
        debug_assert!(
            !nested,
            "dispatch called from inside an action on the same store; \
             the outer action would overwrite the nested one"
        );
        Self(flag)
    }
}

impl Drop for Drafting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// A named, thread-safe container for one slice of application state.
///
/// State is held as an immutable snapshot (`Arc<S>`). Every update builds the
/// next snapshot from a shallow clone of the current one, so fields an action
/// does not touch keep their previous value, and `Arc` fields keep their
/// identity. Each committed update is followed by exactly one broadcast pass
/// over the live subscriptions, in registration order.
///
/// Cloning a `Store` yields another handle to the same state.
///
/// ```
/// use larder::Store;
///
/// #[derive(Clone, Default)]
/// struct Counter {
///     count: i64,
/// }
///
/// let store = Store::named("counter", Counter::default());
/// store.dispatch("counter/increment", |s| s.count += 1);
/// assert_eq!(store.get().count, 1);
/// ```
pub struct Store<S> {
    shared: Arc<Shared<S>>,
}

static NEXT_STORE: AtomicUsize = AtomicUsize::new(0);

impl<S> Store<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create a new store with the given initial state.
    pub fn new(initial: S) -> Self {
        let n = NEXT_STORE.fetch_add(1, Ordering::Relaxed);
        Self::named(format!("store-{n}"), initial)
    }

    /// Create a store that reports itself under `name`.
    pub fn named(name: impl Into<String>, initial: S) -> Self {
        let name = name.into();
        debug!(store = %name, "store created");
        Self {
            shared: Arc::new(Shared {
                name,
                state: RwLock::new(Snapshot {
                    state: Arc::new(initial),
                    version: 0,
                }),
                writer: ReentrantMutex::new(()),
                drafting: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
                observers: RwLock::new(Vec::new()),
                unreported: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Get the current state snapshot.
    ///
    /// The snapshot never changes; later updates install a new one.
    pub fn get(&self) -> Arc<S> {
        Arc::clone(&self.shared.state.read().state)
    }

    /// Read state without cloning the snapshot handle.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let snapshot = self.shared.state.read();
        f(&*snapshot.state)
    }

    /// Number of updates committed so far.
    pub fn version(&self) -> u64 {
        self.shared.state.read().version
    }

    /// Update the state with an unnamed action.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut S),
    {
        self.dispatch(ANONYMOUS_ACTION, f);
    }

    /// Run the action `label` and return what `f` returns.
    ///
    /// `f` edits a draft made by shallow-cloning the current state. Whatever
    /// it leaves alone is carried over unchanged. `f` runs under the store's
    /// writer lock, so anything it computes is ordered with the commit.
    ///
    /// `f` must not dispatch on this same store. The nested action would be
    /// committed first and then overwritten by the outer draft, which was
    /// cloned before it; debug builds panic when this happens. Nested updates
    /// belong in subscribers, which run after the commit.
    pub fn dispatch<F, R>(&self, label: &str, f: F) -> R
    where
        F: FnOnce(&mut S) -> R,
    {
        let _writer = self.shared.writer.lock();
        let mut draft = S::clone(&self.get());
        let out = {
            let _drafting = Drafting::enter(&self.shared.drafting);
            f(&mut draft)
        };
        self.commit(label, draft);
        out
    }

    /// Run a fallible action.
    ///
    /// On error the draft is thrown away: state, version and subscribers are
    /// left exactly as they were.
    pub fn try_dispatch<F, E>(&self, label: &str, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut S) -> Result<(), E>,
    {
        let _writer = self.shared.writer.lock();
        let mut draft = S::clone(&self.get());
        {
            let _drafting = Drafting::enter(&self.shared.drafting);
            f(&mut draft)?;
        }
        self.commit(label, draft);
        Ok(())
    }

    /// Replace the whole state.
    pub fn set(&self, new_state: S) {
        let _writer = self.shared.writer.lock();
        self.commit(ANONYMOUS_ACTION, new_state);
    }

    fn commit(&self, label: &str, next: S) {
        let (state, version) = {
            let mut current = self.shared.state.write();
            current.state = Arc::new(next);
            current.version += 1;
            (Arc::clone(&current.state), current.version)
        };
        debug!(store = %self.shared.name, action = label, version, "action applied");

        if !self.shared.observers.read().is_empty() {
            self.shared.unreported.lock().push_back(Applied {
                label: label.to_string(),
                state: Arc::clone(&state),
            });
        }

        self.notify(&state, version);
        self.report();
    }

    /// Hand queued actions to the observers, oldest first.
    ///
    /// A subscriber that dispatches during the broadcast drains the queue
    /// from its nested commit, which still starts with the outer action.
    fn report(&self) {
        loop {
            let next = self.shared.unreported.lock().pop_front();
            let Some(applied) = next else {
                break;
            };
            let observers = self.shared.observers.read().clone();
            for observer in observers {
                observer.on_action(&self.shared.name, &applied.label, &applied.state);
            }
        }
    }

    /// Notify all subscribers of a state change.
    ///
    /// Works on a copy of the registry so subscriptions may come and go from
    /// inside callbacks.
    fn notify(&self, state: &Arc<S>, version: u64) {
        let listeners: Vec<Arc<dyn Listener<S>>> = {
            let mut registry = self.shared.listeners.lock();
            registry.retain(|l| l.strong_count() > 0);
            registry.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in listeners {
            listener.notify(state, version);
        }
    }

    /// Register a listener built from the current snapshot.
    ///
    /// Holding the writer lock means no commit can slip in between computing
    /// the initial value and joining the registry.
    pub(crate) fn register<L, B>(&self, build: B) -> Arc<L>
    where
        L: Listener<S> + 'static,
        B: FnOnce(&Arc<S>, u64) -> L,
    {
        let _writer = self.shared.writer.lock();
        let (state, version) = {
            let snapshot = self.shared.state.read();
            (Arc::clone(&snapshot.state), snapshot.version)
        };
        let listener = Arc::new(build(&state, version));
        let erased: Arc<dyn Listener<S>> = listener.clone();
        self.shared.listeners.lock().push(Arc::downgrade(&erased));
        listener
    }

    /// Subscribe to a derived view of the state.
    ///
    /// `selector` runs once now to capture the starting value, then after
    /// every update. `on_change` is called with the new value only when it is
    /// not the [`same`](Identity::same) as the previous one.
    pub fn subscribe<T, Sel, Cb>(&self, selector: Sel, on_change: Cb) -> Subscription
    where
        T: Identity + Clone + Send + 'static,
        Sel: Fn(&S) -> T + Send + Sync + 'static,
        Cb: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_with(selector, T::same, on_change)
    }

    /// Like [`subscribe`](Self::subscribe) with a caller-supplied equality.
    pub fn subscribe_with<T, Sel, Eq, Cb>(
        &self,
        selector: Sel,
        equals: Eq,
        on_change: Cb,
    ) -> Subscription
    where
        T: Clone + Send + 'static,
        Sel: Fn(&S) -> T + Send + Sync + 'static,
        Eq: Fn(&T, &T) -> bool + Send + Sync + 'static,
        Cb: Fn(&T) + Send + Sync + 'static,
    {
        let selection = self.register(|state, version| {
            let initial = selector(&**state);
            Selection::new(selector, equals, on_change, initial, version)
        });
        Subscription::new(selection)
    }

    /// Subscribe to every update, whatever changed.
    pub fn subscribe_all<Cb>(&self, on_change: Cb) -> Subscription
    where
        Cb: Fn(&S) + Send + Sync + 'static,
    {
        let watcher = self.register(|_, version| Watcher::new(on_change, version));
        Subscription::new(watcher)
    }

    /// Keep a live, cached view of a selector's value.
    pub fn select<T, Sel>(&self, selector: Sel) -> Selected<T>
    where
        T: Identity + Clone + Send + Sync + 'static,
        Sel: Fn(&S) -> T + Send + Sync + 'static,
    {
        Selected::new(self, selector)
    }

    /// Attach an observer that is told about every committed action.
    pub fn observe(&self, observer: Arc<dyn ActionObserver<S>>) {
        self.shared.observers.write().push(observer);
    }

    /// Number of subscriptions that are still live.
    pub fn subscriber_count(&self) -> usize {
        let mut registry = self.shared.listeners.lock();
        registry.retain(|l| l.strong_count() > 0);
        registry
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|l| l.is_active())
            .count()
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.shared.name)
            .field("version", &self.shared.state.read().version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct AppState {
        count: usize,
        name: String,
        tags: Arc<Vec<String>>,
    }

    fn app_state() -> AppState {
        AppState {
            count: 0,
            name: "test".to_string(),
            tags: Arc::new(vec!["a".to_string()]),
        }
    }

    #[test]
    fn store_get_set() {
        let store = Store::new(app_state());

        assert_eq!(store.get().count, 0);

        store.set(AppState {
            count: 42,
            name: "updated".to_string(),
            tags: Arc::new(Vec::new()),
        });

        assert_eq!(store.get().count, 42);
        assert_eq!(store.get().name, "updated");
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn store_update_keeps_untouched_fields() {
        let store = Store::new(app_state());
        let before = store.get();

        store.update(|state| {
            state.count += 10;
        });

        let after = store.get();
        assert_eq!(after.count, 10);
        assert!(Arc::ptr_eq(&before.tags, &after.tags));
        assert_eq!(before.count, 0, "old snapshot must not change");
    }

    #[test]
    fn store_subscribe_all() {
        let store = Store::new(app_state());

        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let _sub = store.subscribe_all(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        store.update(|state| state.count += 1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        store.update(|state| state.name.push('!'));
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_action_leaves_state_alone() {
        let store = Store::new(app_state());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let _sub = store.subscribe_all(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let result: Result<(), &str> = store.try_dispatch("test/fail", |state| {
            state.count = 99;
            Err("nope")
        });

        assert_eq!(result, Err("nope"));
        assert_eq!(store.get().count, 0);
        assert_eq!(store.version(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscriber_may_dispatch_on_same_store() {
        let store = Store::new(app_state());
        let inner = store.clone();
        let _sub = store.subscribe(
            |s: &AppState| s.count,
            move |count| {
                if *count == 1 {
                    inner.dispatch("test/bump", |s| s.count = 2);
                }
            },
        );

        store.dispatch("test/start", |s| s.count = 1);
        assert_eq!(store.get().count, 2);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn observers_see_label_and_result() {
        struct Labels(Mutex<Vec<(String, usize)>>);
        impl ActionObserver<AppState> for Labels {
            fn on_action(&self, _store: &str, action: &str, state: &AppState) {
                self.0.lock().push((action.to_string(), state.count));
            }
        }

        let store = Store::named("app", app_state());
        let labels = Arc::new(Labels(Mutex::new(Vec::new())));
        store.observe(labels.clone());

        store.dispatch("app/inc", |s| s.count += 1);
        store.update(|s| s.count += 1);

        assert_eq!(
            *labels.0.lock(),
            vec![("app/inc".to_string(), 1), (ANONYMOUS_ACTION.to_string(), 2)]
        );
    }

    #[test]
    fn observers_see_nested_actions_in_commit_order() {
        struct Labels(Mutex<Vec<(String, usize)>>);
        impl ActionObserver<AppState> for Labels {
            fn on_action(&self, _store: &str, action: &str, state: &AppState) {
                self.0.lock().push((action.to_string(), state.count));
            }
        }

        let store = Store::named("app", app_state());
        let labels = Arc::new(Labels(Mutex::new(Vec::new())));
        store.observe(labels.clone());

        let inner = store.clone();
        let _sub = store.subscribe(
            |s: &AppState| s.count,
            move |count| {
                if *count == 1 {
                    inner.dispatch("app/bump", |s| s.count = 2);
                }
            },
        );

        store.dispatch("app/start", |s| s.count = 1);

        assert_eq!(
            *labels.0.lock(),
            vec![("app/start".to_string(), 1), ("app/bump".to_string(), 2)]
        );
        assert_eq!(labels.0.lock().last().map(|(_, c)| *c), Some(store.get().count));
    }

    #[test]
    fn dispatch_returns_action_result() {
        let store = Store::new(app_state());
        let previous = store.dispatch("app/swap", |s| std::mem::replace(&mut s.count, 7));
        assert_eq!(previous, 0);
        assert_eq!(store.get().count, 7);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "inside an action on the same store")]
    fn dispatch_inside_action_is_rejected() {
        let store = Store::new(app_state());
        let inner = store.clone();
        store.dispatch("app/outer", |s| {
            inner.dispatch("app/inner", |s| s.count = 2);
            s.count = 1;
        });
    }

    #[test]
    fn drafting_flag_resets_after_failed_action() {
        let store = Store::new(app_state());
        let _: Result<(), ()> = store.try_dispatch("app/fail", |_| Err(()));
        store.dispatch("app/ok", |s| s.count = 3);
        assert_eq!(store.get().count, 3);
    }
}
