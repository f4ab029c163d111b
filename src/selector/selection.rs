use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::subscription::Detach;
use crate::store::Listener;

struct Observed<T> {
    value: T,
    version: u64,
}

/// A registered `(selector, callback)` pair and the last value it reported.
pub(crate) struct Selection<S, T, Sel, Eq, Cb> {
    selector: Sel,
    equals: Eq,
    on_change: Cb,
    last: Mutex<Observed<T>>,
    active: AtomicBool,
    _state: PhantomData<fn(&S)>,
}

impl<S, T, Sel, Eq, Cb> Selection<S, T, Sel, Eq, Cb> {
    pub(crate) fn new(selector: Sel, equals: Eq, on_change: Cb, initial: T, version: u64) -> Self {
        Self {
            selector,
            equals,
            on_change,
            last: Mutex::new(Observed {
                value: initial,
                version,
            }),
            active: AtomicBool::new(true),
            _state: PhantomData,
        }
    }
}

impl<S, T, Sel, Eq, Cb> Listener<S> for Selection<S, T, Sel, Eq, Cb>
where
    T: Clone + Send,
    Sel: Fn(&S) -> T + Send + Sync,
    Eq: Fn(&T, &T) -> bool + Send + Sync,
    Cb: Fn(&T) + Send + Sync,
{
    fn notify(&self, state: &Arc<S>, version: u64) {
        if !self.is_active() {
            return;
        }
        let next = (self.selector)(&**state);
        {
            let mut last = self.last.lock();
            if version <= last.version {
                return;
            }
            last.version = version;
            if (self.equals)(&last.value, &next) {
                return;
            }
            last.value = next.clone();
        }
        // Re-check: an earlier callback in this pass may have unsubscribed us.
        if self.is_active() {
            (self.on_change)(&next);
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl<S, T, Sel, Eq, Cb> Detach for Selection<S, T, Sel, Eq, Cb>
where
    T: Send,
    Sel: Send + Sync,
    Eq: Send + Sync,
    Cb: Send + Sync,
{
    fn detach(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_attached(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Whole-state listener: called after every commit.
pub(crate) struct Watcher<S, Cb> {
    on_change: Cb,
    seen: Mutex<u64>,
    active: AtomicBool,
    _state: PhantomData<fn(&S)>,
}

impl<S, Cb> Watcher<S, Cb> {
    pub(crate) fn new(on_change: Cb, version: u64) -> Self {
        Self {
            on_change,
            seen: Mutex::new(version),
            active: AtomicBool::new(true),
            _state: PhantomData,
        }
    }
}

impl<S, Cb> Listener<S> for Watcher<S, Cb>
where
    Cb: Fn(&S) + Send + Sync,
{
    fn notify(&self, state: &Arc<S>, version: u64) {
        if !self.is_active() {
            return;
        }
        {
            let mut seen = self.seen.lock();
            if version <= *seen {
                return;
            }
            *seen = version;
        }
        (self.on_change)(&**state);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl<S, Cb> Detach for Watcher<S, Cb>
where
    Cb: Send + Sync,
{
    fn detach(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_attached(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
