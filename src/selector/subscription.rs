use std::fmt;
use std::sync::Arc;

/// Owner-side control of a registered listener.
pub(crate) trait Detach: Send + Sync {
    fn detach(&self);

    fn is_attached(&self) -> bool;
}

/// RAII handle for a store subscription.
///
/// The consumer owns the listener through this handle; the store only keeps
/// a weak entry for broadcasting. Dropping the handle, or calling
/// [`unsubscribe`](Subscription::unsubscribe), ends the subscription.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    listener: Arc<dyn Detach>,
}

impl Subscription {
    pub(crate) fn new<L>(listener: Arc<L>) -> Self
    where
        L: Detach + 'static,
    {
        Self { listener }
    }

    /// Stop receiving notifications.
    ///
    /// Safe to call more than once, and from inside a notification callback:
    /// a broadcast already in progress skips this subscription from then on.
    pub fn unsubscribe(&self) {
        self.listener.detach();
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_attached()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listener.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
