use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Tells whether a finished request is still the one the state is waiting
/// for.
///
/// Every `begin` supersedes all earlier tokens, and `invalidate` supersedes
/// them without starting anything new. A resolution carrying a superseded
/// token must be dropped, so the last *requested* value wins regardless of
/// the order responses arrive in.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestToken {
        RequestToken(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.generation.load(Ordering::Acquire) == token.0
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_request_supersedes_earlier() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn invalidate_drops_in_flight_request() {
        let tracker = RequestTracker::new();
        let token = tracker.begin();
        tracker.invalidate();
        assert!(!tracker.is_current(token));
    }
}
