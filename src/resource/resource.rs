use serde::{Deserialize, Serialize};

use crate::selector::Identity;

/// State of one remotely fetched value.
///
/// ```text
/// Idle ──start──▶ Loading ──succeed──▶ Success(T)
///                    │
///                    └────fail────▶ Error(message)
/// ```
///
/// `start` is allowed from every state, so a retry from `Error` or a refresh
/// from `Success` goes back to `Loading`. A refresh keeps the previous value
/// as `stale` so a view can keep showing it until the new one arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum Resource<T> {
    Idle,
    Loading {
        stale: Option<T>,
    },
    Success(T),
    Error(String),
}

impl<T> Resource<T> {
    /// Move to `Loading`, keeping any value from a previous success.
    #[must_use]
    pub fn start(self) -> Self {
        let stale = match self {
            Resource::Success(value) => Some(value),
            Resource::Loading { stale } => stale,
            Resource::Idle | Resource::Error(_) => None,
        };
        Resource::Loading { stale }
    }

    pub fn succeed(value: T) -> Self {
        Resource::Success(value)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Resource::Error(message.into())
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Resource::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading { .. })
    }

    /// The freshest value available: the payload on success, the stale
    /// payload while reloading.
    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Success(value) => Some(value),
            Resource::Loading { stale } => stale.as_ref(),
            Resource::Idle | Resource::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Resource::Idle
    }
}

impl<T: Identity> Identity for Resource<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Resource::Idle, Resource::Idle) => true,
            (Resource::Loading { stale: a }, Resource::Loading { stale: b }) => a.same(b),
            (Resource::Success(a), Resource::Success(b)) => a.same(b),
            (Resource::Error(a), Resource::Error(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn refresh_keeps_stale_value() {
        let loaded = Resource::succeed(Arc::new(3));
        let reloading = loaded.clone().start();
        assert!(reloading.is_loading());
        assert_eq!(reloading.data().map(|v| **v), Some(3));
        assert!(reloading.error().is_none());
    }

    #[test]
    fn retry_after_error_has_no_data() {
        let failed: Resource<u8> = Resource::fail("Failed to fetch: 500");
        assert_eq!(failed.error(), Some("Failed to fetch: 500"));
        let retry = failed.start();
        assert_eq!(retry, Resource::Loading { stale: None });
    }

    #[test]
    fn identity_follows_payload_pointer() {
        let payload = Arc::new(vec![1]);
        let a = Resource::succeed(payload.clone());
        assert!(a.same(&Resource::succeed(payload)));
        assert!(!a.same(&Resource::succeed(Arc::new(vec![1]))));
        assert!(!a.same(&Resource::Idle));
    }
}
