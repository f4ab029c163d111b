use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::persist::{persist, PersistOptions, Storage};
use crate::selector::Subscription;
use crate::store::Store;

/// Storage key for the persisted auth state.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_logged_in: bool,
    pub user_profile: Option<Arc<UserProfile>>,
}

/// The persisted subset of [`AuthState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    pub is_logged_in: bool,
    pub user_profile: Option<Arc<UserProfile>>,
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    store: Store<AuthState>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self {
            store: Store::named("auth", AuthState::default()),
        }
    }

    pub fn store(&self) -> &Store<AuthState> {
        &self.store
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.read(|s| s.is_logged_in)
    }

    pub fn user_profile(&self) -> Option<Arc<UserProfile>> {
        self.store.read(|s| s.user_profile.clone())
    }

    pub fn login(&self, profile: UserProfile) {
        info!(name = %profile.name, "login");
        self.store.dispatch("auth/login", |s| {
            s.is_logged_in = true;
            s.user_profile = Some(Arc::new(profile));
        });
    }

    pub fn logout(&self) {
        self.store.dispatch("auth/logout", |s| {
            s.is_logged_in = false;
            s.user_profile = None;
        });
    }

    /// Restore the session from `storage` and keep it written back.
    pub fn persist(&self, storage: Arc<dyn Storage>, version: u32) -> Result<Subscription> {
        persist(
            &self.store,
            storage,
            PersistOptions::new(AUTH_STORAGE_KEY).version(version),
            |s: &AuthState| PersistedAuth {
                is_logged_in: s.is_logged_in,
                user_profile: s.user_profile.clone(),
            },
            |s, p| {
                s.is_logged_in = p.is_logged_in;
                s.user_profile = p.user_profile;
            },
        )
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;

    #[test]
    fn login_then_logout() {
        let auth = AuthStore::new();
        auth.login(UserProfile::new("John Doe", "john.doe@example.com").with_role("Tester"));
        assert!(auth.is_logged_in());
        assert_eq!(
            auth.user_profile().and_then(|p| p.role.clone()).as_deref(),
            Some("Tester")
        );

        auth.logout();
        assert!(!auth.is_logged_in());
        assert!(auth.user_profile().is_none());
    }

    #[test]
    fn session_survives_reload() {
        let storage = MemoryStorage::new();
        {
            let auth = AuthStore::new();
            let _persist = auth.persist(Arc::new(storage.clone()), 0).unwrap();
            auth.login(UserProfile::new("John Doe", "john.doe@example.com"));
        }

        let raw = storage.get_item(AUTH_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["state"]["isLoggedIn"], true);
        assert_eq!(json["state"]["userProfile"]["email"], "john.doe@example.com");

        let reloaded = AuthStore::new();
        let _persist = reloaded.persist(Arc::new(storage), 0).unwrap();
        assert!(reloaded.is_logged_in());
        assert_eq!(reloaded.user_profile().unwrap().name, "John Doe");
    }
}
