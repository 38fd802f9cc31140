// src/store/session.rs

use crate::client::ApiClient;
use crate::error::AppError;
use crate::identity::IdentityProvider;
use crate::models::session::{Identity, SessionStatus};
use crate::storage::{CredentialCache, LocalStore};
use std::sync::{Arc, RwLock};

/// Holds the current identity and the entitlement snapshot, and keeps both
/// in sync with the identity provider and the backend.
///
/// Snapshot replacement is atomic: a refresh either installs a complete new
/// status or leaves the previous one untouched.
pub struct SessionStore {
    identity: RwLock<Option<Identity>>,
    status: RwLock<Option<SessionStatus>>,
    provider: Arc<dyn IdentityProvider>,
    credentials: Arc<CredentialCache>,
    client: Arc<ApiClient>,
    local: Arc<LocalStore>,
}

impl SessionStore {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        credentials: Arc<CredentialCache>,
        client: Arc<ApiClient>,
        local: Arc<LocalStore>,
    ) -> Self {
        Self {
            identity: RwLock::new(None),
            status: RwLock::new(None),
            provider,
            credentials,
            client,
            local,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().expect("identity lock poisoned").clone()
    }

    pub fn status(&self) -> Option<SessionStatus> {
        self.status.read().expect("status lock poisoned").clone()
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.write().expect("identity lock poisoned") = identity;
    }

    /// Installs a complete entitlement snapshot.
    pub fn set_status(&self, status: SessionStatus) {
        *self.status.write().expect("status lock poisoned") = Some(status);
    }

    /// Applies the provider's current identity, then follows every
    /// subsequent sign-in/sign-out notification on a background task.
    pub async fn initialize(self: &Arc<Self>) {
        let mut rx = self.provider.subscribe();
        let current = rx.borrow_and_update().clone();
        self.apply_identity_change(current).await;

        let store = Arc::clone(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                store.apply_identity_change(identity).await;
            }
        });
    }

    /// Reaction to an identity-provider notification: a present identity
    /// gets a fresh bearer credential and an entitlement refresh; an absent
    /// one clears the credential and any authenticated snapshot. A guest
    /// snapshot survives sign-out, the anonymous session is still valid.
    async fn apply_identity_change(&self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                self.set_identity(Some(identity));
                match self.provider.issue_token().await {
                    Ok(token) => self.credentials.set(token),
                    Err(e) => {
                        tracing::error!("Failed to obtain bearer credential: {}", e);
                        return;
                    }
                }
                self.refresh_status().await;
            }
            None => {
                self.set_identity(None);
                self.credentials.clear();
                let mut status = self.status.write().expect("status lock poisoned");
                if matches!(*status, Some(SessionStatus::Authenticated { .. })) {
                    *status = None;
                }
            }
        }
    }

    /// Interactive sign-in through the provider, then entitlement refresh.
    pub async fn sign_in(&self) -> Result<(), AppError> {
        let identity = self.provider.sign_in().await?;
        self.set_identity(Some(identity));
        let token = self.provider.issue_token().await?;
        self.credentials.set(token);
        self.refresh_status().await;
        Ok(())
    }

    /// Signs out and drops the credential and the entitlement snapshot.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.provider.sign_out().await?;
        self.set_identity(None);
        self.credentials.clear();
        *self.status.write().expect("status lock poisoned") = None;
        Ok(())
    }

    /// Best-effort entitlement refresh. A failure is logged and the prior
    /// snapshot stays in place; this never returns an error to the caller.
    pub async fn refresh_status(&self) {
        let guest_token = self.local.guest_token();
        match self.client.get_user_status(guest_token.as_deref()).await {
            Ok(status) => self.set_status(status),
            Err(e) => tracing::warn!("Entitlement refresh failed, keeping prior snapshot: {}", e),
        }
    }

    /// Identity present and the snapshot reports an authenticated user.
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
            && self
                .status()
                .is_some_and(|status| status.is_authenticated())
    }

    /// Authenticated with at least one credit. Boolean by contract; the
    /// numeric value is `credits()`.
    pub fn has_credits(&self) -> bool {
        self.is_authenticated() && self.credits() > 0
    }

    pub fn credits(&self) -> u32 {
        self.status().map_or(0, |status| status.credits())
    }

    /// Zero unless the snapshot is a guest session.
    pub fn free_attempts_remaining(&self) -> u32 {
        self.status()
            .map_or(0, |status| status.free_attempts_remaining())
    }
}
