// src/identity.rs

use crate::error::AppError;
use crate::models::session::Identity;
use async_trait::async_trait;
use std::sync::RwLock;
use tokio::sync::watch;

/// Seam for the external identity provider.
///
/// Covers the surface the app actually consumes: interactive sign-in and
/// sign-out, on-demand issuance of a short-lived bearer credential, and a
/// subscription to sign-in/sign-out notifications.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<Identity, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;

    /// Issues a bearer credential for the currently signed-in identity.
    async fn issue_token(&self) -> Result<String, AppError>;

    /// Current identity plus all subsequent changes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Provider with a fixed identity and token, driven entirely by local state.
///
/// Stands in for a real identity service in the terminal binary (seeded from
/// `IDENTITY_EMAIL` / `IDENTITY_TOKEN`) and in tests.
pub struct StaticIdentityProvider {
    seed: Option<Identity>,
    token: RwLock<Option<String>>,
    tx: watch::Sender<Option<Identity>>,
}

impl StaticIdentityProvider {
    /// A provider with nobody signed in and no identity to sign in as.
    pub fn anonymous() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            seed: None,
            token: RwLock::new(None),
            tx,
        }
    }

    /// A provider that can sign `identity` in, issuing `token` for it.
    /// The identity starts signed out.
    pub fn with_identity(identity: Identity, token: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            seed: Some(identity),
            token: RwLock::new(Some(token.into())),
            tx,
        }
    }

    /// Like `with_identity`, but already signed in.
    pub fn signed_in(identity: Identity, token: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(Some(identity.clone()));
        Self {
            seed: Some(identity),
            token: RwLock::new(Some(token.into())),
            tx,
        }
    }

    /// Seeds the provider from `IDENTITY_EMAIL` / `IDENTITY_TOKEN`.
    /// Without both variables the provider is anonymous and sign-in fails.
    pub fn from_env() -> Self {
        match (
            std::env::var("IDENTITY_EMAIL").ok(),
            std::env::var("IDENTITY_TOKEN").ok(),
        ) {
            (Some(email), Some(token)) => Self::with_identity(
                Identity {
                    uid: email.clone(),
                    email,
                },
                token,
            ),
            _ => Self::anonymous(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AppError> {
        let identity = self.seed.clone().ok_or_else(|| {
            AppError::Unexpected("No identity configured for sign-in".to_string())
        })?;
        self.tx.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.tx.send_replace(None);
        Ok(())
    }

    async fn issue_token(&self) -> Result<String, AppError> {
        if self.tx.borrow().is_none() {
            return Err(AppError::AuthRequired);
        }
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or_else(|| AppError::Unexpected("Identity provider has no token".to_string()))
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
