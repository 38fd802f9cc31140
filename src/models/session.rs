// src/models/session.rs

use serde::{Deserialize, Serialize};

/// Entitlement snapshot as last reported by the backend.
///
/// The wire format is flat JSON discriminated by `user_type`
/// (`GET /api/user-status/`), which maps directly onto an internally
/// tagged enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum SessionStatus {
    Authenticated {
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        credits: u32,
    },
    Guest {
        #[serde(default)]
        free_attempts_remaining: u32,
        /// Token minted by the backend on first contact. Adopted locally
        /// with first-write-wins semantics; see the questionnaire store.
        #[serde(default)]
        guest_token: Option<String>,
    },
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated { .. })
    }

    pub fn credits(&self) -> u32 {
        match self {
            SessionStatus::Authenticated { credits, .. } => *credits,
            SessionStatus::Guest { .. } => 0,
        }
    }

    pub fn free_attempts_remaining(&self) -> u32 {
        match self {
            SessionStatus::Authenticated { .. } => 0,
            SessionStatus::Guest {
                free_attempts_remaining,
                ..
            } => *free_attempts_remaining,
        }
    }
}

/// Identity as reported by the external identity provider.
/// Never persisted; re-derived from the provider on startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}
