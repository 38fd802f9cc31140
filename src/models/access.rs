// src/models/access.rs

use serde::Deserialize;

/// Outcome of `POST /api/check-access/`. Transient; recomputed on every
/// submission attempt and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Granted,
    AdRequired,
    /// Optional server-supplied reason; callers fall back to a generic
    /// purchase-required message when absent.
    Denied(Option<String>),
}

/// Wire shape of the access-check response.
#[derive(Debug, Deserialize)]
pub struct AccessCheckResponse {
    pub access: AccessKind,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    Granted,
    AdRequired,
    Denied,
}

impl From<AccessCheckResponse> for AccessDecision {
    fn from(resp: AccessCheckResponse) -> Self {
        match resp.access {
            AccessKind::Granted => AccessDecision::Granted,
            AccessKind::AdRequired => AccessDecision::AdRequired,
            AccessKind::Denied => AccessDecision::Denied(resp.reason),
        }
    }
}
