// src/models/ad.rs

use serde::{Deserialize, Serialize};

/// A timed advertisement (`GET /api/ad/`).
/// Fetched fresh per ad-flow invocation, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: i64,
    pub headline: String,
    pub image_url: String,
    /// Call-to-action; independent of the countdown.
    pub cta_text: String,
    pub cta_url: String,
    /// The continue affordance unlocks only after this many seconds.
    pub display_seconds: u32,
}
