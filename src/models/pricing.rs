// src/models/pricing.rs

use serde::{Deserialize, Serialize};

/// A purchasable credit bundle (`GET /api/pricing/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub id: i64,
    pub name: String,
    pub credits: u32,
    /// Formatted price string as supplied by the backend.
    pub price: String,
    #[serde(default)]
    pub description: String,
}
